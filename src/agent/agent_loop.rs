//! Core conversation loop implementation.

use std::sync::Arc;

use crate::config::Config;
use crate::corpus::DocumentCorpus;
use crate::llm::{ChatMessage, LlmClient, OpenAiClient, Role};
use crate::notify::{Notifier, PushoverNotifier};
use crate::tools::ToolSet;

use super::prompt::build_system_prompt;

/// The conversational avatar.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolSet,
    corpus: DocumentCorpus,
}

impl Agent {
    /// Create an agent with the production LLM client and notifier.
    pub fn new(config: Config, corpus: DocumentCorpus) -> Self {
        let llm = Arc::new(OpenAiClient::new(
            config.api_key.clone(),
            config.api_base_url.clone(),
        ));
        let notifier: Arc<dyn Notifier> = Arc::new(PushoverNotifier::new(config.pushover.clone()));
        Self::with_parts(config, corpus, llm, notifier)
    }

    /// Create an agent from explicit parts (useful for testing).
    pub fn with_parts(
        config: Config,
        corpus: DocumentCorpus,
        llm: Arc<dyn LlmClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tools = ToolSet::new(notifier);
        Self {
            config,
            llm,
            tools,
            corpus,
        }
    }

    /// Run one conversation turn and return the final textual answer.
    ///
    /// `history` is the prior conversation as user/assistant messages; the
    /// system prompt is rebuilt here and must not be included.
    pub async fn chat(
        &self,
        conversation_id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> anyhow::Result<String> {
        let system_prompt = build_system_prompt(
            &self.config.persona_name,
            self.config.persona_first_name(),
            &self.corpus,
            conversation_id,
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));

        let tool_schemas = self.tools.schemas();

        for round in 0..self.config.max_tool_rounds {
            tracing::debug!("Conversation round {}", round + 1);

            let response = self
                .llm
                .chat_completion(&self.config.chat_model, &messages, &tool_schemas)
                .await?;

            if response.finish_reason.wants_tools() {
                let tool_calls = response.tool_calls.unwrap_or_default();

                // Echo the assistant's tool-call message, then one tool
                // result per call, in request order.
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content,
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    let result = self
                        .tools
                        .dispatch(&tool_call.function.name, &tool_call.function.arguments)
                        .await;
                    messages.push(ChatMessage::tool(tool_call.id.clone(), result.to_string()));
                }

                continue;
            }

            // Any other finish reason is terminal.
            if let Some(content) = response.content {
                return Ok(content);
            }

            return Err(anyhow::anyhow!("Model returned an empty response"));
        }

        Err(anyhow::anyhow!(
            "Tool-call budget exceeded ({} rounds) without a final answer",
            self.config.max_tool_rounds
        ))
    }
}

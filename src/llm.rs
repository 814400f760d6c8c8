//! LLM client for OpenAI-compatible chat-completions APIs.
//!
//! Wire types follow the chat-completions format: role-tagged messages,
//! function-style tool schemas, and tool calls correlated by id. The
//! [`LlmClient`] trait is the seam the agent loop talks through, so tests
//! can script responses without a network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// A tool-result message correlated to its originating call.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

/// The function half of a tool call: a name plus JSON-encoded arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

/// A declared tool schema, advertised to the model with every request.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function",
            function: FunctionSchema {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    #[serde(other)]
    Other,
}

impl FinishReason {
    /// Whether the model is asking the host to execute tool calls.
    pub fn wants_tools(&self) -> bool {
        matches!(self, FinishReason::ToolCalls)
    }
}

/// One model response: the termination reason plus the assistant message.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub finish_reason: FinishReason,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Abstraction over the chat-completions endpoint.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> anyhow::Result<ChatResponse>;
}

/// Client for any OpenAI-compatible chat-completions API.
// Intentionally no Debug derive: keeps the API key out of log output.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolSchema],
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    finish_reason: Option<FinishReason>,
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

fn into_chat_response(response: ApiResponse) -> anyhow::Result<ChatResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Model response contained no choices"))?;

    Ok(ChatResponse {
        finish_reason: choice.finish_reason.unwrap_or(FinishReason::Stop),
        content: choice.message.content,
        tool_calls: choice.message.tool_calls,
    })
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> anyhow::Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = ApiRequest {
            model,
            messages,
            tools,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Chat API error {}: {}", status, body));
        }

        let parsed: ApiResponse = response.json().await?;
        into_chat_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_message_carries_correlation_id() {
        let msg = ChatMessage::tool("call_1", "{\"recorded\":\"ok\"}");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn message_serialization_omits_empty_fields() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn finish_reason_parses_known_and_unknown_values() {
        let stop: FinishReason = serde_json::from_value(json!("stop")).unwrap();
        assert_eq!(stop, FinishReason::Stop);
        assert!(!stop.wants_tools());

        let tools: FinishReason = serde_json::from_value(json!("tool_calls")).unwrap();
        assert!(tools.wants_tools());

        let other: FinishReason = serde_json::from_value(json!("flagged")).unwrap();
        assert_eq!(other, FinishReason::Other);
    }

    #[test]
    fn response_parsing_extracts_tool_calls() {
        let parsed: ApiResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "record_unknown_question",
                            "arguments": "{\"question\":\"favorite color?\"}"
                        }
                    }]
                }
            }]
        }))
        .unwrap();

        let response = into_chat_response(parsed).unwrap();
        assert!(response.finish_reason.wants_tools());
        let calls = response.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "record_unknown_question");
    }

    #[test]
    fn missing_finish_reason_defaults_to_stop() {
        let parsed: ApiResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": null,
                "message": {"content": "Hello!", "tool_calls": null}
            }]
        }))
        .unwrap();

        let response = into_chat_response(parsed).unwrap();
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.content.as_deref(), Some("Hello!"));
    }

    #[test]
    fn empty_choices_is_an_error() {
        let parsed: ApiResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(into_chat_response(parsed).is_err());
    }

    #[test]
    fn tool_schema_serializes_to_function_format() {
        let schema = ToolSchema::function(
            "record_user_details",
            "Record a visitor's email address",
            json!({"type": "object", "properties": {}}),
        );
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "record_user_details");
    }
}

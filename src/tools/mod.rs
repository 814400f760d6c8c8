//! Conversation milestone tools.
//!
//! The model records milestones (a visitor's email, an end-of-conversation
//! summary, a question it could not answer) by calling one of the tools
//! declared here. Dispatch is a closed enum resolved at compile time: every
//! tool name maps to a variant with a typed argument struct, so a typo in a
//! handler name cannot silently bind to nothing. An *unknown* name coming
//! from the model still yields an empty result rather than a failed turn,
//! since a hallucinated tool call must not break the conversation.
//!
//! Summary fields are scrubbed host-side before they reach the notifier:
//! the prompt asks the model to strip PII, and the handlers enforce it.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::llm::ToolSchema;
use crate::notify::Notifier;

mod scrub;

pub use scrub::scrub_pii;

/// The closed set of tools the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    RecordUserDetails,
    RecordConversation,
    RecordUnknownQuestion,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::RecordUserDetails,
        ToolKind::RecordConversation,
        ToolKind::RecordUnknownQuestion,
    ];

    /// Resolve a wire name to a tool kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "record_user_details" => Some(ToolKind::RecordUserDetails),
            "record_conversation" => Some(ToolKind::RecordConversation),
            "record_unknown_question" => Some(ToolKind::RecordUnknownQuestion),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::RecordUserDetails => "record_user_details",
            ToolKind::RecordConversation => "record_conversation",
            ToolKind::RecordUnknownQuestion => "record_unknown_question",
        }
    }

    /// The function schema advertised to the model.
    pub fn schema(&self) -> ToolSchema {
        match self {
            ToolKind::RecordUserDetails => ToolSchema::function(
                self.name(),
                "Use this tool to record that a visitor provided an email address",
                json!({
                    "type": "object",
                    "properties": {
                        "conversation_id": {
                            "type": "string",
                            "description": "The conversation id"
                        },
                        "email": {
                            "type": "string",
                            "description": "The email address of this visitor"
                        },
                        "name": {
                            "type": "string",
                            "description": "The visitor's name, if they provided it"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Context worth following up on"
                        },
                        "summary": {
                            "type": "string",
                            "description": "Summary of the conversation so far (PII removed)"
                        }
                    },
                    "required": ["conversation_id", "email"],
                    "additionalProperties": false
                }),
            ),
            ToolKind::RecordConversation => ToolSchema::function(
                self.name(),
                "Use this tool to record a summary of the conversation when it ends",
                json!({
                    "type": "object",
                    "properties": {
                        "conversation_id": {
                            "type": "string",
                            "description": "The conversation id"
                        },
                        "summary": {
                            "type": "string",
                            "description": "Summary of the entire conversation (PII removed)"
                        },
                        "unanswered_questions": {
                            "type": "string",
                            "description": "Questions the documents could not answer"
                        }
                    },
                    "required": ["conversation_id", "summary"],
                    "additionalProperties": false
                }),
            ),
            ToolKind::RecordUnknownQuestion => ToolSchema::function(
                self.name(),
                "Use this tool to record a question that could not be answered from the documents",
                json!({
                    "type": "object",
                    "properties": {
                        "conversation_id": {
                            "type": "string",
                            "description": "The conversation id"
                        },
                        "question": {
                            "type": "string",
                            "description": "The question that could not be answered"
                        }
                    },
                    "required": ["conversation_id", "question"],
                    "additionalProperties": false
                }),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordUserDetailsArgs {
    conversation_id: String,
    email: String,
    #[serde(default = "name_not_provided")]
    name: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

fn name_not_provided() -> String {
    "not provided".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordConversationArgs {
    conversation_id: String,
    summary: String,
    #[serde(default)]
    unanswered_questions: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordUnknownQuestionArgs {
    conversation_id: String,
    question: String,
}

/// The tool set the agent loop dispatches into.
pub struct ToolSet {
    notifier: Arc<dyn Notifier>,
}

impl ToolSet {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Schemas for every declared tool, sent with each model request.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        ToolKind::ALL.iter().map(ToolKind::schema).collect()
    }

    /// Execute one tool call and return its result object.
    ///
    /// An unknown tool name or arguments that fail the declared schema
    /// (missing required field, unexpected field, wrong type) produce an
    /// empty object. The turn always continues.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Value {
        let Some(kind) = ToolKind::from_name(name) else {
            tracing::warn!("Model called unknown tool: {}", name);
            return json!({});
        };

        tracing::info!("Tool called: {}", name);

        match kind {
            ToolKind::RecordUserDetails => {
                let args: RecordUserDetailsArgs = match serde_json::from_str(arguments) {
                    Ok(args) => args,
                    Err(e) => return reject_arguments(name, e),
                };
                self.record_user_details(args).await
            }
            ToolKind::RecordConversation => {
                let args: RecordConversationArgs = match serde_json::from_str(arguments) {
                    Ok(args) => args,
                    Err(e) => return reject_arguments(name, e),
                };
                self.record_conversation(args).await
            }
            ToolKind::RecordUnknownQuestion => {
                let args: RecordUnknownQuestionArgs = match serde_json::from_str(arguments) {
                    Ok(args) => args,
                    Err(e) => return reject_arguments(name, e),
                };
                self.record_unknown_question(args).await
            }
        }
    }

    async fn record_user_details(&self, args: RecordUserDetailsArgs) -> Value {
        let summary = scrub_summary(args.summary.as_deref().unwrap_or(""), &args.name);
        let body = format!(
            "Conversation {}\nEmail: {}\nName: {}\nNotes: {}\nSummary (PII removed): {}",
            args.conversation_id,
            args.email,
            args.name,
            args.notes.as_deref().unwrap_or("not provided"),
            summary,
        );
        self.notifier
            .send("New email from a visitor", &body)
            .await;
        recorded_ok()
    }

    async fn record_conversation(&self, args: RecordConversationArgs) -> Value {
        let body = format!(
            "Conversation {}\nUnanswered questions: {}\nSummary (PII removed): {}",
            args.conversation_id,
            args.unanswered_questions.as_deref().unwrap_or("none"),
            scrub_pii(&args.summary),
        );
        self.notifier.send("Conversation summary", &body).await;
        recorded_ok()
    }

    async fn record_unknown_question(&self, args: RecordUnknownQuestionArgs) -> Value {
        let body = format!(
            "Conversation {}\nQuestion: {}",
            args.conversation_id, args.question,
        );
        self.notifier.send("Unanswered question", &body).await;
        recorded_ok()
    }
}

/// Scrub a summary field: general PII patterns plus the visitor's own name
/// when one was provided.
fn scrub_summary(summary: &str, visitor_name: &str) -> String {
    let scrubbed = scrub_pii(summary);
    if visitor_name == "not provided" || visitor_name.trim().is_empty() {
        return scrubbed;
    }
    scrub::scrub_name(&scrubbed, visitor_name)
}

fn reject_arguments(name: &str, error: serde_json::Error) -> Value {
    tracing::warn!("Rejected arguments for tool {}: {}", name, error);
    json!({})
}

fn recorded_ok() -> Value {
    json!({"recorded": "ok"})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    fn tool_set() -> (ToolSet, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (ToolSet::new(notifier.clone()), notifier)
    }

    #[test]
    fn every_tool_name_round_trips() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("open_pod_bay_doors"), None);
    }

    #[test]
    fn schemas_cover_all_tools() {
        let (tools, _) = tool_set();
        let schemas = tools.schemas();
        assert_eq!(schemas.len(), ToolKind::ALL.len());
    }

    #[tokio::test]
    async fn unknown_tool_returns_empty_object_without_notifying() {
        let (tools, notifier) = tool_set();
        let result = tools.dispatch("open_pod_bay_doors", "{}").await;
        assert_eq!(result, json!({}));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn record_user_details_notifies_with_email_and_notes() {
        let (tools, notifier) = tool_set();
        let result = tools
            .dispatch(
                "record_user_details",
                r#"{"conversation_id": "c-1", "email": "jane@example.com",
                    "notes": "wants a consulting quote",
                    "summary": "Visitor asked about rates"}"#,
            )
            .await;

        assert_eq!(result, json!({"recorded": "ok"}));
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        let (title, body) = &sent[0];
        assert_eq!(title, "New email from a visitor");
        assert!(body.contains("jane@example.com"));
        assert!(body.contains("wants a consulting quote"));
        assert!(body.contains("c-1"));
    }

    #[tokio::test]
    async fn summary_field_is_scrubbed_even_when_model_leaks_pii() {
        let (tools, notifier) = tool_set();
        tools
            .dispatch(
                "record_user_details",
                r#"{"conversation_id": "c-1", "email": "jane@example.com",
                    "name": "Jane Doe",
                    "summary": "Jane Doe (jane@example.com, +48 123 456 789) asked about rates"}"#,
            )
            .await;

        let sent = notifier.sent();
        let body = &sent[0].1;
        let summary_line = body
            .lines()
            .find(|l| l.starts_with("Summary"))
            .expect("summary line");
        assert!(!summary_line.contains("jane@example.com"));
        assert!(!summary_line.contains("Jane Doe"));
        assert!(!summary_line.contains("123 456 789"));
        assert!(summary_line.contains("asked about rates"));
        // The explicit email field itself is exempt from scrubbing.
        assert!(body.contains("Email: jane@example.com"));
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected_silently() {
        let (tools, notifier) = tool_set();
        let result = tools
            .dispatch("record_user_details", r#"{"conversation_id": "c-1"}"#)
            .await;
        assert_eq!(result, json!({}));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn extra_fields_are_rejected() {
        let (tools, notifier) = tool_set();
        let result = tools
            .dispatch(
                "record_unknown_question",
                r#"{"conversation_id": "c-1", "question": "?", "rm_rf": true}"#,
            )
            .await;
        assert_eq!(result, json!({}));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_question_notification_carries_literal_question() {
        let (tools, notifier) = tool_set();
        let result = tools
            .dispatch(
                "record_unknown_question",
                r#"{"conversation_id": "c-1", "question": "What is your favorite color?"}"#,
            )
            .await;

        assert_eq!(result, json!({"recorded": "ok"}));
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("What is your favorite color?"));
    }

    #[tokio::test]
    async fn conversation_summary_defaults_unanswered_to_none() {
        let (tools, notifier) = tool_set();
        tools
            .dispatch(
                "record_conversation",
                r#"{"conversation_id": "c-9", "summary": "Friendly chat about career"}"#,
            )
            .await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("Unanswered questions: none"));
        assert!(sent[0].1.contains("Friendly chat about career"));
    }
}

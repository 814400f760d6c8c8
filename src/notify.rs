//! Milestone notifications.
//!
//! When the conversation hits a milestone (a visitor leaves an email, a
//! conversation wraps up, a question could not be answered), the owner gets
//! a push notification. Delivery is fire-and-forget and at-most-once: a
//! transport failure is logged and swallowed so it can never fail the
//! conversation turn that triggered it.

use async_trait::async_trait;

use crate::config::PushoverConfig;

/// Pushover message endpoint.
const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification with a title and a message body.
    async fn send(&self, title: &str, message: &str);
}

/// Notifier backed by the Pushover message API.
pub struct PushoverNotifier {
    http: reqwest::Client,
    config: PushoverConfig,
    endpoint: String,
}

impl PushoverNotifier {
    pub fn new(config: PushoverConfig) -> Self {
        Self::with_endpoint(config, PUSHOVER_API_URL)
    }

    /// Use a non-default endpoint (for testing against a local server).
    pub fn with_endpoint(config: PushoverConfig, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, title: &str, message: &str) {
        tracing::info!("Push: {}", title);

        let params = [
            ("user", self.config.user_key.as_str()),
            ("token", self.config.app_token.as_str()),
            ("title", title),
            ("message", message),
        ];

        match self.http.post(&self.endpoint).form(&params).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!("Pushover rejected notification: {}", response.status());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to send notification: {}", e);
            }
        }
    }
}

/// Notifier that records every notification in memory (for testing).
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications sent so far, as `(title, message)` pairs.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, title: &str, message: &str) {
        self.sent
            .lock()
            .expect("notifier lock")
            .push((title.to_string(), message.to_string()));
    }
}

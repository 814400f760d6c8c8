//! Configuration management for the About-Me agent.
//!
//! Configuration can be set via environment variables:
//! - `OPENAI_API_KEY` - Required. API key for the chat-completions endpoint.
//! - `PERSONA_NAME` - Required. Full name of the person the avatar represents.
//! - `PUSHOVER_USER` - Required. Pushover user key for milestone notifications.
//! - `PUSHOVER_TOKEN` - Required. Pushover application token.
//! - `OPENAI_BASE_URL` - Optional. Defaults to `https://api.openai.com/v1`.
//! - `CHAT_MODEL` - Optional. Defaults to `gpt-4o-mini`.
//! - `DOCS_DIR` - Optional. Document folder. Defaults to `about_me`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_TOOL_ROUNDS` - Optional. Tool-call budget per turn. Defaults to `8`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Notification transport credentials (Pushover).
#[derive(Clone)]
pub struct PushoverConfig {
    /// Pushover user key (the recipient)
    pub user_key: String,

    /// Pushover application token
    pub app_token: String,
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("user_key", &self.user_key)
            .field("app_token", &"[REDACTED]")
            .finish()
    }
}

/// Agent configuration, read once at startup and passed by reference to
/// the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions endpoint
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API
    pub api_base_url: String,

    /// Chat model identifier
    pub chat_model: String,

    /// Full name of the person the avatar represents
    pub persona_name: String,

    /// Directory holding the background documents
    pub docs_dir: PathBuf,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum model/tool round-trips per conversation turn
    pub max_tool_rounds: usize,

    /// Notification transport credentials
    pub pushover: PushoverConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if any required variable is not
    /// set, or `ConfigError::InvalidValue` if a numeric variable fails to
    /// parse. Either is fatal at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env("OPENAI_API_KEY")?;
        let persona_name = require_env("PERSONA_NAME")?;

        let pushover = PushoverConfig {
            user_key: require_env("PUSHOVER_USER")?,
            app_token: require_env("PUSHOVER_TOKEN")?,
        };

        let api_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let docs_dir = std::env::var("DOCS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("about_me"));

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_tool_rounds = std::env::var("MAX_TOOL_ROUNDS")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_TOOL_ROUNDS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            api_key,
            api_base_url,
            chat_model,
            persona_name,
            docs_dir,
            host,
            port,
            max_tool_rounds,
            pushover,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, persona_name: String, docs_dir: PathBuf) -> Self {
        Self {
            api_key,
            api_base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            persona_name,
            docs_dir,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_tool_rounds: 8,
            pushover: PushoverConfig {
                user_key: "test-user".to_string(),
                app_token: "test-token".to_string(),
            },
        }
    }

    /// The persona's first name, used when the avatar introduces itself.
    pub fn persona_first_name(&self) -> &str {
        self.persona_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.persona_name)
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_is_leading_token() {
        let config = Config::new(
            "sk-test".to_string(),
            "Piotr Kowalczyk".to_string(),
            PathBuf::from("about_me"),
        );
        assert_eq!(config.persona_first_name(), "Piotr");
    }

    #[test]
    fn first_name_falls_back_to_full_name() {
        let config = Config::new(
            "sk-test".to_string(),
            "Cher".to_string(),
            PathBuf::from("about_me"),
        );
        assert_eq!(config.persona_first_name(), "Cher");
    }

    #[test]
    fn pushover_debug_redacts_token() {
        let pushover = PushoverConfig {
            user_key: "u-123".to_string(),
            app_token: "secret-token".to_string(),
        };
        let rendered = format!("{:?}", pushover);
        assert!(rendered.contains("u-123"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}

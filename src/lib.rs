//! # About-Me Agent
//!
//! A conversational avatar for a personal website. Visitors ask questions
//! about the site owner's career and background; answers are grounded in a
//! local folder of documents and generated by an external LLM.
//!
//! This library provides:
//! - A document corpus loader (PDF and plain-text extraction)
//! - A tool-calling chat loop against an OpenAI-compatible API
//! - Push notifications for conversational milestones (email capture,
//!   conversation summaries, unanswerable questions)
//! - An HTTP API the site's chat widget talks to
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a visitor message via the API
//! 2. Build context: persona prompt + full document corpus + history
//! 3. Call the LLM; execute any requested tool calls
//! 4. Feed results back, repeat until the model answers in text
//!
//! ## Example
//!
//! ```rust,ignore
//! use aboutme_agent::{config::Config, corpus::DocumentCorpus, agent::Agent};
//!
//! let config = Config::from_env()?;
//! let corpus = DocumentCorpus::load(&config.docs_dir)?;
//! let agent = Agent::new(config, corpus);
//! let reply = agent.chat(&conversation_id, "What do you do?", &[]).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod corpus;
pub mod llm;
pub mod notify;
pub mod tools;

pub use config::Config;
pub use corpus::DocumentCorpus;

//! HTTP API the site's chat widget talks to.

mod routes;
mod types;

pub use routes::serve;
pub use types::{ChatReply, ChatRequest, HealthResponse, HistoryMessage, HistoryRole};

//! Router and handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::agent::Agent;
use crate::config::Config;

use super::types::{to_chat_messages, ChatReply, ChatRequest, HealthResponse};

#[derive(Clone)]
struct AppState {
    agent: Arc<Agent>,
}

/// Build the router and serve until the process is stopped.
pub async fn serve(config: &Config, agent: Agent) -> anyhow::Result<()> {
    let state = AppState {
        agent: Arc::new(agent),
    };

    // The widget is embedded on the owner's site; there is no auth surface,
    // so CORS stays permissive.
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, String)> {
    let conversation_id = request
        .conversation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let history = to_chat_messages(&request.history);

    match state
        .agent
        .chat(&conversation_id, &request.message, &history)
        .await
    {
        Ok(reply) => Ok(Json(ChatReply {
            reply,
            conversation_id,
        })),
        Err(e) => {
            tracing::error!("Conversation turn failed: {:#}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))
        }
    }
}

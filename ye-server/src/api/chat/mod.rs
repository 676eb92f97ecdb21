//! Chat API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/chat/query | POST | none |
//! | /api/chat/suggestions | GET | none |

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use shared::models::{ChatQuery, ChatResponse, ChatSuggestions};

use crate::chat;
use crate::state::AppState;
use crate::utils::validation::MAX_CHAT_LEN;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/chat", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query))
        .route("/suggestions", get(suggestions))
}

/// POST /api/chat/query - always 200, apology on any failure
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<ChatQuery>, JsonRejection>,
) -> Json<ChatResponse> {
    let message = match payload {
        Ok(Json(ChatQuery {
            message: Some(message),
        })) if message.len() <= MAX_CHAT_LEN => message,
        Ok(_) => {
            tracing::warn!("Chat query without a usable message");
            return Json(chat::apology());
        }
        Err(e) => {
            tracing::warn!("Chat query rejected: {e}");
            return Json(chat::apology());
        }
    };
    tracing::info!(message = %message, "Chat query received");
    Json(chat::respond(&state.pool, &message).await)
}

/// GET /api/chat/suggestions
pub async fn suggestions() -> Json<ChatSuggestions> {
    Json(ChatSuggestions {
        suggestions: chat::SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    })
}

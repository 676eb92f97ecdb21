//! Repair Request API

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/repair-requests", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/user/{user_id}", get(handler::list_for_user))
        .route("/status/{status}", get(handler::list_by_status))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::update_status))
}

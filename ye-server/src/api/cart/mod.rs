//! Cart API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::add))
        .route(
            "/user/{user_id}",
            get(handler::list_for_user).delete(handler::clear),
        )
        .route("/{id}", put(handler::update).delete(handler::remove))
}

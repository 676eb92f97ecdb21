//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`products`] - product catalog
//! - [`categories`] - product categories
//! - [`cart`] - per-user shopping carts
//! - [`orders`] - checkout and order tracking
//! - [`repair_requests`] - equipment repair tickets
//! - [`chat`] - natural-language product search
//! - [`auth`] - login tokens

pub mod auth;
pub mod cart;
pub mod categories;
pub mod chat;
pub mod health;
pub mod orders;
pub mod products;
pub mod repair_requests;

use axum::{Json, Router};
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::db::RepoResult;
use crate::state::AppState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no tower middleware, no state attached
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(repair_requests::router())
        .merge(chat::router())
        .merge(auth::router(state))
        .merge(health::router())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the fully configured application
///
/// Used by the HTTP server and by the router tests.
pub fn build_app(state: AppState, cors_origin: &str) -> Router {
    build_router(&state)
        .layer(cors_layer(cors_origin))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}

/// List endpoints answer with an empty collection when the store fails
pub(crate) fn or_empty<T>(what: &str, result: RepoResult<Vec<T>>) -> Json<Vec<T>> {
    match result {
        Ok(items) => Json(items),
        Err(e) => {
            tracing::error!("Failed to list {what}: {e}");
            Json(Vec::new())
        }
    }
}

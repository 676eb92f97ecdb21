//! Auth API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/login | POST | none, rate limited |
//! | /api/auth/verify | POST | none |
//! | /api/auth/me | GET | bearer |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{login_rate_limit, require_auth};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/auth", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/login", post(handler::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    login
        .route("/verify", post(handler::verify))
        .merge(
            Router::new()
                .route("/me", get(handler::me))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_auth,
                )),
        )
}

//! Login throttling
//!
//! Attempts are counted per client in fixed windows. The client is the TCP
//! peer address. `X-Forwarded-For` is only believed when the server is
//! configured to run behind a reverse proxy that sets it.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const LOGIN_ROUTE: &str = "login";
const LOGIN_ATTEMPTS: u32 = 5;
const LOGIN_WINDOW: Duration = Duration::from_secs(60);

/// Upper bound on tracked (route, client) windows
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Windows idle this long are dropped by [`RateLimiter::cleanup`]
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Peer IP, `None` when the transport did not report one
pub type ClientKey = Option<IpAddr>;

struct Window {
    attempts: u32,
    opened: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(&'static str, ClientKey), Window>>>,
    trust_forwarded_for: bool,
    max_clients: usize,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RateLimiter {
    pub fn new(trust_forwarded_for: bool) -> Self {
        Self {
            windows: Arc::default(),
            trust_forwarded_for,
            max_clients: MAX_TRACKED_CLIENTS,
        }
    }

    /// Count one attempt; `false` once the client is over `limit` in the current window.
    ///
    /// When the table is full, windows that have already expired are
    /// dropped. If it is still full, unknown clients are refused until
    /// space frees up; clients already tracked keep their budget.
    pub async fn check(
        &self,
        route: &'static str,
        client: ClientKey,
        limit: u32,
        window: Duration,
    ) -> bool {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let key = (route, client);

        if !windows.contains_key(&key) && windows.len() >= self.max_clients {
            windows.retain(|_, w| now.duration_since(w.opened) < window);
            if windows.len() >= self.max_clients {
                tracing::warn!(route, tracked = windows.len(), "Rate limiter table full");
                return false;
            }
        }

        let w = windows.entry(key).or_insert(Window {
            attempts: 0,
            opened: now,
        });
        if now.duration_since(w.opened) >= window {
            w.attempts = 0;
            w.opened = now;
        }
        w.attempts = w.attempts.saturating_add(1);
        w.attempts <= limit
    }

    /// Drop windows opened more than five minutes ago
    pub async fn cleanup(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .await
            .retain(|_, w| now.duration_since(w.opened) < STALE_AFTER);
    }

    /// Who a request counts against
    pub fn client_of(&self, request: &Request) -> ClientKey {
        if self.trust_forwarded_for
            && let Some(ip) = forwarded_client(request)
        {
            return Some(ip);
        }
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    }

    #[cfg(test)]
    fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// Left-most `X-Forwarded-For` entry, if it parses as an address
fn forwarded_client(request: &Request) -> Option<IpAddr> {
    request
        .headers()
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Five login attempts per client per minute
pub async fn login_rate_limit(
    State(state): State<crate::state::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limiter = &state.rate_limiter;
    let client = limiter.client_of(&request);
    if !limiter
        .check(LOGIN_ROUTE, client, LOGIN_ATTEMPTS, LOGIN_WINDOW)
        .await
    {
        tracing::warn!(client = ?client, "Login rate limit exceeded");
        return Err(AppError::too_many_attempts());
    }
    Ok(next.run(request).await)
}

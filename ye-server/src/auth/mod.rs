//! Authentication
//!
//! - `jwt`: token issue and verification
//! - `middleware`: bearer-token guard that injects `CurrentUser`
//! - `rate_limit`: per-client limiter for the login route

pub mod jwt;
pub mod middleware;
pub mod rate_limit;

pub use jwt::{Claims, create_token, verify_token};
pub use middleware::require_auth;
pub use rate_limit::{RateLimiter, login_rate_limit};

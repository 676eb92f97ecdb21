//! Yashoda Engineers storefront server
//!
//! Catalog, carts, checkout, repair tickets, login tokens and a rule-based
//! chat search over one SQLite database.

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use state::AppState;

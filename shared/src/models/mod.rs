//! Data models
//!
//! Shared between the server and its HTTP clients. JSON field names are
//! camelCase to match the storefront frontend. Row ids are `i64`
//! (SQLite INTEGER PRIMARY KEY); users and repair requests use UUIDs.

pub mod auth;
pub mod cart;
pub mod category;
pub mod chat;
pub mod order;
pub mod product;
pub mod repair_request;

// Re-exports
pub use auth::*;
pub use cart::*;
pub use category::*;
pub use chat::*;
pub use order::*;
pub use product::*;
pub use repair_request::*;

//! Shared types for the Yashoda Engineers storefront
//!
//! Domain models, the unified error system and small utilities used by the
//! HTTP server and its tests.

pub mod error;
pub mod models;
pub mod util;

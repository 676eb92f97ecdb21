//! Multi-step business flows that span several repositories

pub mod checkout;

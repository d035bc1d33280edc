//! High-level API wrappers for the rental backend
//!
//! This module adds session bookkeeping on top of the raw HTTP client.

mod auth;

pub use auth::*;

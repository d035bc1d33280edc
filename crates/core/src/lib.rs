//! Rentdesk Core - Shared data models, money types, and errors

pub mod errors;
pub mod models;
pub mod types;

pub use errors::{Error, ErrorKind, Result};
pub use models::*;
pub use types::*;

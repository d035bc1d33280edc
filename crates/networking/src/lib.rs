//! Rentdesk Networking - session handling, HTTP client, and API wrappers

pub mod api;
pub mod config;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use http::RentalClient;
pub use session::{Session, SessionStatus};

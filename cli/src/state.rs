use crate::config::AppConfig;
use rentdesk_core::Result;
use rentdesk_networking::{RentalClient, Session};
use std::sync::Arc;
use tracing::debug;

/// Shared handles for every command
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<Session>,
    pub client: Arc<RentalClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let session = Arc::new(Session::persistent(config.session_file.clone())?);
        debug!("Using session file {}", config.session_file.display());
        let client = Arc::new(RentalClient::new(config.client_config(), Arc::clone(&session))?);
        Ok(Self {
            config,
            session,
            client,
        })
    }
}

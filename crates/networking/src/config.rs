//! Client-side connection settings

use std::time::Duration;

/// Production backend used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "https://vehicle-rental-backend-deployment.onrender.com";

/// Every request is abandoned after this long and reported as a timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`crate::RentalClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL for a backend path such as `/rentals/active`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base(), path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

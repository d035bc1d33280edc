//! Runtime configuration read from the environment

use rentdesk_core::{Error, Result, Usd};
use rentdesk_engine::WorkflowConfig;
use rentdesk_networking::config::{DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT};
use rentdesk_networking::ClientConfig;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound for `RENTDESK_LATE_FEE_RATE`
pub const MAX_LATE_FEE_RATE: Usd = Usd::from_cents(1_000_000);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub timeout: Duration,
    pub late_fee_rate: Usd,
    pub log_level: String,
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Read `.env` if present, then the `RENTDESK_*` variables
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let backend_url =
            env::var("RENTDESK_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(Error::ConfigError(
                "RENTDESK_BACKEND_URL must start with http:// or https://".to_string(),
            ));
        }

        let timeout = match env::var("RENTDESK_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    Error::ConfigError("RENTDESK_TIMEOUT_SECS must be a positive integer".to_string())
                })?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let late_fee_rate = match env::var("RENTDESK_LATE_FEE_RATE") {
            Ok(raw) => Usd::from_str(&raw)
                .ok()
                .filter(|rate| !rate.is_negative() && *rate <= MAX_LATE_FEE_RATE)
                .ok_or_else(|| {
                    Error::ConfigError(format!(
                        "RENTDESK_LATE_FEE_RATE must be an amount between $0.00 and {}",
                        MAX_LATE_FEE_RATE
                    ))
                })?,
            Err(_) => WorkflowConfig::default().daily_rate,
        };

        let log_level = env::var("RENTDESK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_file = env::var("RENTDESK_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        Ok(Self {
            backend_url,
            timeout,
            late_fee_rate,
            log_level,
            session_file,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.backend_url.clone()).with_timeout(self.timeout)
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            daily_rate: self.late_fee_rate,
            submit_timeout: self.timeout,
            ..WorkflowConfig::default()
        }
    }
}

fn default_session_file() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("rentdesk"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("session.json")
}

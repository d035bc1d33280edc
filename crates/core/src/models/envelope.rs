//! Response envelopes shared by most backend endpoints

use serde::{Deserialize, Serialize};

/// `{ "success": .., "message": .., "data": .. }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Only an explicit `"success": false` counts as a rejection
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}

/// Error body returned with non-2xx statuses: `{ "error": .. }` or `{ "message": .. }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse a raw body; anything that is not a JSON object yields an empty body
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Backend-provided text, preferring `error` over `message`
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

//! User and authentication models

use serde::{Deserialize, Serialize};

/// Identity returned by `POST /verify-token`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: serde_json::Value, // Can be number or string
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// Outcome of validating a token against the backend
#[derive(Debug, Clone, PartialEq)]
pub struct TokenVerification {
    pub valid: bool,
    pub user: Option<User>,
}

impl TokenVerification {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /logout`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub username: String,
    pub logout_reason: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

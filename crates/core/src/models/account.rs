//! Account creation and profile models (`POST /signup`, `PUT /profile`)

use crate::errors::{Error, Result};
use crate::types::Usd;
use serde::{Deserialize, Serialize};

const MAX_BIO_CHARS: usize = 500;
const MAX_HEADLINE_CHARS: usize = 100;

/// Body of `POST /signup`; optional details go over the wire as empty strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub license: String,
    pub license_state: String,
    pub license_expiry: String,
    pub date_of_birth: String,
    pub current_balance: Usd,
}

impl SignupRequest {
    /// Local checks before the backend sees the form
    pub fn validate(&self, confirm_password: &str) -> Result<()> {
        if self.password != confirm_password {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }
        let required = [
            &self.username,
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(Error::Validation(
                "Username, first name, last name, email, and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `PUT /profile`; only the fields being changed are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

fn trimmed(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ProfileUpdate {
    /// Trim every field, drop the blank ones and check what remains
    pub fn validated(self) -> Result<Self> {
        let update = ProfileUpdate {
            bio: trimmed(self.bio),
            city: trimmed(self.city),
            country: trimmed(self.country),
            headline: trimmed(self.headline),
            picture: trimmed(self.picture),
        };

        if let Some(picture) = &update.picture {
            if reqwest::Url::parse(picture).is_err() {
                return Err(Error::Validation("Please enter a valid URL".to_string()));
            }
        }
        if update.bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_CHARS) {
            return Err(Error::Validation(
                "Bio must be less than 500 characters".to_string(),
            ));
        }
        if update
            .headline
            .as_ref()
            .is_some_and(|h| h.chars().count() > MAX_HEADLINE_CHARS)
        {
            return Err(Error::Validation(
                "Headline must be less than 100 characters".to_string(),
            ));
        }
        if update == ProfileUpdate::default() {
            return Err(Error::Validation("Nothing to update".to_string()));
        }
        Ok(update)
    }
}

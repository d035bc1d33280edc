//! Rental and vehicle-return models

use crate::types::date::deserialize_date;
use crate::types::Usd;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of a rental as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalStatus {
    Active,
    Completed,
    Cancelled,
    /// Anything the backend sends that we don't model
    Other(String),
}

impl RentalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Completed => "completed",
            RentalStatus::Cancelled => "cancelled",
            RentalStatus::Other(raw) => raw,
        }
    }
}

impl Serialize for RentalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RentalStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "active" => RentalStatus::Active,
            "completed" | "returned" => RentalStatus::Completed,
            "cancelled" | "canceled" => RentalStatus::Cancelled,
            _ => RentalStatus::Other(raw),
        })
    }
}

/// A rental owned by the backend; held read-only for the duration of a return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub rental_id: i64,
    pub vehicle_id: i64,
    #[serde(default)]
    pub vehicle_name: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    /// Expected return date
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    /// Already paid when the rental was booked
    pub total_cost: Usd,
    pub status: RentalStatus,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl Rental {
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }
}

/// Response from `GET /rentals/active`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRentalResponse {
    #[serde(default)]
    pub has_active_rental: bool,
    #[serde(default)]
    pub data: Option<Rental>,
}

impl ActiveRentalResponse {
    pub fn none() -> Self {
        Self {
            has_active_rental: false,
            data: None,
        }
    }

    pub fn active(rental: Rental) -> Self {
        Self {
            has_active_rental: true,
            data: Some(rental),
        }
    }

    /// The active rental, if the backend reports one
    pub fn into_rental(self) -> Option<Rental> {
        if self.has_active_rental {
            self.data
        } else {
            None
        }
    }
}

/// Body of `POST /rentals/{id}/check-return`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityRequest {
    pub return_date: NaiveDate,
}

/// The backend's authoritative verdict on a prospective return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityDecision {
    pub can_return: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_late: bool,
    #[serde(default)]
    pub days_late: u32,
    #[serde(default)]
    pub late_fees: Usd,
}

/// Body of `POST /rentals/return`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub rental_id: i64,
    pub return_date: NaiveDate,
    pub return_notes: String,
}

/// What the backend charged and the balance it left, never computed locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceipt {
    #[serde(default)]
    pub final_amount: Option<Usd>,
    #[serde(default)]
    pub new_balance: Option<Usd>,
    #[serde(default)]
    pub message: Option<String>,
}

//! Vehicle booking models (`POST /rent`)

use crate::types::Usd;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /rent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub additional_notes: String,
}

/// Response from `POST /rent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    #[serde(default)]
    pub rental_id: Option<i64>,
    #[serde(default)]
    pub total_cost: Option<Usd>,
    #[serde(default)]
    pub message: Option<String>,
}

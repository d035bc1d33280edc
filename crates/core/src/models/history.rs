//! Rental history models (`GET /rentals/user`)

use super::rental::RentalStatus;
use crate::types::date::{deserialize_date, deserialize_opt_date};
use crate::types::Usd;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A past or current rental on the user's account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRecord {
    pub rental_id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub vehicle_name: String,
    #[serde(default)]
    pub vehicle_make: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    #[serde(default)]
    pub vehicle_year: Option<i32>,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub actual_return_date: Option<NaiveDate>,
    pub total_cost: Usd,
    pub status: RentalStatus,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub late_fees: Option<Usd>,
    #[serde(default)]
    pub is_late: Option<bool>,
}

/// `{ "rentals": [..] }` or a bare array; anything else reads as no rentals
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RentalHistoryResponse {
    Wrapped { rentals: Vec<RentalRecord> },
    Bare(Vec<RentalRecord>),
    Unrecognized(serde_json::Value),
}

impl RentalHistoryResponse {
    pub fn into_records(self) -> Vec<RentalRecord> {
        match self {
            RentalHistoryResponse::Wrapped { rentals } | RentalHistoryResponse::Bare(rentals) => {
                rentals
            }
            RentalHistoryResponse::Unrecognized(_) => Vec::new(),
        }
    }
}

//! Late-fee ledger models (`/late-fees/*`)

use crate::types::Usd;
use serde::{Deserialize, Serialize};

/// A late fee recorded against a past rental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LateFee {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    pub rental_id: i64,
    #[serde(default)]
    pub days_late: u32,
    pub total_cost: Usd,
    #[serde(default)]
    pub amount_paid: Usd,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl LateFee {
    /// Amount still owed, never negative
    pub fn remaining(&self) -> Usd {
        self.total_cost.excess_over(self.amount_paid).unwrap_or(Usd::ZERO)
    }

    pub fn is_fully_paid(&self) -> bool {
        self.amount_paid >= self.total_cost
    }
}

/// Body of `POST /late-fees/pay`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LateFeePaymentRequest {
    pub late_fee_id: i64,
    pub payment_amount: Usd,
    pub payment_notes: String,
}

/// `data` of a successful late-fee payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LateFeePaymentReceipt {
    pub new_balance: Usd,
}

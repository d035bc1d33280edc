//! Account balance models (`/balance*`)

use crate::types::Usd;
use serde::{Deserialize, Serialize};

/// Response from `GET /balance`
///
/// Two shapes are in use: `{ "balance": "2230.00", "message": .. }` and the
/// enveloped `{ "success": true, "data": { "currentBalance": .. } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub balance: Option<Usd>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<BalanceData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceData {
    pub current_balance: Usd,
}

impl BalanceResponse {
    pub fn amount(&self) -> Option<Usd> {
        self.balance
            .or_else(|| self.data.as_ref().map(|d| d.current_balance))
    }
}

/// Body of `POST /balance/add` and `POST /balance/debit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceChangeRequest {
    pub amount: Usd,
    pub description: String,
}

/// Response from `POST /balance/add` and `POST /balance/debit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    #[serde(default)]
    pub message: Option<String>,
    pub new_balance: Usd,
    #[serde(default, alias = "debitedAmount")]
    pub added_amount: Option<Usd>,
}

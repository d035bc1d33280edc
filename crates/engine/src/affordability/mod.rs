//! Affordability checks for vehicle returns
//!
//! The backend decides whether a return may go ahead. The balance we hold
//! locally only feeds advisory output such as the "add $10.00 to cover the
//! late fee" hint; it never overrules the backend.

use crate::backend::RentalBackend;
use crate::fees::{self, LateFeeEstimate};
use chrono::NaiveDate;
use rentdesk_core::{AffordabilityDecision, Error, Result, Usd};
use tracing::{info, warn};

pub const CHECK_FAILED_MESSAGE: &str = "Affordability check failed, please retry";
const REFUSED_FALLBACK: &str = "Cannot return vehicle at this time";

/// The backend's decision together with the balance it was weighed against
#[derive(Debug, Clone, PartialEq)]
pub struct AffordabilityReport {
    pub decision: AffordabilityDecision,
    /// Last balance we saw, if any
    pub balance: Option<Usd>,
}

impl AffordabilityReport {
    pub fn new(decision: AffordabilityDecision, balance: Option<Usd>) -> Self {
        Self { decision, balance }
    }

    pub fn can_return(&self) -> bool {
        self.decision.can_return
    }

    /// How much more money the late fee needs, the "required additional amount"
    pub fn shortfall(&self) -> Option<Usd> {
        shortfall(self.balance?, self.decision.late_fees)
    }

    pub fn is_insufficient(&self) -> bool {
        self.shortfall().is_some()
    }

    pub fn insufficient_funds(&self) -> Option<Error> {
        let available = self.balance?;
        self.shortfall().map(|_| Error::InsufficientFunds {
            required: self.decision.late_fees,
            available,
        })
    }

    /// Ok when the backend allows the return, otherwise its message verbatim
    ///
    /// A refusal without a message falls back to the local shortfall when
    /// there is one.
    pub fn permit(&self) -> Result<()> {
        if self.decision.can_return {
            return Ok(());
        }

        let message = self
            .decision
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        match message {
            Some(message) => Err(Error::Rejected(message.to_string())),
            None => Err(self
                .insufficient_funds()
                .unwrap_or_else(|| Error::Rejected(REFUSED_FALLBACK.to_string()))),
        }
    }

    /// Backend fee figures in estimate form, replacing any local estimate
    pub fn estimate(&self, fallback_rate: Usd) -> LateFeeEstimate {
        fees::confirmed(&self.decision, fallback_rate)
    }
}

/// Ask the backend whether `rental_id` can be returned on `return_date`
///
/// A refusal is not an error here; callers inspect [`AffordabilityReport::permit`].
pub async fn check_affordability<B: RentalBackend>(
    backend: &B,
    rental_id: i64,
    return_date: NaiveDate,
    balance: Option<Usd>,
) -> Result<AffordabilityReport> {
    let decision = match backend.check_return(rental_id, return_date).await {
        Ok(decision) => decision,
        Err(Error::NetworkError(detail)) => {
            warn!("Affordability check for rental {} failed: {}", rental_id, detail);
            return Err(Error::NetworkError(CHECK_FAILED_MESSAGE.to_string()));
        }
        Err(e) => return Err(e),
    };

    info!(
        "Rental {} return on {}: allowed={}, late fees {}",
        rental_id, return_date, decision.can_return, decision.late_fees
    );
    Ok(AffordabilityReport::new(decision, balance))
}

/// `amount_due - balance` when the balance does not cover it
pub fn shortfall(balance: Usd, amount_due: Usd) -> Option<Usd> {
    amount_due.excess_over(balance)
}

/// Local hint shown before submitting; never a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The balance covers the estimated fee
    Covered,
    /// The estimated fee exceeds the balance by this much
    Short(Usd),
    /// No balance known yet
    Unknown,
}

pub fn precheck(balance: Option<Usd>, estimate: &LateFeeEstimate) -> Advisory {
    match balance {
        None => Advisory::Unknown,
        Some(balance) => match shortfall(balance, estimate.fee_amount) {
            Some(short) => Advisory::Short(short),
            None => Advisory::Covered,
        },
    }
}

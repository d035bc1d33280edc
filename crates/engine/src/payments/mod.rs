//! Late-fee payments and balance top-ups
//!
//! Local checks here only spare the user a round trip; the backend still
//! applies its own rules and its figures are the ones we keep.

use crate::backend::RentalBackend;
use rentdesk_core::{
    BalanceChange, BalanceChangeRequest, Error, LateFee, LateFeePaymentRequest, Result, Usd,
};
use std::str::FromStr;
use tracing::info;

pub const DEFAULT_ADD_DESCRIPTION: &str = "Balance addition";
pub const DEFAULT_WITHDRAW_DESCRIPTION: &str = "Balance withdrawal";

/// Sum of what is still owed across `fees`
pub fn outstanding_total(fees: &[LateFee]) -> Result<Usd> {
    fees.iter()
        .map(LateFee::remaining)
        .try_fold(Usd::ZERO, |acc, owed| acc.checked_add(owed))
        .ok_or_else(|| Error::InvalidData("Outstanding late fees are out of range".to_string()))
}

/// Fees that still have something left to pay
pub fn unpaid(fees: &[LateFee]) -> impl Iterator<Item = &LateFee> {
    fees.iter().filter(|fee| !fee.is_fully_paid())
}

/// Pay off whatever remains on `fee`; returns the new balance
pub async fn pay_late_fee<B: RentalBackend>(
    backend: &B,
    fee: &LateFee,
    balance: Usd,
) -> Result<Usd> {
    let remaining = fee.remaining();
    if fee.is_fully_paid() || !remaining.is_positive() {
        return Err(Error::Validation(format!(
            "Late fee #{} is already paid",
            fee.id
        )));
    }
    if balance < remaining {
        return Err(Error::InsufficientFunds {
            required: remaining,
            available: balance,
        });
    }

    let request = LateFeePaymentRequest {
        late_fee_id: fee.id,
        payment_amount: remaining,
        payment_notes: format!("Full payment for late fee #{}", fee.id),
    };
    let new_balance = backend.pay_late_fee(&request).await?;
    info!("Paid {} on late fee #{}", remaining, fee.id);
    Ok(new_balance)
}

pub async fn add_funds<B: RentalBackend>(
    backend: &B,
    amount: Usd,
    description: Option<&str>,
) -> Result<BalanceChange> {
    ensure_positive(amount)?;
    let request = BalanceChangeRequest {
        amount,
        description: description_or(description, DEFAULT_ADD_DESCRIPTION),
    };
    let change = backend.add_balance(&request).await?;
    info!("Added {} to balance, now {}", amount, change.new_balance);
    Ok(change)
}

pub async fn withdraw_funds<B: RentalBackend>(
    backend: &B,
    amount: Usd,
    balance: Usd,
    description: Option<&str>,
) -> Result<BalanceChange> {
    ensure_positive(amount)?;
    if amount > balance {
        return Err(Error::InsufficientFunds {
            required: amount,
            available: balance,
        });
    }

    let request = BalanceChangeRequest {
        amount,
        description: description_or(description, DEFAULT_WITHDRAW_DESCRIPTION),
    };
    let change = backend.debit_balance(&request).await?;
    info!("Withdrew {} from balance, now {}", amount, change.new_balance);
    Ok(change)
}

/// Parse a user-entered amount such as "25", "25.50" or "$25.50"
pub fn parse_amount(text: &str) -> Result<Usd> {
    let amount = Usd::from_str(text)
        .map_err(|_| Error::Validation(format!("'{}' is not a valid amount", text.trim())))?;
    ensure_positive(amount)?;
    Ok(amount.rounded())
}

fn ensure_positive(amount: Usd) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(Error::Validation("Please enter a valid amount".to_string()))
    }
}

fn description_or(description: Option<&str>, fallback: &str) -> String {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

use crate::display;
use crate::AppState;
use anyhow::anyhow;
use rentdesk_engine::payments;

pub async fn list(state: &AppState, unpaid_only: bool) -> anyhow::Result<()> {
    let mut fees = state.client.late_fees().await?;
    if unpaid_only {
        fees.retain(|fee| !fee.is_fully_paid());
    }

    println!("{}", display::late_fees(&fees));
    let outstanding = payments::outstanding_total(&fees)?;
    if outstanding.is_positive() {
        println!("Outstanding: {}", outstanding);
    }
    Ok(())
}

pub async fn pay(state: &AppState, fee_id: i64) -> anyhow::Result<()> {
    let (fees, balance) = tokio::join!(state.client.late_fees(), state.client.balance());
    let fees = fees?;
    let balance = balance?;

    let fee = fees
        .iter()
        .find(|fee| fee.id == fee_id)
        .ok_or_else(|| anyhow!("Late fee #{} not found", fee_id))?;

    let new_balance = payments::pay_late_fee(state.client.as_ref(), fee, balance).await?;
    println!("Paid {} on late fee #{}", fee.remaining(), fee.id);
    println!("{}", display::balance(Some(new_balance)));
    Ok(())
}

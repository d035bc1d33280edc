use crate::display;
use crate::AppState;
use rentdesk_core::Usd;
use rentdesk_engine::payments;

pub async fn show(state: &AppState) -> anyhow::Result<()> {
    let balance = state.client.balance().await?;
    println!("{}", display::balance(Some(balance)));
    Ok(())
}

pub async fn add(state: &AppState, amount: Usd, description: Option<String>) -> anyhow::Result<()> {
    let change = payments::add_funds(state.client.as_ref(), amount, description.as_deref()).await?;
    if let Some(message) = &change.message {
        println!("{}", message);
    }
    println!("{}", display::balance(Some(change.new_balance)));
    Ok(())
}

pub async fn withdraw(state: &AppState, amount: Usd, description: Option<String>) -> anyhow::Result<()> {
    let balance = state.client.balance().await?;
    let change =
        payments::withdraw_funds(state.client.as_ref(), amount, balance, description.as_deref())
            .await?;
    if let Some(message) = &change.message {
        println!("{}", message);
    }
    println!("{}", display::balance(Some(change.new_balance)));
    Ok(())
}

use super::confirm;
use crate::display;
use crate::AppState;
use anyhow::{anyhow, bail};
use chrono::{Local, NaiveDate};
use rentdesk_engine::affordability::precheck;
use rentdesk_engine::{fees, ReturnState, ReturnWorkflow};
use rentdesk_networking::SessionStatus;
use std::sync::Arc;
use tracing::{debug, info};

/// Local late-fee estimate against `due` or the active rental's end date
pub async fn estimate(
    state: &AppState,
    due: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let return_date = return_date.unwrap_or_else(|| Local::now().date_naive());
    let due = match due {
        Some(due) => due,
        None => {
            let rental = state
                .client
                .active_rental()
                .await?
                .into_rental()
                .ok_or_else(|| anyhow!("No active rental found"))?;
            println!("{}", display::rental(&rental));
            rental.end_date
        }
    };

    let est = fees::estimate(due, return_date, state.config.late_fee_rate);
    println!("{}", display::estimate(&est));
    Ok(())
}

pub struct ReturnArgs {
    pub rental_id: i64,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub yes: bool,
}

pub async fn return_vehicle(state: &AppState, args: ReturnArgs) -> anyhow::Result<()> {
    let workflow = ReturnWorkflow::new(
        Arc::clone(&state.client),
        Arc::clone(&state.session),
        args.rental_id,
        state.config.workflow_config(),
    );

    let mut states = workflow.subscribe();
    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let current = states.borrow_and_update().clone();
            debug!("Return workflow: {}", current);
        }
    });

    let result = drive(state, &workflow, args).await;
    watcher.abort();
    result
}

async fn drive(
    state: &AppState,
    workflow: &ReturnWorkflow<rentdesk_networking::RentalClient>,
    args: ReturnArgs,
) -> anyhow::Result<()> {
    if let Err(e) = workflow.load().await {
        println!("{}", display::state(&workflow.state()));
        if e.requires_sign_in() {
            wait_for_sign_out(state).await;
        }
        return Err(e.into());
    }

    if let Some(date) = args.return_date {
        workflow.set_return_date(date);
    }
    if let Some(notes) = args.notes {
        workflow.set_notes(notes);
    }

    let view = workflow.snapshot();
    println!("{}", display::view(&view));
    if let Some(est) = &view.estimate {
        if let Some(hint) = display::advisory(precheck(view.balance, est)) {
            println!("{}", hint);
        }
    }

    if !args.yes && !confirm("Return this vehicle?")? {
        println!("Return cancelled");
        return Ok(());
    }

    match workflow.submit().await {
        Ok(outcome) => {
            info!("Return of rental {} complete", outcome.rental_id);
            println!("{}", display::outcome(&outcome));
            Ok(())
        }
        Err(e) => {
            let view = workflow.snapshot();
            if let Some(report) = &view.affordability {
                println!("{}", display::affordability(report));
            }
            if let ReturnState::Ready { notice: Some(notice) } = &view.state {
                bail!("{}", notice);
            }
            println!("{}", display::state(&view.state));
            if e.requires_sign_in() {
                wait_for_sign_out(state).await;
            }
            Err(e.into())
        }
    }
}

async fn wait_for_sign_out(state: &AppState) {
    let mut status = state.session.subscribe();
    if status.wait_for(|s| *s == SessionStatus::Expired).await.is_ok() {
        println!("Signed out. Run `rentdesk signin` to sign in again.");
    }
}

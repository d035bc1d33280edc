use super::confirm;
use crate::display;
use crate::AppState;
use anyhow::bail;
use chrono::NaiveDate;
use rentdesk_engine::booking;
use tracing::info;

/// Show one page of available vehicles; `page` is one-based
pub async fn list(state: &AppState, page: u32, size: u32) -> anyhow::Result<()> {
    if page == 0 || size == 0 {
        bail!("--page and --size start at 1");
    }

    let fleet = state.client.available_fleet(page - 1, size).await?;
    println!("{}", display::fleet(&fleet));
    if fleet.has_next() {
        println!("More: rentdesk fleet --page {} --size {}", page + 1, size);
    }
    Ok(())
}

pub struct RentArgs {
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub yes: bool,
}

pub async fn rent(state: &AppState, args: RentArgs) -> anyhow::Result<()> {
    let request = booking::booking_request(
        args.vehicle_id,
        args.start_date,
        args.end_date,
        args.notes.as_deref(),
    )?;

    let vehicle = booking::find_vehicle(state.client.as_ref(), request.vehicle_id).await?;
    println!("{}", display::vehicle(&vehicle));
    println!("From {} to {}", request.start_date, request.end_date);

    if !args.yes && !confirm("Rent this vehicle?")? {
        println!("Booking cancelled");
        return Ok(());
    }

    let receipt = booking::book_vehicle(state.client.as_ref(), &vehicle, &request).await?;
    info!("Vehicle {} booked", request.vehicle_id);
    println!("{}", display::booking(&receipt));
    Ok(())
}

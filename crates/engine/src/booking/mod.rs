//! Booking a vehicle from the fleet
//!
//! The backend prices the rental and checks availability for the dates; we
//! only make sure the request is well formed and the vehicle is listed.

use crate::backend::RentalBackend;
use chrono::NaiveDate;
use rentdesk_core::{BookingReceipt, BookingRequest, Error, Result, Vehicle};
use tracing::{debug, info};

/// Page size used when scanning the fleet for a single vehicle
pub const LOOKUP_PAGE_SIZE: u32 = 100;

/// Build a booking, rejecting date ranges that end before they start
pub fn booking_request(
    vehicle_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    notes: Option<&str>,
) -> Result<BookingRequest> {
    if vehicle_id <= 0 {
        return Err(Error::Validation("Select a vehicle to rent".to_string()));
    }
    if end_date < start_date {
        return Err(Error::Validation(
            "End date must be on or after the start date".to_string(),
        ));
    }

    Ok(BookingRequest {
        vehicle_id,
        start_date,
        end_date,
        additional_notes: notes.map(str::trim).unwrap_or_default().to_string(),
    })
}

/// Walk the available fleet page by page until `vehicle_id` turns up
pub async fn find_vehicle<B: RentalBackend>(backend: &B, vehicle_id: i64) -> Result<Vehicle> {
    let mut page = 0;
    loop {
        let listing = backend.available_fleet(page, LOOKUP_PAGE_SIZE).await?;
        if let Some(vehicle) = listing
            .vehicles
            .iter()
            .find(|v| v.key() == Some(vehicle_id))
        {
            return Ok(vehicle.clone());
        }
        if !listing.has_next() {
            debug!("Vehicle {} not in {} fleet pages", vehicle_id, page + 1);
            return Err(Error::Validation("Vehicle not found".to_string()));
        }
        page += 1;
    }
}

/// Book `vehicle`, previously located with [`find_vehicle`]
pub async fn book_vehicle<B: RentalBackend>(
    backend: &B,
    vehicle: &Vehicle,
    request: &BookingRequest,
) -> Result<BookingReceipt> {
    if vehicle.key() != Some(request.vehicle_id) {
        return Err(Error::Validation(
            "Booking does not match the selected vehicle".to_string(),
        ));
    }

    let receipt = backend.rent(request).await?;
    info!(
        "Booked {} from {} to {} as rental {:?}",
        vehicle.display_name(),
        request.start_date,
        request.end_date,
        receipt.rental_id
    );
    Ok(receipt)
}

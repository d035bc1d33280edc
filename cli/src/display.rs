//! Text rendering for the terminal
//!
//! Everything here formats values it is handed; no figure is computed
//! beyond what the engine already reports.

use rentdesk_core::{BookingReceipt, FleetPage, LateFee, Rental, RentalRecord, Usd, Vehicle};
use rentdesk_engine::affordability::{Advisory, AffordabilityReport};
use rentdesk_engine::{FeeSource, LateFeeEstimate, ReturnOutcome, ReturnState, ReturnView};
use std::fmt::Write;

pub fn balance(amount: Option<Usd>) -> String {
    match amount {
        Some(amount) => format!("Balance: {}", amount),
        None => "Balance: unavailable".to_string(),
    }
}

fn source_label(source: FeeSource) -> &'static str {
    match source {
        FeeSource::Local => "estimate",
        FeeSource::Confirmed => "confirmed",
    }
}

pub fn estimate(estimate: &LateFeeEstimate) -> String {
    let label = source_label(estimate.source);
    if !estimate.is_late {
        return format!("On time, no late fee ({})", label);
    }

    let days = if estimate.days_late == 1 { "day" } else { "days" };
    format!(
        "{} {} late at {}/day: {} ({})",
        estimate.days_late, days, estimate.daily_rate, estimate.fee_amount, label
    )
}

pub fn advisory(advisory: Advisory) -> Option<String> {
    match advisory {
        Advisory::Short(short) => Some(format!(
            "Your balance may not cover the late fee; you may need {} more",
            short
        )),
        Advisory::Covered | Advisory::Unknown => None,
    }
}

pub fn affordability(report: &AffordabilityReport) -> String {
    let mut out = String::new();
    if report.can_return() {
        out.push_str("Return allowed");
    } else {
        out.push_str("Return not allowed");
    }
    if let Some(message) = report.decision.message.as_deref().filter(|m| !m.is_empty()) {
        let _ = write!(out, ": {}", message);
    }
    if let Some(short) = report.shortfall() {
        let _ = write!(out, "\nAdd {} to cover the late fee", short);
    }
    out
}

pub fn rental(rental: &Rental) -> String {
    format!(
        "Rental #{}: {} ({}), {} to {}, {} [{}]",
        rental.rental_id,
        rental.vehicle_name,
        rental.vehicle_type,
        rental.start_date,
        rental.end_date,
        rental.total_cost,
        rental.status.as_str()
    )
}

pub fn state(state: &ReturnState) -> String {
    match state {
        ReturnState::Idle => "Idle".to_string(),
        ReturnState::LoadingRental => "Loading rental...".to_string(),
        ReturnState::Ready { notice: None } => "Ready to return".to_string(),
        ReturnState::Ready { notice: Some(n) } => format!("Ready to return ({})", n),
        ReturnState::Validating => "Checking the form...".to_string(),
        ReturnState::CheckingAffordability => "Checking late fees with the server...".to_string(),
        ReturnState::Submitting => "Submitting return...".to_string(),
        ReturnState::Succeeded(_) => "Vehicle returned".to_string(),
        ReturnState::Failed(f) if f.requires_sign_in() => {
            format!("{} You will be signed out shortly.", f)
        }
        ReturnState::Failed(f) => format!("Return failed: {}", f),
    }
}

pub fn outcome(outcome: &ReturnOutcome) -> String {
    let mut out = outcome
        .message
        .clone()
        .unwrap_or_else(|| "Vehicle returned successfully".to_string());
    if let Some(amount) = outcome.final_amount {
        let _ = write!(out, "\nFinal amount charged: {}", amount);
    }
    if let Some(balance) = outcome.new_balance {
        let _ = write!(out, "\nNew balance: {}", balance);
    }
    out
}

pub fn view(view: &ReturnView) -> String {
    let mut lines = Vec::new();
    if let Some(r) = &view.rental {
        lines.push(rental(r));
    }
    lines.push(format!("Return date: {}", view.form.return_date));
    lines.push(format!("Notes: {}", view.form.notes));
    lines.push(balance(view.balance));
    if let Some(est) = &view.estimate {
        lines.push(format!("Late fee: {}", estimate(est)));
    }
    if let Some(report) = &view.affordability {
        lines.push(affordability(report));
    }
    lines.push(state(&view.state));
    lines.join("\n")
}

pub fn late_fees(fees: &[LateFee]) -> String {
    if fees.is_empty() {
        return "No late fees".to_string();
    }

    let mut out = format!(
        "{:<6} {:<8} {:>5} {:>10} {:>10} {:>10}",
        "ID", "RENTAL", "DAYS", "TOTAL", "PAID", "REMAINING"
    );
    for fee in fees {
        let remaining = if fee.is_fully_paid() {
            "paid".to_string()
        } else {
            fee.remaining().to_string()
        };
        let _ = write!(
            out,
            "\n{:<6} {:<8} {:>5} {:>10} {:>10} {:>10}",
            fee.id,
            fee.rental_id,
            fee.days_late,
            fee.total_cost.to_string(),
            fee.amount_paid.to_string(),
            remaining
        );
    }
    out
}

pub fn vehicle(vehicle: &Vehicle) -> String {
    let id = vehicle
        .key()
        .map(|id| format!("#{}", id))
        .unwrap_or_else(|| "#?".to_string());
    let rate = vehicle
        .daily_rate()
        .map(|rate| format!("{}/day", rate))
        .unwrap_or_else(|| "price not available".to_string());
    format!(
        "{} {} ({}), {} [{}]",
        id,
        vehicle.display_name(),
        vehicle.kind().unwrap_or("Unknown"),
        rate,
        vehicle.status.as_deref().unwrap_or("Unknown")
    )
}

pub fn fleet(page: &FleetPage) -> String {
    if page.vehicles.is_empty() {
        return "No vehicles available".to_string();
    }

    let mut lines: Vec<String> = page.vehicles.iter().map(vehicle).collect();
    lines.push(format!(
        "Page {} of {} ({} vehicles)",
        page.page + 1,
        page.total_pages.max(1),
        page.total_items
    ));
    lines.join("\n")
}

pub fn booking(receipt: &BookingReceipt) -> String {
    let mut out = "Vehicle rented successfully!".to_string();
    if let Some(id) = receipt.rental_id {
        let _ = write!(out, " Rental ID: {}", id);
    }
    if let Some(cost) = receipt.total_cost {
        let _ = write!(out, ", Total Cost: {}", cost);
    }
    out
}

pub fn history(records: &[RentalRecord]) -> String {
    if records.is_empty() {
        return "No rentals".to_string();
    }

    let mut out = format!(
        "{:<6} {:<20} {:<10} {:<10} {:<10} {:>10} {:<10}",
        "ID", "VEHICLE", "FROM", "TO", "RETURNED", "COST", "STATUS"
    );
    for record in records {
        let returned = record
            .actual_return_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            out,
            "\n{:<6} {:<20} {:<10} {:<10} {:<10} {:>10} {:<10}",
            record.rental_id,
            record.vehicle_name,
            record.start_date,
            record.end_date,
            returned,
            record.total_cost.to_string(),
            record.status.as_str()
        );
        if let Some(fee) = record.late_fees.filter(Usd::is_positive) {
            let _ = write!(out, " late fee {}", fee);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentdesk_core::{AffordabilityDecision, ErrorKind};
    use rentdesk_engine::{estimate as local_estimate, ReturnFailure, DEFAULT_DAILY_RATE};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_balance() {
        assert_eq!(balance(Some(Usd::from_cents(223000))), "Balance: $2230.00");
        assert_eq!(balance(None), "Balance: unavailable");
    }

    #[test]
    fn test_estimate_is_labelled() {
        let est = local_estimate(date(2024, 1, 10), date(2024, 1, 12), DEFAULT_DAILY_RATE);
        assert_eq!(estimate(&est), "2 days late at $15.00/day: $30.00 (estimate)");

        let on_time = local_estimate(date(2024, 1, 10), date(2024, 1, 9), DEFAULT_DAILY_RATE);
        assert_eq!(estimate(&on_time), "On time, no late fee (estimate)");
    }

    #[test]
    fn test_shortfall_hint() {
        let report = AffordabilityReport::new(
            AffordabilityDecision {
                can_return: false,
                message: Some("Insufficient balance".to_string()),
                is_late: true,
                days_late: 2,
                late_fees: Usd::from_cents(3000),
            },
            Some(Usd::from_cents(2000)),
        );
        assert_eq!(
            affordability(&report),
            "Return not allowed: Insufficient balance\nAdd $10.00 to cover the late fee"
        );
    }

    #[test]
    fn test_advisory() {
        assert_eq!(
            advisory(Advisory::Short(Usd::from_cents(1000))).as_deref(),
            Some("Your balance may not cover the late fee; you may need $10.00 more")
        );
        assert_eq!(advisory(Advisory::Covered), None);
    }

    #[test]
    fn test_auth_failure_mentions_sign_out() {
        let failed = ReturnState::Failed(ReturnFailure {
            kind: ErrorKind::AuthExpired,
            message: "Your session has expired. Please sign in again.".to_string(),
        });
        assert_eq!(
            state(&failed),
            "Your session has expired. Please sign in again. You will be signed out shortly."
        );
    }

    #[test]
    fn test_outcome() {
        let text = outcome(&ReturnOutcome {
            rental_id: 42,
            final_amount: Some(Usd::from_cents(33000)),
            new_balance: Some(Usd::from_cents(7000)),
            message: None,
        });
        assert_eq!(
            text,
            "Vehicle returned successfully\nFinal amount charged: $330.00\nNew balance: $70.00"
        );
    }

    #[test]
    fn test_late_fee_table() {
        let fees = vec![
            LateFee {
                id: 1,
                username: "alice".to_string(),
                rental_id: 42,
                days_late: 2,
                total_cost: Usd::from_cents(3000),
                amount_paid: Usd::ZERO,
                created_at: None,
            },
            LateFee {
                id: 2,
                username: "alice".to_string(),
                rental_id: 40,
                days_late: 1,
                total_cost: Usd::from_cents(1500),
                amount_paid: Usd::from_cents(1500),
                created_at: None,
            },
        ];
        let table = late_fees(&fees);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].ends_with("$30.00"));
        assert!(rows[2].ends_with("paid"));
        assert_eq!(late_fees(&[]), "No late fees");
    }

    fn listed(id: i64, name: &str, status: &str) -> Vehicle {
        Vehicle {
            id: Some(id),
            vehicle_id: None,
            name: Some(name.to_string()),
            make: None,
            model: None,
            year: None,
            vehicle_type: None,
            category: Some("SUV".to_string()),
            price: Some(Usd::from_cents(12000)),
            rental_cost_per_day: None,
            description: None,
            features: None,
            vehicle_image_url: None,
            status: Some(status.to_string()),
        }
    }

    #[test]
    fn test_fleet_page() {
        let page = FleetPage {
            page: 1,
            vehicles: vec![listed(9, "Jeep", "AVAILABLE")],
            total_pages: 3,
            total_items: 21,
        };
        assert_eq!(
            fleet(&page),
            "#9 Jeep (SUV), $120.00/day [AVAILABLE]\nPage 2 of 3 (21 vehicles)"
        );

        let empty = FleetPage {
            page: 0,
            vehicles: Vec::new(),
            total_pages: 0,
            total_items: 0,
        };
        assert_eq!(fleet(&empty), "No vehicles available");
    }

    #[test]
    fn test_booking_confirmation() {
        let receipt = BookingReceipt {
            rental_id: Some(51),
            total_cost: Some(Usd::from_cents(13500)),
            message: None,
        };
        assert_eq!(
            booking(&receipt),
            "Vehicle rented successfully! Rental ID: 51, Total Cost: $135.00"
        );
        assert_eq!(booking(&BookingReceipt::default()), "Vehicle rented successfully!");
    }

    #[test]
    fn test_history_table() {
        let record: RentalRecord = serde_json::from_str(
            r#"{"rentalId": 40, "vehicleName": "Corolla", "startDate": "2023-12-01",
                "endDate": "2023-12-04", "actualReturnDate": "2023-12-06",
                "totalCost": 135, "status": "COMPLETED", "lateFees": 30}"#,
        )
        .unwrap();
        let table = history(&[record]);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].contains("2023-12-06"));
        assert!(rows[1].ends_with("late fee $30.00"));
        assert_eq!(history(&[]), "No rentals");
    }
}

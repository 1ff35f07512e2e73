use std::sync::Arc;
use std::time::Duration;

use crate::db::queries;
use crate::models::{Booking, BookingOutcome, BookingStatus};
use crate::services::{areas, matcher};
use crate::state::AppState;

pub const NO_DATES_MESSAGE: &str =
    "Could not determine next empty dates from the council calendar";
pub const NO_COVERAGE_MESSAGE: &str = "No rota coverage in next 28 days for this area";

/// Long-running queue loop: claim the oldest new booking, process it to a
/// terminal status, repeat. Sleeps when the queue is empty. Returns only
/// on a store error, which takes the process down.
pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let idle = Duration::from_secs(state.config.poll_interval_secs);
    tracing::info!("booking worker started (poll interval {idle:?})");

    loop {
        if !process_next(&state).await? {
            tokio::time::sleep(idle).await;
        }
    }
}

/// Claim and fully process a single booking. Returns false when the queue
/// is empty. Scraper failures are recorded on the booking and do not
/// propagate; store failures do.
pub async fn process_next(state: &AppState) -> anyhow::Result<bool> {
    let claimed = {
        let db = state.db.lock().unwrap();
        queries::claim_next_new(&db)?
    };
    let Some(booking) = claimed else {
        return Ok(false);
    };

    tracing::info!("processing booking {} ({})", booking.id, booking.postcode);
    let outcome = evaluate_booking(state, &booking).await;

    {
        let db = state.db.lock().unwrap();
        queries::finish_booking(&db, &booking.id, &outcome)?;
    }
    tracing::info!("booking {} -> {}", booking.id, outcome.status.as_str());

    if let Err(e) = send_outcome_notification(state, &booking, &outcome).await {
        tracing::warn!(
            "failed to send outcome notification for booking {}: {e:#}",
            booking.id
        );
    }

    Ok(true)
}

async fn evaluate_booking(state: &AppState, booking: &Booking) -> BookingOutcome {
    let customer_area = areas::area_for_address(&booking.postcode, &booking.locality);

    let lookup = match state.council.lookup_dates(&booking.address_formatted).await {
        Ok(lookup) => lookup,
        Err(e) => {
            tracing::warn!("council lookup failed for booking {}: {e:#}", booking.id);
            return BookingOutcome {
                status: BookingStatus::Failed,
                council_lookup: None,
                proposed_area: Some(customer_area.to_string()),
                next_empty_date: None,
                proposed_clean_date: None,
                error_message: Some(format!("{e:#}")),
            };
        }
    };

    let Some(next_empty) = matcher::pick_earliest_relevant_date(&lookup, &booking.bins) else {
        return BookingOutcome {
            status: BookingStatus::Failed,
            council_lookup: Some(lookup),
            proposed_area: Some(customer_area.to_string()),
            next_empty_date: None,
            proposed_clean_date: None,
            error_message: Some(NO_DATES_MESSAGE.to_string()),
        };
    };

    match matcher::find_next_covered_clean_date(next_empty, customer_area) {
        Some(covered) => BookingOutcome {
            status: BookingStatus::ApprovedForQuote,
            council_lookup: Some(lookup),
            proposed_area: Some(covered.rota_area.to_string()),
            next_empty_date: Some(next_empty),
            proposed_clean_date: Some(covered.date),
            error_message: None,
        },
        None => BookingOutcome {
            status: BookingStatus::Rejected,
            council_lookup: Some(lookup),
            proposed_area: Some(customer_area.to_string()),
            next_empty_date: Some(next_empty),
            proposed_clean_date: None,
            error_message: Some(NO_COVERAGE_MESSAGE.to_string()),
        },
    }
}

async fn send_outcome_notification(
    state: &AppState,
    booking: &Booking,
    outcome: &BookingOutcome,
) -> anyhow::Result<()> {
    let subject = format!(
        "Booking {}: {}",
        booking.id,
        outcome.status.as_str()
    );
    let body = format!(
        "Address: {}\nStatus: {}\nArea: {}\nNext empty: {}\nProposed clean: {}\nNote: {}",
        booking.address_formatted,
        outcome.status.as_str(),
        outcome.proposed_area.as_deref().unwrap_or("-"),
        outcome
            .next_empty_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        outcome
            .proposed_clean_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        outcome.error_message.as_deref().unwrap_or("-"),
    );
    state.notifier.send(&subject, &body).await
}

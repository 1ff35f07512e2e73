use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries::{self, QueueStats};
use crate::errors::AppError;
use crate::models::{BinRequest, Booking, BookingStatus};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub address_formatted: String,
    pub postcode: String,
    #[serde(default)]
    pub locality: String,
    pub bins: BTreeMap<String, BinRequest>,
}

#[derive(Serialize)]
pub struct CreateBookingResponse {
    id: String,
    status: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    if req.address_formatted.trim().is_empty() {
        return Err(AppError::Validation("address is required".to_string()));
    }
    if req.postcode.trim().is_empty() {
        return Err(AppError::Validation("postcode is required".to_string()));
    }
    if !req.bins.values().any(|bin| bin.quantity > 0) {
        return Err(AppError::Validation(
            "at least one bin must be requested".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        status: BookingStatus::New,
        address_formatted: req.address_formatted.trim().to_string(),
        postcode: req.postcode.trim().to_string(),
        locality: req.locality.trim().to_string(),
        bins: req.bins,
        council_lookup: None,
        proposed_area: None,
        next_empty_date: None,
        proposed_clean_date: None,
        error_message: None,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &booking)?;
    }
    tracing::info!("booking {} queued ({})", booking.id, booking.postcode);

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            id: booking.id,
            status: booking.status.as_str().to_string(),
        }),
    ))
}

// GET /api/bookings/:id
#[derive(Serialize)]
pub struct BookingStatusResponse {
    id: String,
    status: String,
    proposed_area: Option<String>,
    next_empty_date: Option<String>,
    proposed_clean_date: Option<String>,
}

pub async fn get_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingStatusResponse>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    Ok(Json(BookingStatusResponse {
        id: booking.id,
        status: booking.status.as_str().to_string(),
        proposed_area: booking.proposed_area,
        next_empty_date: booking.next_empty_date.map(|d| d.to_string()),
        proposed_clean_date: booking.proposed_clean_date.map(|d| d.to_string()),
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct AdminBookingResponse {
    id: String,
    status: String,
    address_formatted: String,
    postcode: String,
    locality: String,
    bins: BTreeMap<String, BinRequest>,
    proposed_area: Option<String>,
    next_empty_date: Option<String>,
    proposed_clean_date: Option<String>,
    error_message: Option<String>,
    created_at: String,
    updated_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<AdminBookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db, status_filter, limit)?
    };

    let response: Vec<AdminBookingResponse> = bookings
        .into_iter()
        .map(|b| AdminBookingResponse {
            id: b.id,
            status: b.status.as_str().to_string(),
            address_formatted: b.address_formatted,
            postcode: b.postcode,
            locality: b.locality,
            bins: b.bins,
            proposed_area: b.proposed_area,
            next_empty_date: b.next_empty_date.map(|d| d.to_string()),
            proposed_clean_date: b.proposed_clean_date.map(|d| d.to_string()),
            error_message: b.error_message,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// GET /api/admin/status
pub async fn get_queue_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<QueueStats>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let stats = {
        let db = state.db.lock().unwrap();
        queries::queue_stats(&db)?
    };
    Ok(Json(stats))
}

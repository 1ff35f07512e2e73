use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingOutcome, BookingStatus};

const BOOKING_COLUMNS: &str = "id, status, address_formatted, postcode, locality, bins, \
     council_lookup, proposed_area, next_empty_date, proposed_clean_date, error_message, \
     created_at, updated_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let bins_json = serde_json::to_string(&booking.bins)?;
    let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let updated_at = booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO bookings (id, status, address_formatted, postcode, locality, bins, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            booking.id,
            booking.status.as_str(),
            booking.address_formatted,
            booking.postcode,
            booking.locality,
            bins_json,
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

/// Claim the oldest `new` booking and move it to `processing` in one
/// conditional update, so two workers can never claim the same row.
/// Any stale error message is cleared at the claim boundary.
pub fn claim_next_new(conn: &Connection) -> anyhow::Result<Option<Booking>> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut stmt = conn.prepare(&format!(
        "UPDATE bookings
         SET status = 'processing', error_message = NULL, updated_at = ?1
         WHERE id = (
             SELECT id FROM bookings WHERE status = 'new'
             ORDER BY created_at ASC, id ASC LIMIT 1
         )
           AND status = 'new'
         RETURNING {BOOKING_COLUMNS}"
    ))?;

    let result = stmt.query_row(params![now], parse_booking_row);
    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a terminal outcome for a booking the worker currently holds in
/// `processing`. Refuses to touch rows in any other state.
pub fn finish_booking(conn: &Connection, id: &str, outcome: &BookingOutcome) -> anyhow::Result<()> {
    let lookup_json = outcome
        .council_lookup
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let next_empty = outcome.next_empty_date.map(|d| d.format("%Y-%m-%d").to_string());
    let clean_date = outcome
        .proposed_clean_date
        .map(|d| d.format("%Y-%m-%d").to_string());
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

    let updated = conn.execute(
        "UPDATE bookings
         SET status = ?2, council_lookup = ?3, proposed_area = ?4, next_empty_date = ?5,
             proposed_clean_date = ?6, error_message = ?7, updated_at = ?8
         WHERE id = ?1 AND status = 'processing'",
        params![
            id,
            outcome.status.as_str(),
            lookup_json,
            outcome.proposed_area,
            next_empty,
            clean_date,
            outcome.error_message,
            now,
        ],
    )?;

    anyhow::ensure!(updated == 1, "booking {id} is not in processing state");
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"))?;

    let result = stmt.query_row(params![id], parse_booking_row);
    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let mut bookings = vec![];

    match status_filter {
        Some(status) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1
                 ORDER BY created_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![status, limit], parse_booking_row)?;
            for row in rows {
                bookings.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], parse_booking_row)?;
            for row in rows {
                bookings.push(row?);
            }
        }
    }

    Ok(bookings)
}

// ── Queue stats ──

#[derive(Debug, Default, serde::Serialize)]
pub struct QueueStats {
    pub new: i64,
    pub processing: i64,
    pub approved_for_quote: i64,
    pub rejected: i64,
    pub failed: i64,
}

pub fn queue_stats(conn: &Connection) -> anyhow::Result<QueueStats> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM bookings GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut stats = QueueStats::default();
    for row in rows {
        let (status, count) = row?;
        match status.as_str() {
            "new" => stats.new = count,
            "processing" => stats.processing = count,
            "approved_for_quote" => stats.approved_for_quote = count,
            "rejected" => stats.rejected = count,
            "failed" => stats.failed = count,
            _ => {}
        }
    }
    Ok(stats)
}

// ── Row parsing ──

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let bins_json: String = row.get(5)?;
    let lookup_json: Option<String> = row.get(6)?;

    Ok(Booking {
        id: row.get(0)?,
        status: BookingStatus::from_str(&row.get::<_, String>(1)?),
        address_formatted: row.get(2)?,
        postcode: row.get(3)?,
        locality: row.get(4)?,
        bins: serde_json::from_str(&bins_json).unwrap_or_default(),
        council_lookup: lookup_json.and_then(|s| serde_json::from_str(&s).ok()),
        proposed_area: row.get(7)?,
        next_empty_date: row
            .get::<_, Option<String>>(8)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        proposed_clean_date: row
            .get::<_, Option<String>>(9)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        error_message: row.get(10)?,
        created_at: parse_timestamp(&row.get::<_, String>(11)?),
        updated_at: parse_timestamp(&row.get::<_, String>(12)?),
    })
}

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc())
}

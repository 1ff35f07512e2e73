use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::CouncilLookup;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub status: BookingStatus,
    pub address_formatted: String,
    pub postcode: String,
    pub locality: String,
    pub bins: BTreeMap<String, BinRequest>,
    pub council_lookup: Option<CouncilLookup>,
    pub proposed_area: Option<String>,
    pub next_empty_date: Option<NaiveDate>,
    pub proposed_clean_date: Option<NaiveDate>,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// What the customer asked us to clean for one bin colour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinRequest {
    pub quantity: u32,
}

/// Terminal result of processing one booking, written back by the worker.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub status: BookingStatus,
    pub council_lookup: Option<CouncilLookup>,
    pub proposed_area: Option<String>,
    pub next_empty_date: Option<NaiveDate>,
    pub proposed_clean_date: Option<NaiveDate>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    New,
    Processing,
    ApprovedForQuote,
    Rejected,
    Failed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::New => "new",
            BookingStatus::Processing => "processing",
            BookingStatus::ApprovedForQuote => "approved_for_quote",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "new" => BookingStatus::New,
            "processing" => BookingStatus::Processing,
            "approved_for_quote" => BookingStatus::ApprovedForQuote,
            "rejected" => BookingStatus::Rejected,
            _ => BookingStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::ApprovedForQuote | BookingStatus::Rejected | BookingStatus::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::New,
            BookingStatus::Processing,
            BookingStatus::ApprovedForQuote,
            BookingStatus::Rejected,
            BookingStatus::Failed,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_maps_to_failed() {
        assert_eq!(BookingStatus::from_str("garbage"), BookingStatus::Failed);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!BookingStatus::New.is_terminal());
        assert!(!BookingStatus::Processing.is_terminal());
        assert!(BookingStatus::ApprovedForQuote.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
        assert!(BookingStatus::Failed.is_terminal());
    }
}

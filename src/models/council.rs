use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of one council calendar lookup for a single address.
///
/// `dates_by_bin` maps a bin colour to its upcoming collection dates in
/// ascending order. The mapping is empty when the rendered calendar text
/// could not be parsed; that is "no data", not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouncilLookup {
    pub raw_text: String,
    pub dates_by_bin: BTreeMap<String, Vec<NaiveDate>>,
}

impl CouncilLookup {
    pub fn has_dates(&self) -> bool {
        self.dates_by_bin.values().any(|dates| !dates.is_empty())
    }
}

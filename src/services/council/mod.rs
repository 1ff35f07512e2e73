pub mod chrome;

use async_trait::async_trait;

use crate::models::CouncilLookup;

/// One lookup against the council's address-search calendar.
///
/// Implementations must distinguish two kinds of bad outcome: a lookup
/// that ran but yielded nothing parseable returns an empty
/// `dates_by_bin`, while navigation and timeout failures return `Err`.
#[async_trait]
pub trait CouncilCalendar: Send + Sync {
    async fn lookup_dates(&self, address: &str) -> anyhow::Result<CouncilLookup>;
}

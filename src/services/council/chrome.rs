use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use headless_chrome::Browser;

use super::CouncilCalendar;
use crate::models::CouncilLookup;

const ADDRESS_INPUT: &str = "#address-finder-input";
const SUGGESTION_ITEM: &str = "#address-finder-results li";
const RESULTS_CONTAINER: &str = "#collection-results";

const BIN_COLOURS: &[&str] = &["black", "grey", "blue", "green", "brown", "glass"];

pub struct HeadlessChromeCalendar {
    calendar_url: String,
    wait_timeout: Duration,
}

impl HeadlessChromeCalendar {
    pub fn new(calendar_url: String, wait_timeout: Duration) -> Self {
        Self {
            calendar_url,
            wait_timeout,
        }
    }
}

#[async_trait]
impl CouncilCalendar for HeadlessChromeCalendar {
    async fn lookup_dates(&self, address: &str) -> anyhow::Result<CouncilLookup> {
        let url = self.calendar_url.clone();
        let timeout = self.wait_timeout;
        let address = address.to_string();

        // CDP calls block; keep them off the async runtime.
        let raw_text =
            tokio::task::spawn_blocking(move || read_calendar_text(&url, &address, timeout))
                .await
                .map_err(|e| anyhow::anyhow!("scraper task failed: {e}"))??;

        let dates_by_bin = parse_collection_dates(&raw_text);
        if dates_by_bin.is_empty() {
            tracing::warn!("no collection dates parsed from council calendar text");
        }

        Ok(CouncilLookup {
            raw_text,
            dates_by_bin,
        })
    }
}

/// Drive a fresh browser session through the council's address lookup and
/// return the rendered text of the results container. The browser (and
/// its Chrome process) is dropped on every exit path.
fn read_calendar_text(url: &str, address: &str, timeout: Duration) -> anyhow::Result<String> {
    let browser = Browser::default().context("failed to launch headless browser")?;
    let tab = browser.new_tab().context("failed to open browser tab")?;
    tab.set_default_timeout(timeout);

    tab.navigate_to(url)
        .context("failed to navigate to council calendar")?
        .wait_until_navigated()
        .context("council calendar did not finish loading")?;

    let input = tab
        .wait_for_element_with_custom_timeout(ADDRESS_INPUT, timeout)
        .context("address search input not found")?;
    input.focus().context("failed to focus address input")?;
    input.type_into(address).context("failed to type address")?;

    // Wait until the autocomplete has rendered at least one suggestion
    // before driving the keyboard; a fixed sleep here is flaky.
    tab.wait_for_element_with_custom_timeout(SUGGESTION_ITEM, timeout)
        .context("no address suggestions appeared")?;
    tab.press_key("ArrowDown")
        .context("failed to highlight first suggestion")?;
    tab.press_key("Enter")
        .context("failed to accept suggestion")?;

    let results = tab
        .wait_for_element_with_custom_timeout(RESULTS_CONTAINER, timeout)
        .context("collection results did not appear")?;
    results
        .get_inner_text()
        .context("failed to read collection results")
}

/// Best-effort extraction of per-colour collection dates from the rendered
/// calendar text. Anything unparseable is simply skipped; a fully
/// unparseable page yields an empty map, never an error.
pub fn parse_collection_dates(raw: &str) -> BTreeMap<String, Vec<NaiveDate>> {
    let mut out: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();
        if lower.contains("bin") || lower.contains("caddy") {
            if let Some(colour) = BIN_COLOURS.iter().find(|c| lower.contains(**c)) {
                current = Some((*colour).to_string());
            }
        }

        if let Some(colour) = current.as_ref() {
            if let Some(date) = parse_date_fragment(line) {
                out.entry(colour.clone()).or_default().push(date);
            }
        }
    }

    for dates in out.values_mut() {
        dates.sort();
        dates.dedup();
    }
    out
}

/// Pull the first recognisable date out of a line of page text.
/// Handles "Tuesday 3 March 2026", "3 Mar 2026" and "03/03/2026".
fn parse_date_fragment(line: &str) -> Option<NaiveDate> {
    let cleaned: String = line
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '/' {
                c
            } else {
                ' '
            }
        })
        .collect();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    for token in &tokens {
        if token.contains('/') {
            if let Ok(date) = NaiveDate::parse_from_str(token, "%d/%m/%Y") {
                return Some(date);
            }
        }
    }

    for window in tokens.windows(3) {
        let candidate = format!("{} {} {}", window[0], window[1], window[2]);
        if let Ok(date) = NaiveDate::parse_from_str(&candidate, "%d %B %Y") {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(&candidate, "%d %b %Y") {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_long_form_dates() {
        let raw = "Your next collections\n\
                   Grey bin\n\
                   Tuesday 3 March 2026\n\
                   Tuesday 17 March 2026\n\
                   Blue bin\n\
                   Tuesday 10 March 2026\n";
        let parsed = parse_collection_dates(raw);
        assert_eq!(
            parsed.get("grey"),
            Some(&vec![d("2026-03-03"), d("2026-03-17")])
        );
        assert_eq!(parsed.get("blue"), Some(&vec![d("2026-03-10")]));
    }

    #[test]
    fn test_parse_colour_and_date_on_one_line() {
        let raw = "Black bin: Monday 2 March 2026\nBrown bin: 04/03/2026";
        let parsed = parse_collection_dates(raw);
        assert_eq!(parsed.get("black"), Some(&vec![d("2026-03-02")]));
        assert_eq!(parsed.get("brown"), Some(&vec![d("2026-03-04")]));
    }

    #[test]
    fn test_parse_abbreviated_month() {
        let raw = "Green bin\nThu 5 Mar 2026";
        let parsed = parse_collection_dates(raw);
        assert_eq!(parsed.get("green"), Some(&vec![d("2026-03-05")]));
    }

    #[test]
    fn test_dates_sorted_and_deduped() {
        let raw = "Blue bin\n17 March 2026\n3 March 2026\n3 March 2026";
        let parsed = parse_collection_dates(raw);
        assert_eq!(
            parsed.get("blue"),
            Some(&vec![d("2026-03-03"), d("2026-03-17")])
        );
    }

    #[test]
    fn test_unparseable_text_yields_empty_map() {
        assert!(parse_collection_dates("").is_empty());
        assert!(parse_collection_dates("No results found for this address").is_empty());
        // Dates with no bin heading have nowhere to go.
        assert!(parse_collection_dates("Tuesday 3 March 2026").is_empty());
    }
}

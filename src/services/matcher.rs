use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::models::{BinRequest, CouncilLookup};
use crate::services::rota;

/// How far ahead of the next bin empty we will look for rota coverage.
pub const COVERAGE_WINDOW_DAYS: i64 = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredDate {
    pub date: NaiveDate,
    pub rota_area: &'static str,
}

/// Earliest upcoming collection date across the bin colours the customer
/// actually asked for. `None` means the council data was insufficient to
/// answer, not that nothing was requested.
pub fn pick_earliest_relevant_date(
    lookup: &CouncilLookup,
    bins: &BTreeMap<String, BinRequest>,
) -> Option<NaiveDate> {
    bins.iter()
        .filter(|(_, request)| request.quantity > 0)
        .filter_map(|(colour, _)| lookup.dates_by_bin.get(colour))
        .filter_map(|dates| dates.first())
        .min()
        .copied()
}

/// First day from `start` (inclusive) within the coverage window where the
/// rota visits the customer's area. Rota areas are sometimes compound
/// ("Groomsport & Bangor"), so a case-insensitive substring hit counts.
pub fn find_next_covered_clean_date(start: NaiveDate, customer_area: &str) -> Option<CoveredDate> {
    for offset in 0..COVERAGE_WINDOW_DAYS {
        let date = start + Duration::days(offset);
        let Some(rota_area) = rota::area_for_date(date) else {
            continue;
        };
        if area_matches(rota_area, customer_area) {
            return Some(CoveredDate { date, rota_area });
        }
    }
    None
}

fn area_matches(rota_area: &str, customer_area: &str) -> bool {
    rota_area == customer_area
        || rota_area
            .to_lowercase()
            .contains(&customer_area.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn lookup(entries: &[(&str, &[&str])]) -> CouncilLookup {
        let mut dates_by_bin = BTreeMap::new();
        for (colour, dates) in entries {
            dates_by_bin.insert(
                colour.to_string(),
                dates.iter().map(|s| d(s)).collect::<Vec<_>>(),
            );
        }
        CouncilLookup {
            raw_text: String::new(),
            dates_by_bin,
        }
    }

    fn bins(entries: &[(&str, u32)]) -> BTreeMap<String, BinRequest> {
        entries
            .iter()
            .map(|(colour, quantity)| {
                (
                    colour.to_string(),
                    BinRequest {
                        quantity: *quantity,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_no_data_for_requested_colour() {
        let result = pick_earliest_relevant_date(&lookup(&[]), &bins(&[("black", 1)]));
        assert_eq!(result, None);
    }

    #[test]
    fn test_earliest_across_requested_colours() {
        let result = pick_earliest_relevant_date(
            &lookup(&[("black", &["2026-02-20"]), ("blue", &["2026-02-18"])]),
            &bins(&[("black", 1), ("blue", 2)]),
        );
        assert_eq!(result, Some(d("2026-02-18")));
    }

    #[test]
    fn test_unrequested_colours_ignored() {
        // The blue date is earlier but nobody asked for the blue bin.
        let result = pick_earliest_relevant_date(
            &lookup(&[("black", &["2026-02-20"]), ("blue", &["2026-02-18"])]),
            &bins(&[("black", 1)]),
        );
        assert_eq!(result, Some(d("2026-02-20")));
    }

    #[test]
    fn test_zero_quantity_is_not_a_request() {
        let result = pick_earliest_relevant_date(
            &lookup(&[("blue", &["2026-02-18"])]),
            &bins(&[("blue", 0), ("black", 1)]),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn test_only_first_date_per_colour_considered() {
        let result = pick_earliest_relevant_date(
            &lookup(&[("black", &["2026-02-25", "2026-03-11"]), ("brown", &["2026-02-27"])]),
            &bins(&[("black", 1), ("brown", 1)]),
        );
        assert_eq!(result, Some(d("2026-02-25")));
    }

    #[test]
    fn test_substring_area_match_on_start_day() {
        // 2026-02-16 is a week-0 Monday: "Groomsport & Bangor".
        let covered = find_next_covered_clean_date(d("2026-02-16"), "Bangor").unwrap();
        assert_eq!(covered.date, d("2026-02-16"));
        assert_eq!(covered.rota_area, "Groomsport & Bangor");
    }

    #[test]
    fn test_exact_area_match() {
        // 2026-02-18 is the week-0 Wednesday: "Comber".
        let covered = find_next_covered_clean_date(d("2026-02-16"), "Comber").unwrap();
        assert_eq!(covered.date, d("2026-02-18"));
        assert_eq!(covered.rota_area, "Comber");
    }

    #[test]
    fn test_scan_skips_weekend_and_office_day() {
        // Start on a Friday; the first possible hit is the following Monday.
        let covered = find_next_covered_clean_date(d("2026-02-20"), "Bangor").unwrap();
        assert!(covered.date > d("2026-02-22"));
    }

    #[test]
    fn test_no_coverage_returns_none() {
        assert_eq!(find_next_covered_clean_date(d("2026-02-16"), "Nowhere"), None);
        assert_eq!(find_next_covered_clean_date(d("2026-02-16"), "Unknown"), None);
    }

    #[test]
    fn test_window_is_28_days_inclusive() {
        // Customer in "Carrowdore": covered only on the week-3 Thursday,
        // which recurs every 28 days. From the day after one visit, the
        // next falls on day 27 of the window and must still be found.
        let visit = d("2026-02-12");
        assert_eq!(rota::area_for_date(visit), Some("Carrowdore & Greyabbey"));

        let covered = find_next_covered_clean_date(visit + Duration::days(1), "Carrowdore");
        assert_eq!(
            covered,
            Some(CoveredDate {
                date: d("2026-03-12"),
                rota_area: "Carrowdore & Greyabbey",
            })
        );
    }
}

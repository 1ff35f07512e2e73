use chrono::{Datelike, NaiveDate, Weekday};

/// The rota repeats every four weeks, anchored on this Monday.
fn rota_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 22).expect("valid anchor date")
}

// One row per rota week, one column per working day (Mon-Thu).
// Friday is office day; the vans don't go out at the weekend.
const ROTA: [[&str; 4]; 4] = [
    [
        "Groomsport & Bangor",
        "Newtownards",
        "Comber",
        "Donaghadee",
    ],
    [
        "Bangor West",
        "Ards Peninsula",
        "Holywood & Cultra",
        "Millisle & Ballywalter",
    ],
    [
        "Bangor East & Conlig",
        "Newtownards",
        "Comber & Dundonald",
        "Groomsport & Donaghadee",
    ],
    [
        "Bangor Central",
        "Ards & Newtownards",
        "Holywood",
        "Carrowdore & Greyabbey",
    ],
];

/// Which of the four rota weeks a date falls in.
///
/// Whole weeks elapsed since the anchor Monday, reduced modulo 4. Floor
/// division keeps dates before the anchor consistent: the Sunday before
/// the anchor is the last day of week 3, not week 0.
pub fn week_index_for_date(date: NaiveDate) -> u32 {
    let days = date.signed_duration_since(rota_anchor()).num_days();
    let weeks = days.div_euclid(7);
    weeks.rem_euclid(4) as u32
}

/// The area the rota covers on a date, or `None` on Friday (office day)
/// and at the weekend.
pub fn area_for_date(date: NaiveDate) -> Option<&'static str> {
    let day = match date.weekday() {
        Weekday::Mon => 0,
        Weekday::Tue => 1,
        Weekday::Wed => 2,
        Weekday::Thu => 3,
        _ => return None,
    };
    Some(ROTA[week_index_for_date(date) as usize][day])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_anchor_is_week_zero() {
        assert_eq!(week_index_for_date(d("2024-01-22")), 0);
    }

    #[test]
    fn test_week_index_advances_weekly() {
        assert_eq!(week_index_for_date(d("2024-01-29")), 1);
        assert_eq!(week_index_for_date(d("2024-02-05")), 2);
        assert_eq!(week_index_for_date(d("2024-02-12")), 3);
        assert_eq!(week_index_for_date(d("2024-02-19")), 0);
    }

    #[test]
    fn test_week_index_in_range_and_periodic() {
        let mut date = d("2023-06-01");
        for _ in 0..500 {
            let idx = week_index_for_date(date);
            assert!(idx <= 3);
            assert_eq!(idx, week_index_for_date(date + Duration::days(28)));
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_dates_before_anchor_normalise() {
        // The Sunday before the anchor belongs to the tail of week 3.
        assert_eq!(week_index_for_date(d("2024-01-21")), 3);
        // A full cycle earlier lands back on week 0.
        assert_eq!(week_index_for_date(d("2023-12-25")), 0);
    }

    #[test]
    fn test_no_area_on_friday_or_weekend() {
        // Fridays, Saturdays and Sundays across several years.
        for s in [
            "2024-01-26", "2024-01-27", "2024-01-28", "2025-07-04", "2025-07-05", "2025-07-06",
            "2026-02-20", "2026-02-21", "2026-02-22",
        ] {
            assert_eq!(area_for_date(d(s)), None, "expected no area on {s}");
        }
    }

    #[test]
    fn test_known_rota_assignments() {
        // 2026-02-16 is a Monday in week 0.
        assert_eq!(area_for_date(d("2026-02-16")), Some("Groomsport & Bangor"));
        // 2026-02-18 is the Wednesday of the same week.
        assert_eq!(area_for_date(d("2026-02-18")), Some("Comber"));
        // 2026-03-02 is a Monday in week 2.
        assert_eq!(area_for_date(d("2026-03-02")), Some("Bangor East & Conlig"));
    }

    #[test]
    fn test_area_before_anchor() {
        // Pre-anchor Monday a whole cycle back still resolves.
        assert_eq!(area_for_date(d("2023-12-25")), Some("Groomsport & Bangor"));
    }
}

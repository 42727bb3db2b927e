use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a report date as written by the usual exports:
/// `YYYY-MM-DD`, `YYYY/MM/DD`, `M/D/YYYY`, optionally followed by a time
/// of day which is discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() < 8 {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::day;

    #[test]
    fn accepts_common_export_formats() {
        assert_eq!(parse_date("2020-02-24"), Some(day(2020, 2, 24)));
        assert_eq!(parse_date("2020/02/24"), Some(day(2020, 2, 24)));
        assert_eq!(parse_date("2/24/2020"), Some(day(2020, 2, 24)));
        assert_eq!(parse_date("2020-02-24 00:00:00.000"), Some(day(2020, 2, 24)));
        assert_eq!(parse_date("2/24/2020 0:00"), Some(day(2020, 2, 24)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2020-13-01"), None);
    }
}

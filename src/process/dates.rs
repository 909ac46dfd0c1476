// src/process/dates.rs

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DateContext, IndexError};

/// Three numbers joined by common date separators, anywhere in the text.
static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,4})[-/_.](\d{1,2})[-/_.](\d{1,4})").expect("date pattern compiles")
});

/// Contiguous `YYYYMMDD`, the other shape dated file names come in.
static COMPACT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})(\d{2})(\d{2})").expect("compact date pattern compiles"));

/// Interpret a two-digit year the way fuzzy date parsers conventionally do.
fn expand_year(y: i32) -> i32 {
    match y {
        0..=49 => 2000 + y,
        50..=99 => 1900 + y,
        _ => y,
    }
}

/// Scan `text` for the first recognizable calendar date, tolerating
/// surrounding words, extensions, and time-of-day suffixes. Ambiguous
/// day/month order follows `day_first`; if the preferred order is not a
/// real date the swapped order is tried before giving up.
pub fn extract_date(text: &str, day_first: bool) -> Option<NaiveDate> {
    if let Some(caps) = DATE_TOKEN.captures(text) {
        let a = &caps[1];
        let b: u32 = caps[2].parse().ok()?;
        let c = &caps[3];

        if a.len() == 4 {
            // Year-first: YYYY-MM-DD, never ambiguous.
            let year: i32 = a.parse().ok()?;
            let day: u32 = c.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, b, day);
        }
        if c.len() == 4 || c.len() == 2 {
            let year = expand_year(c.parse().ok()?);
            let first: u32 = a.parse().ok()?;
            let (month, day) = if day_first { (b, first) } else { (first, b) };
            return NaiveDate::from_ymd_opt(year, month, day)
                .or_else(|| NaiveDate::from_ymd_opt(year, day, month));
        }
    }

    COMPACT_TOKEN.captures(text).and_then(|caps| {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn to_iso(date: NaiveDate) -> String {
    //  yyyy-MM-dd (strict_date_optional_time)
    date.format("%Y-%m-%d").to_string()
}

/// Date embedded in a data file's name. Fatal when absent: an undatable
/// file cannot be ordered or tagged.
pub fn date_from_filename(name: &str, day_first: bool) -> Result<String, IndexError> {
    extract_date(name, day_first)
        .map(to_iso)
        .ok_or_else(|| IndexError::DateParse {
            value: name.to_string(),
            context: DateContext::FileName,
        })
}

/// Reformat a row's date-valued field to `YYYY-MM-DD`. The error carries the
/// field name and is recoverable at the call site.
pub fn normalize_field(field: &str, value: &str, day_first: bool) -> Result<String, IndexError> {
    extract_date(value, day_first)
        .map(to_iso)
        .ok_or_else(|| IndexError::DateParse {
            value: value.to_string(),
            context: DateContext::RowField {
                field: field.to_string(),
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_first_by_default() {
        assert_eq!(
            normalize_field("Last Update", "3/12/2020", false).unwrap(),
            "2020-03-12"
        );
    }

    #[test]
    fn day_first_flips_ambiguous_dates() {
        assert_eq!(
            normalize_field("Last Update", "3/12/2020", true).unwrap(),
            "2020-12-03"
        );
    }

    #[test]
    fn timestamps_reduce_to_calendar_dates() {
        assert_eq!(
            normalize_field("Last Update", "2021-01-01 10:00", false).unwrap(),
            "2021-01-01"
        );
        assert_eq!(
            normalize_field("Last Update", "2020/03/12 23:59:01", false).unwrap(),
            "2020-03-12"
        );
    }

    #[test]
    fn impossible_month_falls_back_to_swapped_order() {
        // 13 cannot be a month, so month-first parsing still lands on Mar 13.
        assert_eq!(
            normalize_field("Last Update", "13/3/2020", false).unwrap(),
            "2020-03-13"
        );
    }

    #[test]
    fn two_digit_years_expand() {
        assert_eq!(
            normalize_field("Last Update", "3/12/20", false).unwrap(),
            "2020-03-12"
        );
        assert_eq!(
            normalize_field("Last Update", "3/12/99", false).unwrap(),
            "1999-03-12"
        );
    }

    #[test]
    fn filename_dates_are_extracted() {
        assert_eq!(
            date_from_filename("03-12-2020.csv", false).unwrap(),
            "2020-03-12"
        );
        assert_eq!(
            date_from_filename("report_20200312.csv", false).unwrap(),
            "2020-03-12"
        );
    }

    #[test]
    fn undated_filename_is_fatal() {
        let err = date_from_filename("notes.csv", false).unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("notes.csv"));
    }

    #[test]
    fn unparsable_field_is_recoverable() {
        let err = normalize_field("Last Update", "pending review", false).unwrap_err();
        assert!(err.is_recoverable());
    }
}

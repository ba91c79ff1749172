use chrono::{Local, NaiveDate};
use hourglass_rs::SafeTimeProvider;

use crate::errors::{CalculatorError, Result};

/// fixed textual date form, e.g. "17.05.2012"
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// parse a date in the fixed `DD.MM.YYYY` form
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| CalculatorError::InvalidDate {
        date: s.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// today's date in the local time zone
pub fn local_today(time_provider: &SafeTimeProvider) -> NaiveDate {
    time_provider.now().with_timezone(&Local).date_naive()
}

/// gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// the date `day` in the given month, clamped down to the month's last day
///
/// day 31 in april becomes the 30th, day 29 in a non-leap february becomes
/// the 28th. Out-of-range components are rejected as invalid dates.
pub fn nearest_valid_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    if year < 1 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(CalculatorError::InvalidDate {
            date: format!("{:02}.{:02}.{:04}", day, month, year),
        });
    }

    let mut candidate = day;
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, candidate) {
            return Ok(date);
        }
        if candidate <= 28 {
            return Err(CalculatorError::internal(format!(
                "no valid day at or below {} in {:02}.{:04}",
                day, month, year
            )));
        }
        candidate -= 1;
    }
}

/// serde adapter writing dates in the fixed `DD.MM.YYYY` form
pub mod serde_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_date(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_local_today_follows_local_offset() {
        let instant = Utc.with_ymd_and_hms(2013, 12, 31, 23, 30, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(instant));

        let today = local_today(&time);
        assert_eq!(today, instant.with_timezone(&Local).date_naive());
        assert!((today - instant.date_naive()).num_days().abs() <= 1);

        time.test_control().unwrap().advance(Duration::hours(1));
        assert_eq!(local_today(&time), (instant + Duration::hours(1)).with_timezone(&Local).date_naive());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("13.03.2013").unwrap(), ymd(2013, 3, 13));
        assert_eq!(parse_date("1.1.2100").unwrap(), ymd(2100, 1, 1));
    }

    #[test]
    fn test_parse_date_invalid() {
        for s in ["31.02.2013", "2013-03-13", "13.13.2013", ""] {
            assert_eq!(
                parse_date(s),
                Err(CalculatorError::InvalidDate { date: s.to_string() })
            );
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2013, 3, 2)), "02.03.2013");
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(2012), 366);
        assert_eq!(days_in_year(2013), 365);
        assert_eq!(days_in_year(2000), 366);
        assert_eq!(days_in_year(1900), 365);
    }

    #[test]
    fn test_nearest_valid_date_valid() {
        assert_eq!(nearest_valid_date(2013, 10, 13).unwrap(), ymd(2013, 10, 13));
    }

    #[test]
    fn test_nearest_valid_date_clamps_to_month_end() {
        assert_eq!(nearest_valid_date(2013, 2, 31).unwrap(), ymd(2013, 2, 28));
        assert_eq!(nearest_valid_date(2012, 2, 31).unwrap(), ymd(2012, 2, 29));
        assert_eq!(nearest_valid_date(2013, 4, 31).unwrap(), ymd(2013, 4, 30));
    }

    #[test]
    fn test_nearest_valid_date_invalid() {
        for (year, month, day) in [(2013, 2, 32), (2013, 13, 1), (0, 1, 1), (2013, 1, 0)] {
            let err = nearest_valid_date(year, month, day).unwrap_err();
            assert!(matches!(err, CalculatorError::InvalidDate { .. }));
        }
    }
}

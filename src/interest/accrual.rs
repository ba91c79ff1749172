use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::date::format_date;
use crate::decimal::Rate;
use crate::errors::{CalculatorError, Result};
use crate::interest::{daily_rate, MonthlyInterest};
use crate::schedule::MonthStepper;

/// actual/actual interest accrual over monthly payment intervals
///
/// yields one [`MonthlyInterest`] per payment date after the start date.
/// The daily rate is re-based on the year length at every calendar-year
/// boundary, and an interval spanning 31 december is split at the year end.
#[derive(Debug, Clone)]
pub struct AccrualEngine {
    months: MonthStepper,
    annual_rate: Rate,
    previous: Option<NaiveDate>,
    // (year, daily rate for that year)
    daily: Option<(i32, Decimal)>,
}

impl AccrualEngine {
    pub fn new(start: NaiveDate, end: NaiveDate, annual_rate: Rate) -> Result<Self> {
        Ok(Self {
            months: MonthStepper::new(start, end)?,
            annual_rate,
            previous: None,
            daily: None,
        })
    }

    fn daily_rate_for(&mut self, year: i32) -> Decimal {
        match self.daily {
            Some((cached_year, rate)) if cached_year == year => rate,
            _ => {
                let rate = daily_rate(self.annual_rate, year);
                self.daily = Some((year, rate));
                rate
            }
        }
    }

    fn accrue(&mut self, previous: NaiveDate, current: NaiveDate) -> Result<Decimal> {
        if previous.year() == current.year() {
            let days = (current - previous).num_days();
            return Ok(self.daily_rate_for(current.year()) * Decimal::from(days));
        }

        let (previous_days, current_days) = split_at_year_end(previous, current)?;

        let mut interest = self.daily_rate_for(previous.year()) * Decimal::from(previous_days);
        interest += self.daily_rate_for(current.year()) * Decimal::from(current_days);

        Ok(interest)
    }
}

impl Iterator for AccrualEngine {
    type Item = Result<MonthlyInterest>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = match self.months.next()? {
                Ok(date) => date,
                Err(e) => return Some(Err(e)),
            };

            let Some(previous) = self.previous.replace(current) else {
                // the first date has no preceding interval, it only enters its year
                self.daily_rate_for(current.year());
                continue;
            };

            return Some(
                self.accrue(previous, current)
                    .map(|interest| MonthlyInterest { date: current, interest }),
            );
        }
    }
}

impl FusedIterator for AccrualEngine {}

/// day counts on each side of the year boundary between a december and a
/// january payment date
///
/// the first part runs from `previous` to 31 december, the second from
/// 1 january to `current` inclusive. Together they cover the whole interval.
pub fn split_at_year_end(previous: NaiveDate, current: NaiveDate) -> Result<(i64, i64)> {
    let interval = || format!("{} - {}", format_date(previous), format_date(current));

    if previous.month() != 12 || current.month() != 1 || current.year() != previous.year() + 1 {
        return Err(CalculatorError::internal(format!(
            "interval {} crosses a year boundary outside a december to january step",
            interval()
        )));
    }

    let year_end = NaiveDate::from_ymd_opt(previous.year(), 12, 31)
        .ok_or_else(|| CalculatorError::internal(format!("no year end for {}", interval())))?;
    let year_start = NaiveDate::from_ymd_opt(current.year(), 1, 1)
        .ok_or_else(|| CalculatorError::internal(format!("no year start for {}", interval())))?;

    let previous_days = (year_end - previous).num_days();
    let current_days = (current - year_start).num_days() + 1;

    if previous_days + current_days != (current - previous).num_days() {
        return Err(CalculatorError::internal(format!(
            "year split of {} does not cover the interval",
            interval()
        )));
    }

    Ok((previous_days, current_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn accruals(start: &str, end: &str, percentage: Decimal) -> Vec<MonthlyInterest> {
        AccrualEngine::new(date(start), date(end), Rate::from_percentage(percentage))
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_month_interest() {
        // 730% a year is exactly 2% a day in a 365-day year
        assert_eq!(
            accruals("31.12.2012", "28.02.2013", dec!(730)),
            vec![
                MonthlyInterest { date: date("31.01.2013"), interest: dec!(0.62) },
                MonthlyInterest { date: date("28.02.2013"), interest: dec!(0.56) },
            ]
        );
    }

    #[test]
    fn test_one_entry_per_step_after_start() {
        let result = accruals("17.05.2012", "17.05.2017", dec!(17.5));

        assert_eq!(result.len(), 60);
        assert_eq!(result[0].date, date("17.06.2012"));
        assert_eq!(result[59].date, date("17.05.2017"));
    }

    #[test]
    fn test_interval_within_leap_year() {
        let result = accruals("17.05.2012", "17.06.2012", dec!(17.5));
        assert_eq!(result[0].interest, dec!(0.175) / dec!(366) * dec!(31));
    }

    #[test]
    fn test_year_boundary_split() {
        let result = accruals("17.12.2012", "17.01.2013", dec!(17.5));

        let (previous_days, current_days) = split_at_year_end(date("17.12.2012"), date("17.01.2013")).unwrap();
        assert_eq!((previous_days, current_days), (14, 17));

        let expected = dec!(0.175) / dec!(366) * dec!(14) + dec!(0.175) / dec!(365) * dec!(17);
        assert_eq!(result[0].interest, expected);
    }

    #[test]
    fn test_year_boundary_from_last_day_of_year() {
        let (previous_days, current_days) = split_at_year_end(date("31.12.2012"), date("31.01.2013")).unwrap();
        assert_eq!((previous_days, current_days), (0, 31));
    }

    #[test]
    fn test_split_rejects_non_boundary_interval() {
        let err = split_at_year_end(date("17.11.2012"), date("17.01.2013")).unwrap_err();
        assert!(err.is_internal());

        let err = split_at_year_end(date("17.12.2012"), date("17.01.2014")).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_propagates_range_error() {
        let mut engine = AccrualEngine::new(date("15.03.2013"), date("14.04.2013"), Rate::from_percentage(dec!(10))).unwrap();

        assert!(matches!(engine.next(), Some(Err(CalculatorError::InvalidDateRange { .. }))));
        assert!(engine.next().is_none());
    }

    mod property_tests {
        use super::*;
        use chrono::Months;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn test_year_split_covers_interval(year in 1950i32..2100i32, day in 1u32..32u32) {
                let previous = crate::date::nearest_valid_date(year, 12, day).unwrap();
                let current = previous.checked_add_months(Months::new(1)).unwrap();

                let (previous_days, current_days) = split_at_year_end(previous, current).unwrap();
                prop_assert_eq!(previous_days + current_days, (current - previous).num_days());
                prop_assert!(previous_days >= 0);
                prop_assert!(current_days >= 1);
            }
        }
    }
}

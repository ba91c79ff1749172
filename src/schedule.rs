//! monthly payment-date stepping

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};

use crate::date::{format_date, nearest_valid_date};
use crate::errors::{CalculatorError, Result};

/// yields the start date, then one date per calendar month up to the end date
///
/// every date after the start is anchored to the start's day of month and
/// clamped down when the month is shorter. Stepping past the end date
/// without landing on it is an invalid range.
#[derive(Debug, Clone)]
pub struct MonthStepper {
    start: NaiveDate,
    end: NaiveDate,
    anchor_day: u32,
    current: Option<NaiveDate>,
    finished: bool,
}

impl MonthStepper {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(invalid_range(start, end));
        }

        Ok(Self {
            start,
            end,
            anchor_day: start.day(),
            current: None,
            finished: false,
        })
    }

    fn step(&self, date: NaiveDate) -> Result<NaiveDate> {
        let (year, month) = if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };

        let next = nearest_valid_date(year, month, self.anchor_day)?;
        if next > self.end {
            return Err(invalid_range(self.start, self.end));
        }

        Ok(next)
    }
}

impl Iterator for MonthStepper {
    type Item = Result<NaiveDate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let next = match self.current {
            None => Ok(self.start),
            Some(current) => self.step(current),
        };

        match next {
            Ok(date) => {
                self.current = Some(date);
                self.finished = date == self.end;
                Some(Ok(date))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for MonthStepper {}

/// all payment dates from start to end inclusive
pub fn month_dates(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    MonthStepper::new(start, end)?.collect()
}

/// number of monthly steps between the dates, not counting the start
pub fn count_months(start: NaiveDate, end: NaiveDate) -> Result<u32> {
    let mut months = 0;
    for date in MonthStepper::new(start, end)?.skip(1) {
        date?;
        months += 1;
    }
    Ok(months)
}

fn invalid_range(start: NaiveDate, end: NaiveDate) -> CalculatorError {
    CalculatorError::InvalidDateRange {
        start: format_date(start),
        end: format_date(end),
    }
}

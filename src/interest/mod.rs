pub mod accrual;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::days_in_year;
use crate::decimal::Rate;

pub use accrual::{split_at_year_end, AccrualEngine};

/// interest fraction accrued over the interval ending at `date`
///
/// multiply by the outstanding principal to get the interest amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyInterest {
    #[serde(with = "crate::date::serde_format")]
    pub date: NaiveDate,
    pub interest: Decimal,
}

/// actual/actual daily rate for a calendar year
pub fn daily_rate(annual_rate: Rate, year: i32) -> Decimal {
    annual_rate.as_decimal() / Decimal::from(days_in_year(year))
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::format_date;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};

/// immutable terms of a fixed-rate credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTerms {
    #[serde(with = "crate::date::serde_format")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::date::serde_format")]
    pub end_date: NaiveDate,
    pub amount: Money,
    pub interest_rate: Rate,
}

impl CreditTerms {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        amount: Money,
        interest_rate: Rate,
    ) -> Result<Self> {
        if start_date >= end_date {
            return Err(CalculatorError::InvalidDateRange {
                start: format_date(start_date),
                end: format_date(end_date),
            });
        }

        if !amount.is_positive() {
            return Err(CalculatorError::InvalidAmount {
                value: amount.to_string(),
            });
        }

        if !interest_rate.is_valid_credit_rate() {
            return Err(CalculatorError::InvalidInterestRate {
                value: interest_rate.to_string(),
            });
        }

        Ok(Self {
            start_date,
            end_date,
            amount,
            interest_rate,
        })
    }
}

/// actually-paid amounts keyed by payment date
///
/// each entry must match a scheduled payment date; the schedule builder
/// consumes entries as it reaches their dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentOverrides {
    payments: BTreeMap<NaiveDate, Money>,
}

impl PaymentOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, amount: Money) -> Result<()> {
        if !amount.is_positive() {
            return Err(CalculatorError::InvalidAmount {
                value: amount.to_string(),
            });
        }
        self.payments.insert(date, amount);
        Ok(())
    }

    /// builder-style insert
    pub fn with(mut self, date: NaiveDate, amount: Money) -> Result<Self> {
        self.insert(date, amount)?;
        Ok(self)
    }

    pub fn get(&self, date: NaiveDate) -> Option<Money> {
        self.payments.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Money)> + '_ {
        self.payments.iter().map(|(date, amount)| (*date, *amount))
    }

    /// working copy that the schedule builder drains
    pub(crate) fn pending(&self) -> BTreeMap<NaiveDate, Money> {
        self.payments.clone()
    }
}

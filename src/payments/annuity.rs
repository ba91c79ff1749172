use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::schedule::count_months;

/// standard monthly payment that repays `principal` by `end`, counting the
/// monthly steps after `origin`
pub fn calculate_annuity(
    principal: Money,
    annual_rate: Rate,
    origin: NaiveDate,
    end: NaiveDate,
) -> Result<Money> {
    let months = count_months(origin, end)?;
    annuity_for_months(principal, annual_rate, months)
}

/// payment = P * i * (1 + i)^n / ((1 + i)^n - 1), rounded half up to cents
///
/// `i` is the flat nominal monthly rate (annual / 12).
pub fn annuity_for_months(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Ok(principal.round_payment());
    }

    let r = annual_rate.monthly_rate();

    if r.is_zero() {
        return Ok(Money::from_decimal(principal.as_decimal() / Decimal::from(months)).round_payment());
    }

    let overflow = || CalculatorError::CalculationOverflow {
        message: format!("annuity for {} at {} over {} months", principal, annual_rate, months),
    };

    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound.checked_mul(base).ok_or_else(overflow)?;
    }

    let numerator = r
        .checked_mul(compound)
        .and_then(|factor| principal.as_decimal().checked_mul(factor))
        .ok_or_else(overflow)?;
    let payment = numerator
        .checked_div(compound - Decimal::ONE)
        .ok_or_else(overflow)?;

    Ok(Money::from_decimal(payment).round_payment())
}

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{CalculatorError, Result};

/// exact decimal money amount
///
/// arithmetic is exact; rounding happens only where a payment is fixed,
/// via [`Money::round_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// parse a positive amount such as "450000" or "14125.22"
    pub fn parse_positive(s: &str) -> Result<Self> {
        let amount = Money::from_str(s.trim()).map_err(|_| CalculatorError::InvalidAmount {
            value: s.to_string(),
        })?;

        if !amount.is_positive() {
            return Err(CalculatorError::InvalidAmount {
                value: s.to_string(),
            });
        }

        Ok(amount)
    }

    /// create from integer amount
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to cents, half away from zero
    pub fn round_payment(&self) -> Self {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Money(Decimal::from_str(s)?))
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(self.0 * other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// nominal annual interest rate, stored as a fraction (0.175 for 17.5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 17.5 for 17.5%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// parse a credit interest rate, which must lie strictly between 0% and 100%
    pub fn parse_percentage(s: &str) -> Result<Self> {
        let invalid = || CalculatorError::InvalidInterestRate {
            value: s.to_string(),
        };

        let percentage = Decimal::from_str(s.trim()).map_err(|_| invalid())?;
        let rate = Rate::from_percentage(percentage);
        if !rate.is_valid_credit_rate() {
            return Err(invalid());
        }

        Ok(rate)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    /// flat nominal monthly rate, not day-count adjusted
    pub fn monthly_rate(&self) -> Decimal {
        self.0 / Decimal::from(12)
    }

    pub fn is_valid_credit_rate(&self) -> bool {
        self.0 > Decimal::ZERO && self.0 < Decimal::ONE
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_payment() {
        let round = |d: Decimal| Money::from_decimal(d).round_payment().to_string();

        assert_eq!(round(dec!(100)), "100");
        assert_eq!(round(dec!(0.0051)), "0.01");
        assert_eq!(round(dec!(1000000.3433)), "1000000.34");
        assert_eq!(round(dec!(1000000.3459)), "1000000.35");
    }

    #[test]
    fn test_round_payment_half_up() {
        assert_eq!(Money::from_decimal(dec!(0.005)).round_payment(), Money::from_decimal(dec!(0.01)));
        assert_eq!(Money::from_decimal(dec!(0.015)).round_payment(), Money::from_decimal(dec!(0.02)));
        assert_eq!(Money::from_decimal(dec!(0.0049)).round_payment(), Money::ZERO);
    }

    #[test]
    fn test_money_equality_ignores_scale() {
        assert_eq!(Money::from_decimal(dec!(11305.00)), Money::from_major(11305));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(Money::parse_positive("14125.22").unwrap(), Money::from_decimal(dec!(14125.22)));
        assert!(matches!(Money::parse_positive("0"), Err(CalculatorError::InvalidAmount { .. })));
        assert!(matches!(Money::parse_positive("-1"), Err(CalculatorError::InvalidAmount { .. })));
        assert!(matches!(Money::parse_positive("abc"), Err(CalculatorError::InvalidAmount { .. })));
    }

    #[test]
    fn test_rate_percentage() {
        let rate = Rate::parse_percentage("17.5").unwrap();
        assert_eq!(rate.as_decimal(), dec!(0.175));
        assert_eq!(rate.as_percentage(), dec!(17.5));
        assert_eq!(rate.to_string(), "17.5%");
    }

    #[test]
    fn test_rate_bounds() {
        for value in ["0", "100", "-3", "150", "x"] {
            assert!(matches!(
                Rate::parse_percentage(value),
                Err(CalculatorError::InvalidInterestRate { .. })
            ));
        }
        assert!(Rate::parse_percentage("99.99").is_ok());
    }

    #[test]
    fn test_money_sum() {
        let amounts = [Money::from_major(1), Money::from_decimal(dec!(2.50)), Money::from_major(3)];
        assert_eq!(amounts.iter().sum::<Money>(), Money::from_decimal(dec!(6.50)));
    }
}

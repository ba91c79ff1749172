use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::format_date;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::payments::{AmortizationSchedule, ScheduledPayment};
use crate::types::{CreditTerms, PaymentOverrides};

/// point-in-time view of a credit as of `info_date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    #[serde(with = "crate::date::serde_format")]
    pub info_date: NaiveDate,
    #[serde(with = "crate::date::serde_format")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::date::serde_format")]
    pub end_date: NaiveDate,
    pub amount: Money,
    pub current_amount: Money,
    pub interest_rate: Rate,
    /// total of the latest payment on or before the info date
    pub payment: Option<Money>,
    /// first payment after the info date, once the credit has started
    pub next_payment: Option<ScheduledPayment>,
    pub schedule: AmortizationSchedule,
}

impl Credit {
    /// the credit ended before the info date
    pub fn is_closed(&self) -> bool {
        self.end_date < self.info_date
    }
}

/// build the schedule and report the balance and payment in effect on `info_date`
///
/// past the end date the credit is fully repaid: the current amount is zero
/// and no payment is in effect. Before the first payment the current amount
/// is the original amount.
pub fn get_credit_info(
    info_date: NaiveDate,
    terms: &CreditTerms,
    overrides: &PaymentOverrides,
) -> Result<Credit> {
    let schedule = AmortizationSchedule::generate(terms, overrides)?;

    let (current_amount, payment) = if info_date > terms.end_date {
        (Money::ZERO, None)
    } else {
        match schedule.latest_on_or_before(info_date) {
            Some(latest) => (latest.remaining_balance, Some(latest.total_paid)),
            None => (terms.amount, None),
        }
    };

    let next_payment = if info_date < terms.start_date {
        None
    } else {
        schedule.first_after(info_date).cloned()
    };

    debug!(
        info_date = %format_date(info_date),
        current_amount = %current_amount,
        "credit info computed"
    );

    Ok(Credit {
        info_date,
        start_date: terms.start_date,
        end_date: terms.end_date,
        amount: terms.amount,
        current_amount,
        interest_rate: terms.interest_rate,
        payment,
        next_payment,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn credit_2000() -> (CreditTerms, PaymentOverrides) {
        let terms = CreditTerms::new(
            date("28.05.2013"),
            date("28.05.2033"),
            Money::from_major(2_000_000),
            Rate::from_percentage(dec!(12.25)),
        )
        .unwrap();

        let mut overrides = PaymentOverrides::new();
        for (day, amount) in [
            ("28.06.2013", dec!(110000)),
            ("28.07.2013", dec!(21394.54)),
            ("28.08.2013", dec!(21394.54)),
            ("28.09.2013", dec!(1195000)),
        ] {
            overrides.insert(date(day), Money::from_decimal(amount)).unwrap();
        }

        (terms, overrides)
    }

    fn check(info_date: NaiveDate, current_amount: Money, payment: Option<Money>, next_payment: Option<Money>) {
        let (terms, overrides) = credit_2000();
        let credit = get_credit_info(info_date, &terms, &overrides).unwrap();

        assert_eq!(credit.start_date, terms.start_date);
        assert_eq!(credit.end_date, terms.end_date);
        assert_eq!(credit.amount, terms.amount);
        assert_eq!(credit.interest_rate, terms.interest_rate);
        assert_eq!(credit.current_amount, current_amount);
        assert_eq!(credit.payment, payment);
        assert_eq!(credit.next_payment.map(|p| p.total_paid), next_payment);
        assert_eq!(credit.schedule, AmortizationSchedule::generate(&terms, &overrides).unwrap());
    }

    #[test]
    fn test_credit_info_before_start() {
        check(NaiveDate::from_ymd_opt(1, 1, 1).unwrap(), Money::from_major(2_000_000), None, None);
    }

    #[test]
    fn test_credit_info_before_first_payment() {
        let next = Some(Money::from_major(110_000));
        check(date("30.05.2013"), Money::from_major(2_000_000), None, next);
        check(date("27.06.2013"), Money::from_major(2_000_000), None, next);
    }

    #[test]
    fn test_credit_info_between_payments() {
        check(
            date("18.10.2013"),
            Money::from_decimal(dec!(731957.77)),
            Some(Money::from_major(1_195_000)),
            Some(Money::from_decimal(dec!(8220.05))),
        );
    }

    #[test]
    fn test_credit_info_on_payment_date() {
        let (terms, overrides) = credit_2000();
        let credit = get_credit_info(date("28.06.2013"), &terms, &overrides).unwrap();

        assert_eq!(credit.payment, Some(Money::from_major(110_000)));
        assert_eq!(credit.current_amount, credit.schedule.payments[0].remaining_balance);
        assert_eq!(credit.next_payment.unwrap().date, date("28.07.2013"));
    }

    #[test]
    fn test_credit_info_on_end_date() {
        let (terms, overrides) = credit_2000();
        let credit = get_credit_info(date("28.05.2033"), &terms, &overrides).unwrap();

        assert_eq!(credit.current_amount, Money::ZERO);
        assert_eq!(credit.payment, Some(credit.schedule.payments.last().unwrap().total_paid));
        assert!(credit.next_payment.is_none());
        assert!(!credit.is_closed());
    }

    #[test]
    fn test_credit_info_after_end() {
        check(date("1.1.2100"), Money::ZERO, None, None);

        let (terms, overrides) = credit_2000();
        assert!(get_credit_info(date("29.05.2033"), &terms, &overrides).unwrap().is_closed());
    }

    #[test]
    fn test_credit_info_propagates_schedule_errors() {
        let (terms, mut overrides) = credit_2000();
        overrides.insert(date("01.01.2020"), Money::from_major(10_000)).unwrap();

        assert!(get_credit_info(date("18.10.2013"), &terms, &overrides).is_err());
    }
}

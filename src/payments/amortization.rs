use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::date::format_date;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{AccrualEngine, MonthlyInterest};
use crate::payments::annuity::calculate_annuity;
use crate::types::{CreditTerms, PaymentOverrides};

/// scheduled payment in amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    #[serde(with = "crate::date::serde_format")]
    pub date: NaiveDate,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
}

/// amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: CreditTerms,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_paid: Money,
    pub events: EventStore,
}

impl AmortizationSchedule {
    /// generate payment schedule
    ///
    /// the standard payment is recomputed for the remaining balance and term
    /// whenever the previous payment differed from it. A payment below the
    /// standard is rejected, as is an override on a date the schedule never
    /// reaches or one that repays more than is owed before the end date.
    /// Rounding residue left after the last date is folded into the final
    /// payment.
    pub fn generate(terms: &CreditTerms, overrides: &PaymentOverrides) -> Result<Self> {
        let mut pending = overrides.pending();
        let mut events = EventStore::new();
        let mut payments = Vec::new();

        let mut balance = terms.amount;
        let mut previous_date = terms.start_date;
        let mut standard: Option<Money> = None;
        let mut applied: Option<Money> = None;

        for accrual in AccrualEngine::new(terms.start_date, terms.end_date, terms.interest_rate)? {
            let MonthlyInterest { date, interest } = accrual?;

            let standard_payment = match standard {
                Some(payment) if applied == Some(payment) => payment,
                _ => {
                    let payment =
                        calculate_annuity(balance, terms.interest_rate, previous_date, terms.end_date)?;
                    debug!(
                        origin = %format_date(previous_date),
                        principal = %balance,
                        payment = %payment,
                        "standard payment recalculated"
                    );
                    events.emit(Event::PaymentRecalculated {
                        origin: previous_date,
                        principal: balance,
                        payment,
                    });
                    payment
                }
            };

            let payment = match pending.remove(&date) {
                Some(paid) => {
                    if paid < standard_payment {
                        return Err(CalculatorError::InvalidPayment {
                            date: format_date(date),
                            standard: standard_payment,
                            provided: paid,
                        });
                    }
                    events.emit(Event::OverrideApplied {
                        date,
                        standard: standard_payment,
                        applied: paid,
                    });
                    paid
                }
                None => standard_payment,
            };

            let interest_paid = (balance * interest).round_payment();
            let principal_paid = payment - interest_paid;
            let outstanding = balance + interest_paid;
            balance -= principal_paid;

            // the final date settles any overshoot through the residue fold
            if balance.is_negative() && payment > standard_payment && date != terms.end_date {
                return Err(CalculatorError::PaymentExceedsBalance {
                    date: format_date(date),
                    outstanding,
                    provided: payment,
                });
            }

            trace!(date = %format_date(date), %principal_paid, %interest_paid, %balance, "payment scheduled");

            payments.push(ScheduledPayment {
                date,
                principal_paid,
                interest_paid,
                total_paid: payment,
                remaining_balance: balance,
            });

            standard = Some(standard_payment);
            applied = Some(payment);
            previous_date = date;
        }

        if let Some(date) = pending.keys().next() {
            return Err(CalculatorError::InvalidPaymentDate {
                date: format_date(*date),
            });
        }

        if !balance.is_zero() {
            if let Some(last) = payments.last_mut() {
                debug!(date = %format_date(last.date), residue = %balance, "residue absorbed by final payment");
                last.principal_paid += balance;
                last.total_paid += balance;
                last.remaining_balance = Money::ZERO;
                events.emit(Event::ResidueAbsorbed {
                    date: last.date,
                    residue: balance,
                });
            }
        }

        let total_interest = payments.iter().map(|p| p.interest_paid).sum();
        let total_paid = payments.iter().map(|p| p.total_paid).sum();

        Ok(Self {
            terms: *terms,
            payments,
            total_interest,
            total_paid,
            events,
        })
    }

    /// most recent payment on or before the date
    pub fn latest_on_or_before(&self, date: NaiveDate) -> Option<&ScheduledPayment> {
        self.payments.iter().take_while(|p| p.date <= date).last()
    }

    /// first payment strictly after the date
    pub fn first_after(&self, date: NaiveDate) -> Option<&ScheduledPayment> {
        self.payments.iter().find(|p| p.date > date)
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

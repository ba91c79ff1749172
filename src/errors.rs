use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid date: {date}")]
    InvalidDate {
        date: String,
    },

    #[error("invalid date range: {start} - {end}")]
    InvalidDateRange {
        start: String,
        end: String,
    },

    #[error("invalid payment for {date}: {provided} is less than the standard payment {standard}")]
    InvalidPayment {
        date: String,
        standard: Money,
        provided: Money,
    },

    #[error("invalid payment for {date}: {provided} exceeds the outstanding balance {outstanding}")]
    PaymentExceedsBalance {
        date: String,
        outstanding: Money,
        provided: Money,
    },

    #[error("invalid payment date: {date}")]
    InvalidPaymentDate {
        date: String,
    },

    #[error("invalid amount: {value}")]
    InvalidAmount {
        value: String,
    },

    #[error("invalid interest rate: {value}")]
    InvalidInterestRate {
        value: String,
    },

    #[error("calculation overflow: {message}")]
    CalculationOverflow {
        message: String,
    },

    #[error("failed to read '{path}': {message}")]
    Io {
        path: String,
        message: String,
    },

    #[error("error while parsing '{path}' configuration file: {message}")]
    ConfigParse {
        path: String,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    /// arithmetic on valid gregorian dates never gets here
    #[error("internal consistency failure: {message}")]
    Internal {
        message: String,
    },
}

impl CalculatorError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        CalculatorError::Internal {
            message: message.into(),
        }
    }

    /// true for errors that indicate a defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, CalculatorError::Internal { .. })
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;

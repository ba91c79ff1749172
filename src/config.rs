use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credit::{get_credit_info, Credit};
use crate::date::{local_today, parse_date};
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::{CreditTerms, PaymentOverrides};

/// credit entry as written in the credits file
///
/// amounts and rates are strings so they stay exact decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditEntry {
    pub amount: String,
    pub interest: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub payments: BTreeMap<String, String>,
}

impl CreditEntry {
    /// validate into credit terms and payment overrides
    pub fn validate(&self) -> Result<CreditRecord> {
        let amount = Money::parse_positive(&self.amount)?;
        let interest_rate = Rate::parse_percentage(&self.interest)?;
        let start_date = parse_date(&self.start_date)?;
        let end_date = parse_date(&self.end_date)?;

        let terms = CreditTerms::new(start_date, end_date, amount, interest_rate)?;

        let mut payments = PaymentOverrides::new();
        for (date, amount) in &self.payments {
            payments.insert(parse_date(date)?, Money::parse_positive(amount)?)?;
        }

        Ok(CreditRecord { terms, payments })
    }
}

/// validated credit: terms plus actually-paid amounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditRecord {
    pub terms: CreditTerms,
    pub payments: PaymentOverrides,
}

impl CreditRecord {
    pub fn credit_info(&self, info_date: NaiveDate) -> Result<Credit> {
        get_credit_info(info_date, &self.terms, &self.payments)
    }

    /// credit info as of today, in local time, according to the time provider
    pub fn credit_info_now(&self, time_provider: &SafeTimeProvider) -> Result<Credit> {
        self.credit_info(local_today(time_provider))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreditsFile {
    credits: Vec<CreditEntry>,
}

fn parse_credits(content: &str) -> std::result::Result<CreditsFile, toml::de::Error> {
    toml::from_str(content)
}

/// credits configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreditsConfig {
    pub credits: Vec<CreditRecord>,
}

impl CreditsConfig {
    /// load and validate a TOML credits file
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| CalculatorError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let file = parse_credits(&content).map_err(|e| CalculatorError::ConfigParse {
            path: path_str.clone(),
            message: e.message().to_string(),
        })?;
        let config = Self::from_entries(&file.credits)?;

        debug!(path = %path_str, credits = config.credits.len(), "credits loaded");

        Ok(config)
    }

    /// parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file = parse_credits(content).map_err(|e| CalculatorError::InvalidConfiguration {
            message: e.message().to_string(),
        })?;

        Self::from_entries(&file.credits)
    }

    fn from_entries(entries: &[CreditEntry]) -> Result<Self> {
        let credits = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.validate().map_err(|e| CalculatorError::InvalidConfiguration {
                    message: format!("credits[{}]: {}", i, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { credits })
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }
}

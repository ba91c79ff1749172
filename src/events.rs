use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// events recorded while building an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// standard payment (re)computed for the balance left after `origin`
    PaymentRecalculated {
        #[serde(with = "crate::date::serde_format")]
        origin: NaiveDate,
        principal: Money,
        payment: Money,
    },
    /// a caller-supplied payment replaced the standard one
    OverrideApplied {
        #[serde(with = "crate::date::serde_format")]
        date: NaiveDate,
        standard: Money,
        applied: Money,
    },
    /// rounding residue folded into the final payment
    ResidueAbsorbed {
        #[serde(with = "crate::date::serde_format")]
        date: NaiveDate,
        residue: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recalculations(&self) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::PaymentRecalculated { .. }))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

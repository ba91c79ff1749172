pub mod config;
pub mod credit;
pub mod date;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod payments;
pub mod report;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::{CreditEntry, CreditRecord, CreditsConfig};
pub use credit::{get_credit_info, Credit};
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, MonthlyInterest};
pub use payments::{calculate_annuity, AmortizationSchedule, ScheduledPayment};
pub use schedule::{count_months, month_dates, MonthStepper};
pub use types::{CreditTerms, PaymentOverrides};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;

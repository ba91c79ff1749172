pub mod amortization;
pub mod annuity;

pub use amortization::{AmortizationSchedule, ScheduledPayment};
pub use annuity::{annuity_for_months, calculate_annuity};

//! Clearance reporting.
//!
//! Pure aggregation over loaded records:
//! - Metrics (status counts, approval rate, average time to clear)
//! - Time-to-clear per period
//! - Detailed breakdown by type, status and month
//! - Approver role performance
//! - Trends per period

pub mod error;
pub mod period;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use period::{Granularity, Period};
pub use service::ReportService;
pub use types::*;

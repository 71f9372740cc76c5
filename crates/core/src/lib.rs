//! Core business logic for the clearance tracker.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, status rules, and report calculations live here.
//!
//! # Modules
//!
//! - `clearance` - Approver ledger, status engine, and admin authorization
//! - `reports` - Metrics, time-to-clear, trend and performance aggregation

pub mod clearance;
pub mod reports;

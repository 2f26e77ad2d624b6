//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Budget drafts are immutable values: every edit produces a new draft, and all
//! totals are derived on demand.
//!
//! # Modules
//!
//! - `allocation` - Budget allocation model, reconciliation engine, payloads and spending alerts
//! - `goal` - Savings goals and their progress
//! - `period` - Budget months

pub mod allocation;
pub mod goal;
pub mod period;

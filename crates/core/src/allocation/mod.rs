//! Budget allocation model and reconciliation.
//!
//! A [`BudgetDraft`] splits a budget total across categories, each by a fixed
//! amount or a percentage of the total. The [`ReconciliationEngine`] applies
//! validated edits and recomputes effective amounts, totals and the
//! over-allocation status after every change.

pub mod engine;
pub mod error;
pub mod model;
pub mod payload;
pub mod spending;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{AllocationSettings, ReconciliationEngine};
pub use error::{AllocationError, AmountViolation};
pub use model::{
    effective_amount, is_over_allocated, over_allocated_by, percentage_allocated, remaining,
    summarize, total_allocated,
};
pub use payload::{BudgetCategoryPayload, BudgetCategoryRecord, BudgetRequestPayload};
pub use spending::{CategorySpending, SpendingOverview, UsageLevel, evaluate_spending};
pub use types::{
    AlertLevel, AlertThresholds, AllocationAmount, AllocationKind, BudgetAllocation, BudgetDraft,
    BudgetSummary, Category, CategoryType, MAX_AMOUNT, SummaryDisplay, validate_total,
};

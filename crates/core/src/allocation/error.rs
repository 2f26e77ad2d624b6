//! Allocation error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{AllocationId, CategoryId};
use thiserror::Error;

/// Rule an amount broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountViolation {
    /// Amount is below zero.
    Negative,
    /// Percentage allocation above 100.
    PercentageAboveHundred,
    /// Currency amount above the supported maximum.
    AboveMaximum,
}

impl std::fmt::Display for AmountViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "amount cannot be negative"),
            Self::PercentageAboveHundred => write!(f, "percentage cannot exceed 100"),
            Self::AboveMaximum => write!(f, "amount exceeds the supported maximum"),
        }
    }
}

/// Rejected edits to a budget draft.
///
/// None of these are fatal: the caller keeps its previous draft and shows the
/// message next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Category already has an allocation in this draft.
    #[error("Category {0} already has an allocation in this budget")]
    DuplicateCategory(CategoryId),

    /// Amount is not valid for the allocation kind.
    #[error("Invalid amount {amount}: {violation}")]
    InvalidAmount {
        /// Rejected value.
        amount: Decimal,
        /// Rule that was broken.
        violation: AmountViolation,
    },

    /// No allocation with this ID in the draft.
    #[error("Allocation not found: {0}")]
    AllocationNotFound(AllocationId),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        let message = err.to_string();
        match err {
            AllocationError::DuplicateCategory(_) => Self::Conflict(message),
            AllocationError::InvalidAmount { .. } => Self::Validation(message),
            AllocationError::AllocationNotFound(_) => Self::NotFound(message),
        }
    }
}

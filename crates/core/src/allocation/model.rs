//! Pure queries over a budget draft.
//!
//! Every function here is deterministic and side-effect free. Values keep full
//! `Decimal` precision; rounding belongs to the display step. Sums and products
//! saturate at the `Decimal` bounds instead of panicking.

use rust_decimal::Decimal;

use super::types::{
    AllocationAmount, AllocationKind, BudgetAllocation, BudgetDraft, BudgetSummary,
};

/// Resolved dollar value of an allocation against `total_amount`.
///
/// Fixed allocations ignore the total; percentages resolve to
/// `total_amount * amount / 100`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tally_core::allocation::{
///     AllocationKind, BudgetDraft, ReconciliationEngine, effective_amount,
/// };
/// use tally_shared::types::CategoryId;
///
/// let engine = ReconciliationEngine::default();
/// let draft = BudgetDraft::new(dec!(1000)).unwrap();
/// let draft = engine
///     .add_allocation(&draft, CategoryId(1), AllocationKind::Percentage, dec!(25), None)
///     .unwrap();
/// assert_eq!(effective_amount(&draft.allocations()[0], draft.total_amount()), dec!(250));
/// ```
#[must_use]
pub fn effective_amount(allocation: &BudgetAllocation, total_amount: Decimal) -> Decimal {
    match allocation.kind {
        AllocationKind::Fixed => allocation.amount,
        AllocationKind::Percentage => {
            total_amount.saturating_mul(allocation.amount) / Decimal::ONE_HUNDRED
        }
    }
}

/// Sum of effective amounts across the draft.
#[must_use]
pub fn total_allocated(draft: &BudgetDraft) -> Decimal {
    draft
        .allocations
        .iter()
        .map(|a| effective_amount(a, draft.total_amount))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Budget total minus the allocated total. Negative when over-allocated.
#[must_use]
pub fn remaining(draft: &BudgetDraft) -> Decimal {
    draft.total_amount.saturating_sub(total_allocated(draft))
}

/// True iff allocations exceed the total. Exactly allocated is not over.
#[must_use]
pub fn is_over_allocated(draft: &BudgetDraft) -> bool {
    total_allocated(draft) > draft.total_amount
}

/// Share of the total that is allocated, as a percentage.
#[must_use]
pub fn percentage_allocated(draft: &BudgetDraft) -> Decimal {
    percentage_of(total_allocated(draft), draft.total_amount)
}

/// How far allocations exceed the total, or zero.
#[must_use]
pub fn over_allocated_by(draft: &BudgetDraft) -> Decimal {
    total_allocated(draft)
        .saturating_sub(draft.total_amount)
        .max(Decimal::ZERO)
}

/// Computes every derived figure in one pass.
#[must_use]
pub fn summarize(draft: &BudgetDraft) -> BudgetSummary {
    let per_allocation: Vec<AllocationAmount> = draft
        .allocations
        .iter()
        .map(|a| AllocationAmount {
            allocation_id: a.id,
            effective_amount: effective_amount(a, draft.total_amount),
        })
        .collect();

    let total_allocated = per_allocation
        .iter()
        .map(|a| a.effective_amount)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let total_amount = draft.total_amount;

    BudgetSummary {
        total_amount,
        total_allocated,
        remaining: total_amount.saturating_sub(total_allocated),
        is_over_allocated: total_allocated > total_amount,
        percentage_allocated: percentage_of(total_allocated, total_amount),
        over_allocated_by: total_allocated
            .saturating_sub(total_amount)
            .max(Decimal::ZERO),
        per_allocation,
    }
}

/// `part / whole * 100`, zero for a zero whole, `Decimal::MAX` when out of range.
fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

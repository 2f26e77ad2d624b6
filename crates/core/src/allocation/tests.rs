//! Property-based tests for the allocation module.
//!
//! - Sum of effective amounts is independent of insertion order
//! - Add followed by remove restores the draft
//! - Effective amount rules for fixed and percentage allocations
//! - Over-allocation boundary
//! - Recompute is deterministic

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::CategoryId;

use super::engine::ReconciliationEngine;
use super::model::{effective_amount, is_over_allocated, total_allocated};
use super::types::{AllocationKind, BudgetDraft};

/// Strategy to generate budget totals (0.00 to 1,000,000.00).
fn total_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a valid (kind, amount) pair.
fn kind_and_amount() -> impl Strategy<Value = (AllocationKind, Decimal)> {
    prop_oneof![
        (0i64..50_000_000i64).prop_map(|cents| (AllocationKind::Fixed, Decimal::new(cents, 2))),
        (0i64..=10_000i64).prop_map(|bp| (AllocationKind::Percentage, Decimal::new(bp, 2))),
    ]
}

/// Strategy to generate allocation specs for distinct categories.
fn allocation_specs() -> impl Strategy<Value = Vec<(AllocationKind, Decimal)>> {
    prop::collection::vec(kind_and_amount(), 0..12)
}

fn build_draft(total: Decimal, specs: &[(i64, AllocationKind, Decimal)]) -> BudgetDraft {
    let engine = ReconciliationEngine::default();
    let mut draft = BudgetDraft::new(total).unwrap();
    for (category, kind, amount) in specs {
        draft = engine
            .add_allocation(&draft, CategoryId(*category), *kind, *amount, None)
            .unwrap();
    }
    draft
}

fn numbered(specs: Vec<(AllocationKind, Decimal)>) -> Vec<(i64, AllocationKind, Decimal)> {
    (0i64..)
        .zip(specs)
        .map(|(i, (kind, amount))| (i, kind, amount))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Total allocated is the same for any insertion order.
    #[test]
    fn prop_total_allocated_is_order_independent(
        total in total_amount(),
        (specs, shuffled) in allocation_specs()
            .prop_map(numbered)
            .prop_flat_map(|specs| (Just(specs.clone()), Just(specs).prop_shuffle())),
    ) {
        let original = build_draft(total, &specs);
        let reordered = build_draft(total, &shuffled);

        prop_assert_eq!(total_allocated(&original), total_allocated(&reordered));
    }

    /// Adding an allocation and removing it again yields the original draft.
    #[test]
    fn prop_add_then_remove_restores_draft(
        total in total_amount(),
        specs in allocation_specs(),
        (kind, amount) in kind_and_amount(),
    ) {
        let engine = ReconciliationEngine::default();
        let original = build_draft(total, &numbered(specs));

        let added = engine
            .add_allocation(&original, CategoryId(-1), kind, amount, None)
            .unwrap();
        let new_id = added.allocations().last().unwrap().id;
        let restored = engine.remove_allocation(&added, new_id);

        prop_assert_eq!(restored, original);
    }

    /// A fixed allocation's effective amount never depends on the total.
    #[test]
    fn prop_fixed_effective_amount_is_amount(
        first_total in total_amount(),
        second_total in total_amount(),
        cents in 0i64..50_000_000i64,
    ) {
        let amount = Decimal::new(cents, 2);
        let draft = build_draft(first_total, &[(1, AllocationKind::Fixed, amount)]);
        let allocation = &draft.allocations()[0];

        prop_assert_eq!(effective_amount(allocation, first_total), amount);
        prop_assert_eq!(effective_amount(allocation, second_total), amount);
    }

    /// A percentage allocation resolves to total * P / 100.
    #[test]
    fn prop_percentage_effective_amount(
        total in total_amount(),
        bp in 0i64..=10_000i64,
    ) {
        let percent = Decimal::new(bp, 2);
        let draft = build_draft(total, &[(1, AllocationKind::Percentage, percent)]);

        prop_assert_eq!(
            effective_amount(&draft.allocations()[0], total),
            total * percent / Decimal::ONE_HUNDRED
        );
        prop_assert!(effective_amount(&draft.allocations()[0], total) <= total);
    }

    /// Over-allocated exactly when the allocated sum exceeds the total.
    #[test]
    fn prop_over_allocated_iff_sum_exceeds_total(
        total in total_amount(),
        specs in allocation_specs(),
    ) {
        let draft = build_draft(total, &numbered(specs));
        prop_assert_eq!(is_over_allocated(&draft), total_allocated(&draft) > total);
    }

    /// Allocating exactly the total is not over-allocation.
    #[test]
    fn prop_exact_allocation_is_not_over(total in total_amount()) {
        let draft = build_draft(total, &[(1, AllocationKind::Fixed, total)]);
        prop_assert!(!is_over_allocated(&draft));
    }

    /// Recompute is deterministic for the same draft.
    #[test]
    fn prop_recompute_is_deterministic(
        total in total_amount(),
        specs in allocation_specs(),
    ) {
        let engine = ReconciliationEngine::default();
        let draft = build_draft(total, &numbered(specs));
        let copy = draft.clone();

        prop_assert_eq!(engine.recompute(&draft), engine.recompute(&copy));
    }

    /// Changing kind keeps the raw amount whenever the change is accepted.
    #[test]
    fn prop_change_kind_keeps_amount(
        total in total_amount(),
        (kind, amount) in kind_and_amount(),
    ) {
        let engine = ReconciliationEngine::default();
        let draft = build_draft(total, &[(1, kind, amount)]);
        let id = draft.allocations()[0].id;
        let target = match kind {
            AllocationKind::Fixed => AllocationKind::Percentage,
            AllocationKind::Percentage => AllocationKind::Fixed,
        };

        match engine.change_allocation_kind(&draft, id, target) {
            Ok(changed) => {
                let allocation = changed.allocation(id).unwrap();
                prop_assert_eq!(allocation.kind, target);
                prop_assert_eq!(allocation.amount, amount);
            }
            Err(_) => {
                prop_assert!(target == AllocationKind::Percentage && amount > Decimal::ONE_HUNDRED);
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::allocation::error::AllocationError;
    use rust_decimal_macros::dec;

    /// Scenario: total 500 with a $200 fixed and a 50% allocation.
    #[test]
    fn test_mixed_allocation_scenario() {
        let draft = build_draft(
            dec!(500),
            &[
                (1, AllocationKind::Fixed, dec!(200)),
                (2, AllocationKind::Percentage, dec!(50)),
            ],
        );
        let summary = ReconciliationEngine::default().recompute(&draft);

        assert_eq!(summary.total_allocated, dec!(450));
        assert_eq!(summary.remaining, dec!(50));
        assert!(!summary.is_over_allocated);
    }

    /// Scenario: a rejected edit leaves the caller's draft as it was.
    #[test]
    fn test_rejected_edits_leave_draft_unchanged() {
        let engine = ReconciliationEngine::default();
        let draft = build_draft(dec!(500), &[(1, AllocationKind::Fixed, dec!(200))]);
        let before = draft.clone();
        let id = draft.allocations()[0].id;

        assert!(matches!(
            engine.add_allocation(&draft, CategoryId(1), AllocationKind::Fixed, dec!(5), None),
            Err(AllocationError::DuplicateCategory(_))
        ));
        assert!(matches!(
            engine.update_allocation_amount(&draft, id, dec!(-5)),
            Err(AllocationError::InvalidAmount { .. })
        ));
        assert_eq!(draft, before);
    }
}

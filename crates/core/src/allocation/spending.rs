//! Spending against allocations: utilization, usage levels and alert thresholds.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AllocationId, CategoryId};

use super::model::effective_amount;
use super::types::{AlertLevel, BudgetDraft};
use crate::period::BudgetMonth;

/// Utilization at which an allocation turns to `Warning`.
const WARNING_PERCENT: Decimal = Decimal::from_parts(75, 0, 0, false, 0);
/// Utilization at which an allocation turns to `Critical`.
const CRITICAL_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// Coarse usage classification used to colour progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    /// Below 75% used.
    OnTrack,
    /// At least 75% used.
    Warning,
    /// At least 90% used, or spending against a zero allocation.
    Critical,
}

impl UsageLevel {
    /// Classifies a utilization percentage.
    #[must_use]
    pub fn from_utilization(percent: Decimal) -> Self {
        if percent >= CRITICAL_PERCENT {
            Self::Critical
        } else if percent >= WARNING_PERCENT {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

/// Spending status of one allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    /// Allocation ID.
    pub allocation_id: AllocationId,
    /// Category ID.
    pub category_id: CategoryId,
    /// Effective allocated amount.
    pub budgeted: Decimal,
    /// Amount spent in the period.
    pub spent: Decimal,
    /// `budgeted - spent`.
    pub remaining: Decimal,
    /// `spent / budgeted * 100` rounded to 2 places; `None` for a zero allocation.
    pub utilization_percent: Option<Decimal>,
    /// Usage classification.
    pub level: UsageLevel,
    /// Enabled thresholds that have been reached, ascending.
    pub triggered_alerts: Vec<AlertLevel>,
}

/// Month overview of spending against a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingOverview {
    /// Month the spending belongs to.
    pub month: BudgetMonth,
    /// Budget total.
    pub total_budget: Decimal,
    /// Spending summed over allocated categories.
    pub total_spent: Decimal,
    /// `total_budget - total_spent`.
    pub remaining: Decimal,
    /// `total_spent / total_budget * 100` rounded to 2 places; zero for a zero total.
    pub utilization_percent: Decimal,
    /// Per-allocation status in display order.
    pub categories: Vec<CategorySpending>,
}

/// Evaluates spending for `month` against the draft's allocations.
///
/// Spending in categories without an allocation is ignored.
#[must_use]
pub fn evaluate_spending(
    draft: &BudgetDraft,
    month: BudgetMonth,
    spent_by_category: &HashMap<CategoryId, Decimal>,
) -> SpendingOverview {
    let categories: Vec<CategorySpending> = draft
        .allocations()
        .iter()
        .map(|allocation| {
            let budgeted = effective_amount(allocation, draft.total_amount());
            let spent = spent_by_category
                .get(&allocation.category_id)
                .copied()
                .unwrap_or(Decimal::ZERO);

            let utilization_percent = utilization(spent, budgeted);
            let (level, triggered_alerts) = match utilization_percent {
                Some(percent) => (
                    UsageLevel::from_utilization(percent),
                    allocation
                        .alert_thresholds
                        .enabled()
                        .filter(|level| percent >= level.percent())
                        .collect(),
                ),
                // Any spending against nothing has used the whole allocation.
                None if spent > Decimal::ZERO => (
                    UsageLevel::Critical,
                    allocation.alert_thresholds.enabled().collect(),
                ),
                None => (UsageLevel::OnTrack, Vec::new()),
            };

            CategorySpending {
                allocation_id: allocation.id,
                category_id: allocation.category_id,
                budgeted,
                spent,
                remaining: budgeted.saturating_sub(spent),
                utilization_percent,
                level,
                triggered_alerts,
            }
        })
        .collect();

    let total_budget = draft.total_amount();
    let total_spent = categories
        .iter()
        .map(|c| c.spent)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    SpendingOverview {
        month,
        total_budget,
        total_spent,
        remaining: total_budget.saturating_sub(total_spent),
        utilization_percent: utilization(total_spent, total_budget).unwrap_or(Decimal::ZERO),
        categories,
    }
}

/// `spent / budgeted * 100` to 2 places; `Decimal::MAX` when out of range.
fn utilization(spent: Decimal, budgeted: Decimal) -> Option<Decimal> {
    if budgeted.is_zero() {
        return None;
    }
    let percent = spent
        .checked_div(budgeted)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::MAX, |percent| percent.round_dp(2));
    Some(percent)
}

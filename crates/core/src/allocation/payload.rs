//! Conversion between drafts and the budget service's request/response shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AllocationId, BudgetCategoryId, BudgetId, CategoryId};
use tracing::debug;

use super::error::AllocationError;
use super::model::effective_amount;
use super::types::{
    AlertThresholds, AllocationKind, BudgetAllocation, BudgetDraft, Category,
    UNKNOWN_CATEGORY_LABEL, validate_total,
};

/// Body of a budget create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRequestPayload {
    /// Budget total.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Category allocations with percentages already resolved.
    pub categories: Vec<BudgetCategoryPayload>,
}

/// One category allocation in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct BudgetCategoryPayload {
    /// Category ID.
    pub category_id: CategoryId,
    /// Effective dollar amount at submission time.
    #[serde(with = "rust_decimal::serde::float")]
    pub allocated_amount: Decimal,
    /// Notify at 50% usage.
    pub alert_threshold_50: bool,
    /// Notify at 75% usage.
    pub alert_threshold_75: bool,
    /// Notify at 90% usage.
    pub alert_threshold_90: bool,
    /// Notify at 100% usage.
    pub alert_threshold_100: bool,
}

/// A stored budget-category allocation as returned by the budget service.
///
/// Missing or null alert flags mean "enabled".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategoryRecord {
    /// Record ID.
    #[serde(default)]
    pub id: Option<BudgetCategoryId>,
    /// Owning budget.
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
    /// Category ID.
    pub category_id: CategoryId,
    /// Stored dollar amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub allocated_amount: Decimal,
    /// Notify at 50% usage.
    #[serde(default)]
    pub alert_threshold_50: Option<bool>,
    /// Notify at 75% usage.
    #[serde(default)]
    pub alert_threshold_75: Option<bool>,
    /// Notify at 90% usage.
    #[serde(default)]
    pub alert_threshold_90: Option<bool>,
    /// Notify at 100% usage.
    #[serde(default)]
    pub alert_threshold_100: Option<bool>,
}

impl BudgetCategoryRecord {
    fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            at_50: self.alert_threshold_50.unwrap_or(true),
            at_75: self.alert_threshold_75.unwrap_or(true),
            at_90: self.alert_threshold_90.unwrap_or(true),
            at_100: self.alert_threshold_100.unwrap_or(true),
        }
    }
}

impl BudgetRequestPayload {
    /// Builds the submission payload for a draft.
    ///
    /// Allocations with a zero amount are left out. Percentages are resolved
    /// against the draft total, since the service only stores dollar amounts.
    #[must_use]
    pub fn from_draft(draft: &BudgetDraft) -> Self {
        let categories = draft
            .allocations
            .iter()
            .filter(|a| a.amount > Decimal::ZERO)
            .map(|a| BudgetCategoryPayload {
                category_id: a.category_id,
                allocated_amount: effective_amount(a, draft.total_amount),
                alert_threshold_50: a.alert_thresholds.at_50,
                alert_threshold_75: a.alert_thresholds.at_75,
                alert_threshold_90: a.alert_thresholds.at_90,
                alert_threshold_100: a.alert_thresholds.at_100,
            })
            .collect();

        Self {
            amount: draft.total_amount,
            categories,
        }
    }
}

impl From<&BudgetDraft> for BudgetRequestPayload {
    fn from(draft: &BudgetDraft) -> Self {
        Self::from_draft(draft)
    }
}

impl BudgetDraft {
    /// Rebuilds an editable draft from a stored budget.
    ///
    /// Stored amounts are dollar values, so every allocation comes back as
    /// `Fixed`. Records with a zero amount are skipped and each allocation
    /// gets a fresh session ID. Labels come from `categories`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` for a total or stored amount
    /// outside `0..=MAX_AMOUNT`, and `AllocationError::DuplicateCategory` if
    /// two records share a category.
    pub fn from_persisted(
        total_amount: Decimal,
        records: &[BudgetCategoryRecord],
        categories: &[Category],
    ) -> Result<Self, AllocationError> {
        let mut draft = Self::new(total_amount)?;

        for record in records.iter().filter(|r| r.allocated_amount > Decimal::ZERO) {
            validate_total(record.allocated_amount)?;
            if draft.has_category(record.category_id) {
                return Err(AllocationError::DuplicateCategory(record.category_id));
            }

            let name = categories
                .iter()
                .find(|c| c.id == record.category_id)
                .map_or(UNKNOWN_CATEGORY_LABEL, |c| c.name.as_str());

            draft.allocations.push(BudgetAllocation {
                id: AllocationId::new(),
                category_id: record.category_id,
                kind: AllocationKind::Fixed,
                amount: record.allocated_amount,
                display_name: Some(name.to_string()),
                alert_thresholds: record.alert_thresholds(),
            });
        }

        debug!(
            budget_id = ?records.iter().find_map(|r| r.budget_id),
            total_amount = %total_amount,
            allocations = draft.allocations.len(),
            skipped = records.len() - draft.allocations.len(),
            "draft loaded from stored budget"
        );
        Ok(draft)
    }
}

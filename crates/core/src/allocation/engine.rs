//! Reconciliation engine: validated edits to a budget draft.
//!
//! Every operation takes the caller's draft by reference and returns a new
//! draft. A rejected edit returns an error and the caller keeps the draft it
//! already holds. Concurrent edits must be applied serially against the
//! latest draft value.

use rust_decimal::Decimal;
use tally_shared::config::AllocationConfig;
use tally_shared::types::{AllocationId, CategoryId, Currency, Money};
use tracing::{debug, trace};

use super::error::AllocationError;
use super::model;
use super::types::{
    AlertLevel, AlertThresholds, AllocationKind, BudgetAllocation, BudgetDraft, BudgetSummary,
    Category, SummaryDisplay, validate_total,
};

/// Settings the engine applies to new allocations and to display output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllocationSettings {
    /// Currency used when rendering amounts.
    pub currency: Currency,
    /// Overrides the currency's minor units when rendering amounts.
    pub display_decimal_places: Option<u32>,
    /// Thresholds enabled on newly added allocations.
    pub default_alerts: AlertThresholds,
}

impl AllocationSettings {
    /// Decimal places used for display.
    #[must_use]
    pub fn decimal_places(&self) -> u32 {
        self.display_decimal_places
            .unwrap_or_else(|| self.currency.minor_units())
    }
}

impl From<&AllocationConfig> for AllocationSettings {
    fn from(config: &AllocationConfig) -> Self {
        Self {
            currency: config.currency,
            display_decimal_places: config.display_decimal_places,
            default_alerts: config.default_alerts.into(),
        }
    }
}

/// Applies user edits to budget drafts while preserving their invariants.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    settings: AllocationSettings,
}

impl ReconciliationEngine {
    /// Creates an engine with the given settings.
    #[must_use]
    pub const fn new(settings: AllocationSettings) -> Self {
        Self { settings }
    }

    /// Engine settings.
    #[must_use]
    pub const fn settings(&self) -> &AllocationSettings {
        &self.settings
    }

    /// Appends an allocation for `category_id` with a fresh allocation ID.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::DuplicateCategory` if the category is already
    /// allocated, or `AllocationError::InvalidAmount` if `amount` is negative,
    /// a percentage above 100 or a fixed amount above `MAX_AMOUNT`.
    pub fn add_allocation(
        &self,
        draft: &BudgetDraft,
        category_id: CategoryId,
        kind: AllocationKind,
        amount: Decimal,
        display_name: Option<String>,
    ) -> Result<BudgetDraft, AllocationError> {
        if draft.has_category(category_id) {
            return Err(AllocationError::DuplicateCategory(category_id));
        }
        kind.validate(amount)?;

        let allocation = BudgetAllocation {
            id: AllocationId::new(),
            category_id,
            kind,
            amount,
            display_name: normalize_name(display_name),
            alert_thresholds: self.settings.default_alerts,
        };

        debug!(
            allocation_id = %allocation.id,
            category_id = %category_id,
            ?kind,
            %amount,
            "allocation added"
        );

        let mut next = draft.clone();
        next.allocations.push(allocation);
        Ok(next)
    }

    /// Removes an allocation. Unknown IDs leave the draft unchanged, since a
    /// repeated remove click is expected in interactive use.
    #[must_use]
    pub fn remove_allocation(
        &self,
        draft: &BudgetDraft,
        allocation_id: AllocationId,
    ) -> BudgetDraft {
        let mut next = draft.clone();
        next.allocations.retain(|a| a.id != allocation_id);

        if next.allocations.len() != draft.allocations.len() {
            debug!(allocation_id = %allocation_id, "allocation removed");
        }
        next
    }

    /// Replaces an allocation's amount, validated against its current kind.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::AllocationNotFound` for an unknown ID, or
    /// `AllocationError::InvalidAmount` if the amount is not valid for the kind.
    pub fn update_allocation_amount(
        &self,
        draft: &BudgetDraft,
        allocation_id: AllocationId,
        new_amount: Decimal,
    ) -> Result<BudgetDraft, AllocationError> {
        let index = draft.position(allocation_id)?;
        draft.allocations[index].kind.validate(new_amount)?;

        let mut next = draft.clone();
        next.allocations[index].amount = new_amount;

        debug!(allocation_id = %allocation_id, amount = %new_amount, "allocation amount updated");
        Ok(next)
    }

    /// Switches an allocation between fixed and percentage.
    ///
    /// The numeric amount is carried over unchanged and reinterpreted: a fixed
    /// `10` becomes `10%`, not the percentage equivalent of $10.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::AllocationNotFound` for an unknown ID, or
    /// `AllocationError::InvalidAmount` when the carried amount is above 100
    /// and the new kind is `Percentage`.
    pub fn change_allocation_kind(
        &self,
        draft: &BudgetDraft,
        allocation_id: AllocationId,
        new_kind: AllocationKind,
    ) -> Result<BudgetDraft, AllocationError> {
        let index = draft.position(allocation_id)?;
        new_kind.validate(draft.allocations[index].amount)?;

        let mut next = draft.clone();
        next.allocations[index].kind = new_kind;

        debug!(allocation_id = %allocation_id, kind = ?new_kind, "allocation kind changed");
        Ok(next)
    }

    /// Changes the budget total. Percentage allocations re-resolve against it.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` if `total_amount` is negative
    /// or above `MAX_AMOUNT`.
    pub fn set_total_amount(
        &self,
        draft: &BudgetDraft,
        total_amount: Decimal,
    ) -> Result<BudgetDraft, AllocationError> {
        validate_total(total_amount)?;

        let mut next = draft.clone();
        next.total_amount = total_amount;

        debug!(total_amount = %total_amount, "budget total updated");
        Ok(next)
    }

    /// Sets or clears an allocation's label override. Blank names clear it.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::AllocationNotFound` for an unknown ID.
    pub fn set_display_name(
        &self,
        draft: &BudgetDraft,
        allocation_id: AllocationId,
        display_name: Option<String>,
    ) -> Result<BudgetDraft, AllocationError> {
        let index = draft.position(allocation_id)?;

        let mut next = draft.clone();
        next.allocations[index].display_name = normalize_name(display_name);

        debug!(
            allocation_id = %allocation_id,
            display_name = next.allocations[index].display_name.as_deref(),
            "allocation display name set"
        );
        Ok(next)
    }

    /// Switches a single alert threshold on or off.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::AllocationNotFound` for an unknown ID.
    pub fn set_alert_threshold(
        &self,
        draft: &BudgetDraft,
        allocation_id: AllocationId,
        level: AlertLevel,
        enabled: bool,
    ) -> Result<BudgetDraft, AllocationError> {
        let index = draft.position(allocation_id)?;

        let mut next = draft.clone();
        let thresholds = &mut next.allocations[index].alert_thresholds;
        *thresholds = thresholds.with(level, enabled);

        debug!(allocation_id = %allocation_id, ?level, enabled, "alert threshold set");
        Ok(next)
    }

    /// Recomputes the derived figures for display. Pure and deterministic.
    #[must_use]
    pub fn recompute(&self, draft: &BudgetDraft) -> BudgetSummary {
        let summary = model::summarize(draft);
        trace!(
            total_amount = %summary.total_amount,
            total_allocated = %summary.total_allocated,
            remaining = %summary.remaining,
            over_allocated = summary.is_over_allocated,
            "draft recomputed"
        );
        summary
    }

    /// Renders a summary with the configured currency and precision.
    #[must_use]
    pub fn display_summary(&self, summary: &BudgetSummary) -> SummaryDisplay {
        let places = self.settings.decimal_places();
        let currency = self.settings.currency;
        let format = |amount: Decimal| Money::new(amount, currency).format_with_places(places);

        SummaryDisplay {
            total_amount: format(summary.total_amount),
            total_allocated: format(summary.total_allocated),
            remaining: format(summary.remaining),
            over_allocated_by: summary
                .is_over_allocated
                .then(|| format(summary.over_allocated_by)),
            progress_percent: summary
                .percentage_allocated
                .min(Decimal::ONE_HUNDRED)
                .round_dp(2),
            is_over_allocated: summary.is_over_allocated,
        }
    }

    /// Categories that can still be added, in the order given.
    #[must_use]
    pub fn available_categories<'a>(
        &self,
        draft: &BudgetDraft,
        categories: &'a [Category],
    ) -> Vec<&'a Category> {
        categories
            .iter()
            .filter(|c| !draft.has_category(c.id))
            .collect()
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

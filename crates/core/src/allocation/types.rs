//! Allocation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::config::AlertDefaults;
use tally_shared::types::{AllocationId, CategoryId};

use super::error::{AllocationError, AmountViolation};

/// Label shown when an allocation references a category the caller does not know.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Largest accepted budget total or fixed amount: one quadrillion.
///
/// Keeps every derived sum and product well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// How an allocation's `amount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    /// Absolute currency value.
    Fixed,
    /// Share of the budget total, in `[0, 100]`.
    Percentage,
}

impl AllocationKind {
    /// Checks that `amount` is acceptable for this kind.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` if the amount is negative,
    /// above 100 for a percentage, or above [`MAX_AMOUNT`] for a fixed amount.
    pub fn validate(self, amount: Decimal) -> Result<(), AllocationError> {
        match self {
            Self::Fixed => validate_total(amount),
            Self::Percentage if amount < Decimal::ZERO => Err(AllocationError::InvalidAmount {
                amount,
                violation: AmountViolation::Negative,
            }),
            Self::Percentage if amount > Decimal::ONE_HUNDRED => {
                Err(AllocationError::InvalidAmount {
                    amount,
                    violation: AmountViolation::PercentageAboveHundred,
                })
            }
            Self::Percentage => Ok(()),
        }
    }
}

/// Checks a budget total or other currency amount.
///
/// # Errors
///
/// Returns `AllocationError::InvalidAmount` if the amount is negative or above
/// [`MAX_AMOUNT`].
pub fn validate_total(amount: Decimal) -> Result<(), AllocationError> {
    if amount < Decimal::ZERO {
        return Err(AllocationError::InvalidAmount {
            amount,
            violation: AmountViolation::Negative,
        });
    }

    if amount > MAX_AMOUNT {
        return Err(AllocationError::InvalidAmount {
            amount,
            violation: AmountViolation::AboveMaximum,
        });
    }

    Ok(())
}

/// Usage percentages that can raise a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    /// 50% of the allocation used.
    #[serde(rename = "50")]
    Fifty,
    /// 75% of the allocation used.
    #[serde(rename = "75")]
    SeventyFive,
    /// 90% of the allocation used.
    #[serde(rename = "90")]
    Ninety,
    /// Allocation fully used.
    #[serde(rename = "100")]
    Hundred,
}

impl AlertLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 4] = [Self::Fifty, Self::SeventyFive, Self::Ninety, Self::Hundred];

    /// The usage percentage at which this level fires.
    #[must_use]
    pub fn percent(self) -> Decimal {
        match self {
            Self::Fifty => Decimal::from(50),
            Self::SeventyFive => Decimal::from(75),
            Self::Ninety => Decimal::from(90),
            Self::Hundred => Decimal::ONE_HUNDRED,
        }
    }
}

/// Per-allocation notification switches.
///
/// Carried through the engine untouched; only the spending evaluation reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AlertThresholds {
    /// Notify at 50% usage.
    pub at_50: bool,
    /// Notify at 75% usage.
    pub at_75: bool,
    /// Notify at 90% usage.
    pub at_90: bool,
    /// Notify at 100% usage.
    pub at_100: bool,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self::from(AlertDefaults::default())
    }
}

impl From<AlertDefaults> for AlertThresholds {
    fn from(defaults: AlertDefaults) -> Self {
        Self {
            at_50: defaults.at_50,
            at_75: defaults.at_75,
            at_90: defaults.at_90,
            at_100: defaults.at_100,
        }
    }
}

impl AlertThresholds {
    /// Returns whether notifications are enabled for `level`.
    #[must_use]
    pub const fn is_enabled(&self, level: AlertLevel) -> bool {
        match level {
            AlertLevel::Fifty => self.at_50,
            AlertLevel::SeventyFive => self.at_75,
            AlertLevel::Ninety => self.at_90,
            AlertLevel::Hundred => self.at_100,
        }
    }

    /// Returns a copy with `level` switched on or off.
    #[must_use]
    pub const fn with(mut self, level: AlertLevel, enabled: bool) -> Self {
        match level {
            AlertLevel::Fifty => self.at_50 = enabled,
            AlertLevel::SeventyFive => self.at_75 = enabled,
            AlertLevel::Ninety => self.at_90 = enabled,
            AlertLevel::Hundred => self.at_100 = enabled,
        }
        self
    }

    /// Enabled levels in ascending order.
    pub fn enabled(&self) -> impl Iterator<Item = AlertLevel> {
        let thresholds = *self;
        AlertLevel::ALL
            .into_iter()
            .filter(move |level| thresholds.is_enabled(*level))
    }
}

/// Category classification as reported by the category service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Movement between accounts.
    Transfer,
}

/// A category record owned by the category service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Classification.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// One category's claim on a budget draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAllocation {
    /// Session-local allocation ID.
    pub id: AllocationId,
    /// Referenced category.
    pub category_id: CategoryId,
    /// Interpretation of `amount`.
    pub kind: AllocationKind,
    /// Currency value for `Fixed`, percentage for `Percentage`.
    pub amount: Decimal,
    /// Label override; the category name is used when absent.
    pub display_name: Option<String>,
    /// Notification switches.
    pub alert_thresholds: AlertThresholds,
}

impl BudgetAllocation {
    /// Resolves the label shown for this allocation.
    #[must_use]
    pub fn label<'a>(&'a self, categories: &'a [Category]) -> &'a str {
        if let Some(name) = self.display_name.as_deref() {
            return name;
        }

        categories
            .iter()
            .find(|c| c.id == self.category_id)
            .map_or(UNKNOWN_CATEGORY_LABEL, |c| c.name.as_str())
    }
}

/// In-memory state of a budget being created or edited.
///
/// Drafts are values: the reconciliation engine returns a new draft for every
/// edit and never mutates the one it was given. Insertion order of
/// allocations is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetDraft {
    pub(super) total_amount: Decimal,
    pub(super) allocations: Vec<BudgetAllocation>,
}

impl BudgetDraft {
    /// Creates an empty draft.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` if `total_amount` is negative
    /// or above [`MAX_AMOUNT`].
    pub fn new(total_amount: Decimal) -> Result<Self, AllocationError> {
        validate_total(total_amount)?;
        Ok(Self {
            total_amount,
            allocations: Vec::new(),
        })
    }

    /// The budget's overall cap for the period.
    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Allocations in display order.
    #[must_use]
    pub fn allocations(&self) -> &[BudgetAllocation] {
        &self.allocations
    }

    /// Looks up an allocation by ID.
    #[must_use]
    pub fn allocation(&self, id: AllocationId) -> Option<&BudgetAllocation> {
        self.allocations.iter().find(|a| a.id == id)
    }

    /// Returns true if `category_id` already has an allocation.
    #[must_use]
    pub fn has_category(&self, category_id: CategoryId) -> bool {
        self.allocations.iter().any(|a| a.category_id == category_id)
    }

    /// Number of allocations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Returns true if the draft has no allocations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub(super) fn position(&self, id: AllocationId) -> Result<usize, AllocationError> {
        self.allocations
            .iter()
            .position(|a| a.id == id)
            .ok_or(AllocationError::AllocationNotFound(id))
    }
}

/// Resolved amount of a single allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationAmount {
    /// Allocation ID.
    pub allocation_id: AllocationId,
    /// Dollar value after percentages are applied.
    pub effective_amount: Decimal,
}

/// Derived figures for a draft. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Budget total the figures were computed against.
    pub total_amount: Decimal,
    /// Sum of effective amounts.
    pub total_allocated: Decimal,
    /// `total_amount - total_allocated`; negative when over-allocated.
    pub remaining: Decimal,
    /// True iff `total_allocated > total_amount`.
    pub is_over_allocated: bool,
    /// `total_allocated / total_amount * 100`, zero for a zero total.
    pub percentage_allocated: Decimal,
    /// Amount by which allocations exceed the total, zero otherwise.
    pub over_allocated_by: Decimal,
    /// Effective amount per allocation, in display order.
    pub per_allocation: Vec<AllocationAmount>,
}

/// Summary figures rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    /// Formatted budget total.
    pub total_amount: String,
    /// Formatted allocated total.
    pub total_allocated: String,
    /// Formatted remaining amount.
    pub remaining: String,
    /// Formatted overage, present only when over-allocated.
    pub over_allocated_by: Option<String>,
    /// Percentage allocated, rounded to 2 places and capped at 100 for progress bars.
    pub progress_percent: Decimal,
    /// True iff allocations exceed the total.
    pub is_over_allocated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_rejects_negative() {
        let err = AllocationKind::Fixed.validate(dec!(-0.01)).unwrap_err();
        assert_eq!(
            err,
            AllocationError::InvalidAmount {
                amount: dec!(-0.01),
                violation: AmountViolation::Negative,
            }
        );
    }

    #[test]
    fn test_validate_percentage_bounds() {
        assert!(AllocationKind::Percentage.validate(dec!(0)).is_ok());
        assert!(AllocationKind::Percentage.validate(dec!(100)).is_ok());
        assert!(matches!(
            AllocationKind::Percentage.validate(dec!(100.01)),
            Err(AllocationError::InvalidAmount {
                violation: AmountViolation::PercentageAboveHundred,
                ..
            })
        ));
        assert!(AllocationKind::Fixed.validate(dec!(100.01)).is_ok());
    }

    #[test]
    fn test_max_amount_is_one_quadrillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    }

    #[test]
    fn test_amounts_above_maximum_rejected() {
        let above = MAX_AMOUNT + dec!(0.01);
        assert!(validate_total(MAX_AMOUNT).is_ok());
        assert_eq!(
            validate_total(above),
            Err(AllocationError::InvalidAmount {
                amount: above,
                violation: AmountViolation::AboveMaximum,
            })
        );
        assert!(AllocationKind::Fixed.validate(Decimal::MAX).is_err());
        assert!(BudgetDraft::new(Decimal::MAX).is_err());
    }

    #[test]
    fn test_new_draft_rejects_negative_total() {
        assert!(BudgetDraft::new(dec!(-1)).is_err());
        let draft = BudgetDraft::new(dec!(0)).unwrap();
        assert!(draft.is_empty());
        assert_eq!(draft.total_amount(), dec!(0));
    }

    #[test]
    fn test_alert_thresholds_toggle() {
        let thresholds = AlertThresholds::default().with(AlertLevel::SeventyFive, false);
        assert!(thresholds.is_enabled(AlertLevel::Fifty));
        assert!(!thresholds.is_enabled(AlertLevel::SeventyFive));
        assert_eq!(
            thresholds.enabled().collect::<Vec<_>>(),
            vec![AlertLevel::Fifty, AlertLevel::Ninety, AlertLevel::Hundred]
        );
    }

    #[test]
    fn test_label_resolution() {
        let categories = vec![Category {
            id: CategoryId(1),
            name: "Groceries".to_string(),
            category_type: CategoryType::Expense,
        }];
        let mut allocation = BudgetAllocation {
            id: AllocationId::new(),
            category_id: CategoryId(1),
            kind: AllocationKind::Fixed,
            amount: dec!(10),
            display_name: None,
            alert_thresholds: AlertThresholds::default(),
        };
        assert_eq!(allocation.label(&categories), "Groceries");

        allocation.display_name = Some("Food".to_string());
        assert_eq!(allocation.label(&categories), "Food");

        allocation.display_name = None;
        allocation.category_id = CategoryId(99);
        assert_eq!(allocation.label(&categories), UNKNOWN_CATEGORY_LABEL);
    }

    #[test]
    fn test_category_type_field_name() {
        let category: Category =
            serde_json::from_str(r#"{"id": 4, "name": "Salary", "type": "income"}"#).unwrap();
        assert_eq!(category.id, CategoryId(4));
        assert_eq!(category.category_type, CategoryType::Income);
    }
}

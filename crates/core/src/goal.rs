//! Savings goals attached to a budget.
//!
//! A goal tracks progress toward a target amount by a target date, with an
//! optional recurring contribution. Like budget drafts, goals are immutable
//! values: a contribution returns a new goal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::AppError;
use tally_shared::types::{BudgetId, GoalId};
use thiserror::Error;
use tracing::debug;

use crate::allocation::{AmountViolation, MAX_AMOUNT};

/// Longest accepted goal name, in characters.
pub const MAX_GOAL_NAME_LEN: usize = 100;

/// How often an automatic contribution is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    /// Every week.
    Weekly,
    /// Every two weeks.
    Biweekly,
    /// Every month.
    #[default]
    Monthly,
}

/// Rejected goal input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    /// Name is blank after trimming.
    #[error("Goal name cannot be empty")]
    EmptyName,

    /// Name exceeds [`MAX_GOAL_NAME_LEN`] characters.
    #[error("Goal name cannot exceed {max} characters")]
    NameTooLong {
        /// Character limit.
        max: usize,
    },

    /// Target, saved or recurring amount out of range.
    #[error("Invalid goal amount {amount}: {violation}")]
    InvalidAmount {
        /// Rejected value.
        amount: Decimal,
        /// Rule that was broken.
        violation: AmountViolation,
    },

    /// Contribution of zero or less.
    #[error("Contribution must be positive, got {0}")]
    NonPositiveContribution(Decimal),
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Recurring contribution toward a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoContribution {
    /// Amount per contribution.
    pub amount: Decimal,
    /// Contribution schedule.
    pub frequency: ContributionFrequency,
}

/// A validated savings goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    name: String,
    target_amount: Decimal,
    current_amount: Decimal,
    target_date: NaiveDate,
    auto_contribution: Option<AutoContribution>,
}

/// Derived progress figures for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Amount saved so far.
    pub current_amount: Decimal,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount still to save, never negative.
    pub remaining: Decimal,
    /// `current / target * 100` to 2 places; zero for a zero target.
    pub progress_percentage: Decimal,
    /// True once the saved amount reaches the target.
    pub is_complete: bool,
}

impl GoalDraft {
    /// Creates a goal with nothing saved yet.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::EmptyName` or `GoalError::NameTooLong` for a bad
    /// name, and `GoalError::InvalidAmount` for a target outside
    /// `0..=MAX_AMOUNT`.
    pub fn new(
        name: impl Into<String>,
        target_amount: Decimal,
        target_date: NaiveDate,
    ) -> Result<Self, GoalError> {
        let name = normalize_goal_name(&name.into())?;
        check_amount(target_amount)?;

        Ok(Self {
            name,
            target_amount,
            current_amount: Decimal::ZERO,
            target_date,
            auto_contribution: None,
        })
    }

    /// Sets or clears the recurring contribution. `None` or zero clears it.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::InvalidAmount` for an amount outside
    /// `0..=MAX_AMOUNT`.
    pub fn with_auto_contribution(
        mut self,
        amount: Option<Decimal>,
        frequency: ContributionFrequency,
    ) -> Result<Self, GoalError> {
        self.auto_contribution = match amount {
            Some(amount) if !amount.is_zero() => {
                check_amount(amount)?;
                Some(AutoContribution { amount, frequency })
            }
            _ => None,
        };
        Ok(self)
    }

    /// Goal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Amount to reach.
    #[must_use]
    pub const fn target_amount(&self) -> Decimal {
        self.target_amount
    }

    /// Amount saved so far.
    #[must_use]
    pub const fn current_amount(&self) -> Decimal {
        self.current_amount
    }

    /// Date the goal should be reached by.
    #[must_use]
    pub const fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// Recurring contribution, if any.
    #[must_use]
    pub const fn auto_contribution(&self) -> Option<AutoContribution> {
        self.auto_contribution
    }

    /// Adds a contribution. Saving past the target is allowed.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::NonPositiveContribution` for zero or less, and
    /// `GoalError::InvalidAmount` if the amount or the new saved total is
    /// above `MAX_AMOUNT`.
    pub fn contribute(&self, amount: Decimal) -> Result<Self, GoalError> {
        if amount <= Decimal::ZERO {
            return Err(GoalError::NonPositiveContribution(amount));
        }
        check_amount(amount)?;
        let current_amount = self.current_amount.saturating_add(amount);
        check_amount(current_amount)?;

        debug!(goal = %self.name, %amount, %current_amount, "goal contribution added");
        Ok(Self {
            current_amount,
            ..self.clone()
        })
    }

    /// Computes progress toward the target.
    #[must_use]
    pub fn progress(&self) -> GoalProgress {
        let progress_percentage = if self.target_amount.is_zero() {
            Decimal::ZERO
        } else {
            self.current_amount
                .checked_div(self.target_amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Decimal::MAX, |percent| percent.round_dp(2))
        };

        GoalProgress {
            current_amount: self.current_amount,
            target_amount: self.target_amount,
            remaining: self
                .target_amount
                .saturating_sub(self.current_amount)
                .max(Decimal::ZERO),
            progress_percentage,
            is_complete: self.current_amount >= self.target_amount,
        }
    }

    /// Rebuilds a goal from its stored form.
    ///
    /// A missing frequency defaults to monthly; a missing or zero recurring
    /// amount means no recurring contribution.
    ///
    /// # Errors
    ///
    /// Returns a `GoalError` if the stored name or amounts fail validation.
    pub fn from_record(record: &GoalRecord) -> Result<Self, GoalError> {
        check_amount(record.current_amount)?;
        let goal = Self::new(
            record.goal_name.clone(),
            record.target_amount,
            record.target_date,
        )?
        .with_auto_contribution(
            record.auto_contribute_amount,
            record.auto_contribute_frequency.unwrap_or_default(),
        )?;

        debug!(goal_id = %record.id, budget_id = %record.budget_id, "goal loaded");
        Ok(Self {
            current_amount: record.current_amount,
            ..goal
        })
    }
}

/// Body of a goal create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPayload {
    /// Goal name.
    pub goal_name: String,
    /// Amount to reach.
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    /// Target date, `YYYY-MM-DD`.
    pub target_date: NaiveDate,
    /// Recurring amount, null when there is none.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub auto_contribute_amount: Option<Decimal>,
    /// Recurring schedule; sent even without an amount.
    pub auto_contribute_frequency: ContributionFrequency,
}

impl From<&GoalDraft> for GoalPayload {
    fn from(goal: &GoalDraft) -> Self {
        Self {
            goal_name: goal.name.clone(),
            target_amount: goal.target_amount,
            target_date: goal.target_date,
            auto_contribute_amount: goal.auto_contribution.map(|auto| auto.amount),
            auto_contribute_frequency: goal
                .auto_contribution
                .map(|auto| auto.frequency)
                .unwrap_or_default(),
        }
    }
}

/// A stored goal as returned by the budget service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Goal ID.
    pub id: GoalId,
    /// Budget the goal belongs to.
    pub budget_id: BudgetId,
    /// Goal name.
    pub goal_name: String,
    /// Amount to reach.
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    /// Amount saved so far.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub current_amount: Decimal,
    /// Target date.
    pub target_date: NaiveDate,
    /// Recurring amount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub auto_contribute_amount: Option<Decimal>,
    /// Recurring schedule.
    #[serde(default)]
    pub auto_contribute_frequency: Option<ContributionFrequency>,
}

fn normalize_goal_name(name: &str) -> Result<String, GoalError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GoalError::EmptyName);
    }
    if name.chars().count() > MAX_GOAL_NAME_LEN {
        return Err(GoalError::NameTooLong {
            max: MAX_GOAL_NAME_LEN,
        });
    }
    Ok(name.to_string())
}

fn check_amount(amount: Decimal) -> Result<(), GoalError> {
    let violation = if amount < Decimal::ZERO {
        AmountViolation::Negative
    } else if amount > MAX_AMOUNT {
        AmountViolation::AboveMaximum
    } else {
        return Ok(());
    };
    Err(GoalError::InvalidAmount { amount, violation })
}

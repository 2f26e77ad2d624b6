//! Budget months.
//!
//! Monthly budgets are keyed by calendar month in `YYYY-MM` form.

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors parsing or building a budget month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthParseError {
    /// Input is not `YYYY-MM`.
    #[error("Invalid budget month '{0}': expected YYYY-MM")]
    InvalidFormat(String),

    /// Month number outside 1..=12, or a year chrono cannot represent.
    #[error("Month out of range: {year}-{month}")]
    OutOfRange {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BudgetMonth {
    first_day: NaiveDate,
}

impl BudgetMonth {
    /// Builds a month from its year and 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns `MonthParseError::OutOfRange` for an invalid month.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or(MonthParseError::OutOfRange { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// The current month in UTC.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Month number, 1-based.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if `date` falls within this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Moves `delta` months forward (or back when negative).
    ///
    /// Always lands on the first of the month, so there is no day overflow.
    /// Returns `None` outside the representable date range.
    #[must_use]
    pub fn navigate(&self, delta: i32) -> Option<Self> {
        let months = Months::new(delta.unsigned_abs());
        let first_day = if delta >= 0 {
            self.first_day.checked_add_months(months)
        } else {
            self.first_day.checked_sub_months(months)
        }?;
        Some(Self { first_day })
    }

    /// Returns true if this month is `other` or later.
    #[must_use]
    pub fn is_at_or_beyond(&self, other: Self) -> bool {
        *self >= other
    }

    /// Human label, e.g. "June 2025".
    #[must_use]
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}

impl std::fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl std::str::FromStr for BudgetMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthParseError::InvalidFormat(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.is_empty() || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for BudgetMonth {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BudgetMonth> for String {
    fn from(month: BudgetMonth) -> Self {
        month.to_string()
    }
}

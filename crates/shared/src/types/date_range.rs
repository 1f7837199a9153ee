//! Inclusive calendar date ranges.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// An inclusive `[date_from, date_to]` range of calendar dates.
///
/// No ordering is enforced between the bounds: a reversed range is
/// representable and simply contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First date of the range.
    pub date_from: NaiveDate,
    /// Last date of the range.
    pub date_to: NaiveDate,
}

impl DateRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self { date_from, date_to }
    }

    /// Returns true if the given date falls within this range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.date_from && date <= self.date_to
    }

    /// Signed duration from `date_from` to `date_to`.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.date_to - self.date_from
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.date_from, self.date_to)
    }
}

//! Earnings bucket - month-granularity revenue aggregate.
//!
//! Buckets are always replaced wholesale from the server and never incremented locally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completed-session revenue for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarningsBucket {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1 to 12
    pub month: u32,
    /// Sessions completed in the month
    #[serde(default)]
    pub count: u64,
    /// Revenue earned in the month
    #[serde(default)]
    pub total: f64,
}

impl EarningsBucket {
    /// Sort key, later months compare greater.
    #[must_use]
    pub const fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// First day of the bucket's month, if the month is valid.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Human-readable month label such as "May 2024".
    ///
    /// Falls back to `YYYY-MM` when the month is out of range.
    #[must_use]
    pub fn label(&self) -> String {
        self.first_day().map_or_else(
            || format!("{}-{:02}", self.year, self.month),
            |date| date.format("%B %Y").to_string(),
        )
    }
}

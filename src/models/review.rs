//! Patient review of a doctor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest rating a patient can give.
pub const MIN_RATING: u8 = 1;
/// Highest rating a patient can give.
pub const MAX_RATING: u8 = 5;

/// A single review as returned by `GET /doctors/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Reference to the reviewing patient
    #[serde(alias = "patient")]
    pub patient_ref: String,
    /// Star rating, 1 to 5 when well formed; anything else is kept so it can be skipped
    pub rating: i64,
    /// Review body
    #[serde(default, alias = "comment")]
    pub text: String,
    /// When the review was written
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// The rating as a star count, if it lies in the accepted range.
    #[must_use]
    pub fn stars(&self) -> Option<u8> {
        u8::try_from(self.rating)
            .ok()
            .filter(|stars| (MIN_RATING..=MAX_RATING).contains(stars))
    }

    /// Whether the rating lies in the accepted star range.
    #[must_use]
    pub fn has_valid_rating(&self) -> bool {
        self.stars().is_some()
    }
}

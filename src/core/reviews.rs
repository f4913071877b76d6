//! Reviews cache and rating distribution.
//!
//! The distribution is a pure function of the cached review list. It is never fed back
//! into the dashboard's average rating.

use crate::core::resource::Resource;
use crate::models::Review;
use crate::models::review::{MAX_RATING, MIN_RATING};
use tracing::warn;

/// Cached reviews as served by the API.
pub type ReviewsCache = Resource<Vec<Review>>;

/// How many reviews gave each star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RatingDistribution {
    counts: [u64; MAX_RATING as usize],
}

impl RatingDistribution {
    /// Tallies the valid ratings of `reviews`. Out-of-range ratings are skipped.
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut distribution = Self::default();
        for review in reviews {
            match review.stars() {
                Some(stars) => distribution.counts[usize::from(stars - MIN_RATING)] += 1,
                None => warn!(
                    "Skipping review from {} with out-of-range rating {}",
                    review.patient_ref, review.rating
                ),
            }
        }
        distribution
    }

    /// Number of reviews with `stars`; 0 for ratings outside 1..=5.
    #[must_use]
    pub fn count(&self, stars: u8) -> u64 {
        if (MIN_RATING..=MAX_RATING).contains(&stars) {
            self.counts[usize::from(stars - MIN_RATING)]
        } else {
            0
        }
    }

    /// Number of counted reviews.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Share of reviews with `stars`, in percent; 0 when there are no reviews.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self, stars: u8) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(stars) as f64 / total as f64 * 100.0
    }

    /// Mean star rating; 0 when there are no reviews.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = (MIN_RATING..=MAX_RATING)
            .map(|stars| u64::from(stars) * self.count(stars))
            .sum();
        weighted as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::review;

    #[test]
    fn test_distribution_counts_each_star() {
        let reviews = vec![review(5), review(5), review(4), review(1)];
        let distribution = RatingDistribution::from_reviews(&reviews);

        assert_eq!(distribution.count(5), 2);
        assert_eq!(distribution.count(4), 1);
        assert_eq!(distribution.count(3), 0);
        assert_eq!(distribution.count(1), 1);
        assert_eq!(distribution.total(), 4);
        assert_eq!(distribution.percentage(5), 50.0);
        assert_eq!(distribution.average(), 3.75);
    }

    #[test]
    fn test_out_of_range_ratings_are_skipped() {
        let reviews = vec![review(0), review(6), review(300), review(-1), review(3)];
        let distribution = RatingDistribution::from_reviews(&reviews);

        assert_eq!(distribution.total(), 1);
        assert_eq!(distribution.count(0), 0);
        assert_eq!(distribution.count(6), 0);
        assert_eq!(distribution.average(), 3.0);
    }

    #[test]
    fn test_empty_distribution_is_defined() {
        let distribution = RatingDistribution::from_reviews(&[]);
        assert_eq!(distribution.total(), 0);
        assert_eq!(distribution.average(), 0.0);
        assert_eq!(distribution.percentage(5), 0.0);
    }
}

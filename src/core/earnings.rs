//! Earnings cache and derived metrics.
//!
//! The bucket list is replaced wholesale on every load. Growth rate, the top month and
//! per-session averages are recomputed from the current buckets on every read and are
//! never stored.

use crate::core::resource::Resource;
use crate::models::EarningsBucket;

/// Cached earnings buckets as served by the API.
pub type EarningsCache = Resource<Vec<EarningsBucket>>;

/// Derived view over the current buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsSummary {
    /// Buckets ordered most recent first
    pub buckets: Vec<EarningsBucket>,
    /// Month-over-month growth in percent
    pub growth_rate: f64,
    /// Month with the highest total
    pub top_bucket: Option<EarningsBucket>,
    /// Revenue across all buckets
    pub total_earnings: f64,
    /// Sessions across all buckets
    pub total_sessions: u64,
}

/// Returns the buckets ordered most recent first.
///
/// The sort is stable, so buckets sharing a month keep their server order.
#[must_use]
pub fn most_recent_first(buckets: &[EarningsBucket]) -> Vec<EarningsBucket> {
    let mut sorted = buckets.to_vec();
    sorted.sort_by(|a, b| b.period().cmp(&a.period()));
    sorted
}

/// Growth of the latest month over the month before it, in percent.
///
/// Defined only when the previous month earned something; otherwise 0.
#[must_use]
pub fn growth_rate(buckets: &[EarningsBucket]) -> f64 {
    let sorted = most_recent_first(buckets);
    match sorted.as_slice() {
        [latest, previous, ..] if previous.total > 0.0 => {
            (latest.total - previous.total) / previous.total * 100.0
        }
        _ => 0.0,
    }
}

/// The month with the highest total. The most recent month wins ties.
#[must_use]
pub fn top_bucket(buckets: &[EarningsBucket]) -> Option<EarningsBucket> {
    most_recent_first(buckets)
        .into_iter()
        .fold(None, |best: Option<EarningsBucket>, bucket| match best {
            Some(current) if current.total >= bucket.total => Some(current),
            _ => Some(bucket),
        })
}

/// Average revenue per session in one bucket; 0 for a month without sessions.
#[must_use]
pub fn average_per_session(bucket: &EarningsBucket) -> f64 {
    if bucket.count == 0 {
        return 0.0;
    }
    // Cast safety: session counts stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let sessions = bucket.count as f64;
    bucket.total / sessions
}

/// Builds the full derived view for the current buckets.
#[must_use]
pub fn summarize(buckets: &[EarningsBucket]) -> EarningsSummary {
    EarningsSummary {
        buckets: most_recent_first(buckets),
        growth_rate: growth_rate(buckets),
        top_bucket: top_bucket(buckets),
        total_earnings: buckets.iter().map(|b| b.total).sum(),
        total_sessions: buckets.iter().map(|b| b.count).sum(),
    }
}

//! Dashboard aggregate cache and reconciler.
//!
//! Counters are loaded wholesale from the server and then kept current by deltas: a
//! status change moves one unit from the previous status bucket to the new one. Deltas
//! never touch `total_earnings`, and `average_rating` changes only when a profile
//! update response carries a new value.

use crate::config::FetchOrdering;
use crate::core::resource::{LoadTracker, RequestTicket, Resource};
use crate::errors::Result;
use crate::models::{AppointmentStatus, DashboardStats};
use tracing::{debug, warn};

/// Highest average rating the dashboard displays.
pub const MAX_AVERAGE_RATING: f64 = 5.0;

/// Moves one appointment from `previous` to `current` in the per-status counts.
///
/// Identical statuses are a no-op, so re-applying the same update is harmless. The
/// sum of all counts is unchanged by every delta.
pub fn apply_status_delta(
    stats: &mut DashboardStats,
    previous: AppointmentStatus,
    current: AppointmentStatus,
) {
    if previous == current {
        return;
    }
    let from = stats.counts.get_mut(previous);
    if *from == 0 {
        warn!(
            "Dashboard count for {} is already zero; counts are out of step with the server",
            previous
        );
        return;
    }
    *from -= 1;
    *stats.counts.get_mut(current) += 1;
    debug!("Dashboard delta applied: {} -> {}", previous, current);
}

/// Display value for the average rating, always a finite number in 0.0..=5.0.
#[must_use]
pub fn average_rating_display(stats: &DashboardStats) -> String {
    let rating = if stats.average_rating.is_finite() {
        stats.average_rating.clamp(0.0, MAX_AVERAGE_RATING)
    } else {
        0.0
    };
    format!("{rating:.1}")
}

/// Cached dashboard counters.
#[derive(Debug, Clone)]
pub struct DashboardCache {
    resource: Resource<DashboardStats>,
}

impl DashboardCache {
    /// Empty, idle cache.
    #[must_use]
    pub const fn new(ordering: FetchOrdering) -> Self {
        Self {
            resource: Resource::new(ordering),
        }
    }

    /// Enters `Loading` for a dashboard fetch.
    pub const fn begin(&mut self) -> RequestTicket {
        self.resource.begin()
    }

    /// Applies a resolved dashboard fetch.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<DashboardStats>) -> bool {
        self.resource.complete(ticket, result)
    }

    /// Drops the counters, as on logout.
    pub fn clear(&mut self) {
        self.resource.clear();
    }

    /// Reconciles a status change into the counts.
    ///
    /// Without a loaded dashboard there is nothing to reconcile and the change is
    /// ignored; the next load brings fresh counts anyway.
    pub fn reconcile(&mut self, previous: AppointmentStatus, current: AppointmentStatus) {
        match self.resource.data_mut() {
            Some(stats) => apply_status_delta(stats, previous, current),
            None => debug!("Dashboard not loaded, skipping {} -> {} delta", previous, current),
        }
    }

    /// Replaces the average rating with a value from a profile update response.
    ///
    /// Non-finite values are ignored; others are clamped to 0..=5.
    pub fn refresh_average_rating(&mut self, rating: f64) {
        if !rating.is_finite() {
            warn!("Ignoring non-finite average rating {}", rating);
            return;
        }
        if let Some(stats) = self.resource.data_mut() {
            stats.average_rating = rating.clamp(0.0, MAX_AVERAGE_RATING);
        }
    }

    /// Current counters; all zero before the first successful load.
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        self.resource.data().copied().unwrap_or_default()
    }

    /// Whether counters have ever been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.resource.data().is_some()
    }

    /// Loading/error tracker of the dashboard cache.
    #[must_use]
    pub const fn tracker(&self) -> &LoadTracker {
        self.resource.tracker()
    }
}

//! The single owned client state and its read selectors.
//!
//! `ClinicState` groups every cache. It is built explicitly and handed to the
//! coordinator, so tests get a fresh instance instead of resetting a shared one.

use crate::config::SyncConfig;
use crate::core::appointments::AppointmentStore;
use crate::core::dashboard::{self, DashboardCache};
use crate::core::earnings::{self, EarningsCache, EarningsSummary};
use crate::core::resource::{LoadState, LoadTracker, Resource};
use crate::core::reviews::{RatingDistribution, ReviewsCache};
use crate::models::{
    Appointment, DashboardStats, Doctor, EarningsBucket, Pagination, Profile, Review,
};
use std::fmt;

/// Identifies one cache for loading/error selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Appointment list, selected appointment and status updates
    Appointments,
    /// Dashboard counters
    Dashboard,
    /// Earnings buckets
    Earnings,
    /// Reviews
    Reviews,
    /// Doctor profile
    Profile,
    /// Public doctor directory
    Doctors,
}

impl CacheKind {
    /// Every cache.
    pub const ALL: [Self; 6] = [
        Self::Appointments,
        Self::Dashboard,
        Self::Earnings,
        Self::Reviews,
        Self::Profile,
        Self::Doctors,
    ];
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Appointments => "appointments",
            Self::Dashboard => "dashboard",
            Self::Earnings => "earnings",
            Self::Reviews => "reviews",
            Self::Profile => "profile",
            Self::Doctors => "doctors",
        };
        f.write_str(name)
    }
}

/// All client-side caches.
#[derive(Debug, Clone)]
pub struct ClinicState {
    config: SyncConfig,
    pub(crate) appointments: AppointmentStore,
    pub(crate) dashboard: DashboardCache,
    pub(crate) earnings: EarningsCache,
    pub(crate) reviews: ReviewsCache,
    pub(crate) profile: Resource<Profile>,
    pub(crate) doctors: Resource<Vec<Doctor>>,
}

impl ClinicState {
    /// Empty state using the given policies.
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        let ordering = config.fetch_ordering;
        Self {
            config,
            appointments: AppointmentStore::new(&config),
            dashboard: DashboardCache::new(ordering),
            earnings: EarningsCache::new(ordering),
            reviews: ReviewsCache::new(ordering),
            profile: Resource::new(ordering),
            doctors: Resource::new(ordering),
        }
    }

    /// Drops every cached value, as on logout.
    ///
    /// Caches are cleared in place so that responses to requests issued before the
    /// reset are recognised and dropped when they resolve.
    pub fn reset(&mut self) {
        self.appointments.clear();
        self.dashboard.clear();
        self.earnings.clear();
        self.reviews.clear();
        self.profile.clear();
        self.doctors.clear();
    }

    /// Policies this state was built with.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The appointment store, for callers that need more than the selectors below.
    #[must_use]
    pub const fn appointments(&self) -> &AppointmentStore {
        &self.appointments
    }

    // --- appointment selectors ---

    /// Appointments on the current list page.
    #[must_use]
    pub fn list(&self) -> Vec<&Appointment> {
        self.appointments.list()
    }

    /// The selected appointment.
    #[must_use]
    pub fn selected(&self) -> Option<&Appointment> {
        self.appointments.selected()
    }

    /// Pagination of the current list page.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.appointments.pagination()
    }

    /// The dashboard's recent appointments.
    #[must_use]
    pub fn recent(&self) -> Vec<&Appointment> {
        self.appointments.recent()
    }

    // --- aggregate selectors ---

    /// Dashboard counters; all zero before the first load.
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        self.dashboard.stats()
    }

    /// Average rating formatted for display, never NaN.
    #[must_use]
    pub fn average_rating_display(&self) -> String {
        dashboard::average_rating_display(&self.dashboard.stats())
    }

    /// Raw earnings buckets as served.
    #[must_use]
    pub fn earnings(&self) -> &[EarningsBucket] {
        self.earnings.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Derived earnings view, recomputed on every call.
    #[must_use]
    pub fn earnings_summary(&self) -> EarningsSummary {
        earnings::summarize(self.earnings())
    }

    /// Reviews as served.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        self.reviews.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Rating distribution, recomputed on every call.
    #[must_use]
    pub fn rating_distribution(&self) -> RatingDistribution {
        RatingDistribution::from_reviews(self.reviews())
    }

    /// Last profile returned by an update.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.data()
    }

    /// Last doctor search results.
    #[must_use]
    pub fn doctors(&self) -> &[Doctor] {
        self.doctors.data().map(Vec::as_slice).unwrap_or_default()
    }

    // --- loading / error selectors ---

    fn tracker(&self, kind: CacheKind) -> &LoadTracker {
        match kind {
            CacheKind::Appointments => self.appointments.tracker(),
            CacheKind::Dashboard => self.dashboard.tracker(),
            CacheKind::Earnings => self.earnings.tracker(),
            CacheKind::Reviews => self.reviews.tracker(),
            CacheKind::Profile => self.profile.tracker(),
            CacheKind::Doctors => self.doctors.tracker(),
        }
    }

    /// Lifecycle state of one cache.
    #[must_use]
    pub fn load_state(&self, kind: CacheKind) -> LoadState {
        self.tracker(kind).state()
    }

    /// Whether one cache has a request outstanding.
    #[must_use]
    pub fn loading(&self, kind: CacheKind) -> bool {
        self.tracker(kind).is_loading()
    }

    /// Error message of one cache.
    #[must_use]
    pub fn error(&self, kind: CacheKind) -> Option<&str> {
        self.tracker(kind).error()
    }

    /// Whether any cache has a request outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        CacheKind::ALL.iter().any(|kind| self.loading(*kind))
    }

    /// Every cache currently holding an error.
    #[must_use]
    pub fn errors(&self) -> Vec<(CacheKind, &str)> {
        CacheKind::ALL
            .iter()
            .filter_map(|kind| self.error(*kind).map(|message| (*kind, message)))
            .collect()
    }
}

impl Default for ClinicState {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

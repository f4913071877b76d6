//! Synchronization coordinator - the action dispatchers exposed to the UI layer.
//!
//! Every dispatcher follows the same shape: take the state lock briefly to validate
//! and mark the cache as loading, release it, await the gateway, then take the lock
//! again and apply the result in one synchronous step. The lock is never held across a
//! gateway call, so overlapping dispatchers interleave only at completion and the cache
//! reflects completion order.
//!
//! Dispatchers never return errors. Failures end up on the relevant cache's `error`
//! selector while previously loaded data stays readable.

use crate::config::SyncConfig;
use crate::errors::{Error, Result};
use crate::gateway::Gateway;
use crate::models::{
    AppointmentFilter, AppointmentId, AppointmentPatch, AppointmentStatus, DoctorFilter,
    ProfileUpdate,
};
use crate::state::ClinicState;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, error, info, instrument, warn};

/// Issues gateway calls and folds their results into the shared [`ClinicState`].
#[derive(Debug)]
pub struct SyncCoordinator<G: Gateway + ?Sized> {
    gateway: Arc<G>,
    state: Arc<RwLock<ClinicState>>,
}

impl<G: Gateway + ?Sized> Clone for SyncCoordinator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: Gateway + ?Sized> SyncCoordinator<G> {
    /// Coordinator over a fresh, empty state.
    #[must_use]
    pub fn new(gateway: Arc<G>, config: SyncConfig) -> Self {
        Self::with_state(gateway, Arc::new(RwLock::new(ClinicState::new(config))))
    }

    /// Coordinator over an existing state, e.g. one shared with a UI.
    #[must_use]
    pub const fn with_state(gateway: Arc<G>, state: Arc<RwLock<ClinicState>>) -> Self {
        Self { gateway, state }
    }

    /// Read access for selectors.
    pub async fn read(&self) -> RwLockReadGuard<'_, ClinicState> {
        self.state.read().await
    }

    /// Handle to the shared state.
    #[must_use]
    pub fn state(&self) -> Arc<RwLock<ClinicState>> {
        Arc::clone(&self.state)
    }

    /// Loads dashboard counters and the recent appointments.
    #[instrument(skip(self))]
    pub async fn load_dashboard(&self) {
        let ticket = self.state.write().await.dashboard.begin();
        let result = self.gateway.fetch_dashboard().await;

        let mut state = self.state.write().await;
        match result {
            Ok(payload) => {
                let recent = payload.recent_appointments;
                if state.dashboard.complete(ticket, Ok(payload.stats)) {
                    state.appointments.replace_recent(recent);
                    info!(
                        "Dashboard loaded: {} appointments tracked",
                        state.dashboard.stats().counts.total()
                    );
                }
            }
            Err(e) => {
                error!("Failed to load dashboard: {}", e);
                state.dashboard.complete(ticket, Err(e));
            }
        }
    }

    /// Loads one page of appointments, replacing the list view.
    #[instrument(skip(self))]
    pub async fn load_appointments(&self, filter: AppointmentFilter) {
        let ticket = self.state.write().await.appointments.begin_list();
        let result = self.gateway.fetch_appointments(&filter).await;

        if let Err(e) = &result {
            error!("Failed to load appointments: {}", e);
        }
        let mut state = self.state.write().await;
        if state.appointments.complete_list(ticket, result) {
            debug!("Appointment list now holds {} items", state.list().len());
        }
    }

    /// Loads a single appointment into "selected".
    #[instrument(skip(self))]
    pub async fn load_appointment(&self, id: AppointmentId) {
        let ticket = self.state.write().await.appointments.begin_selected();
        let result = self.gateway.fetch_appointment(&id).await;

        if let Err(e) = &result {
            error!("Failed to load appointment {}: {}", id, e);
        }
        self.state
            .write()
            .await
            .appointments
            .complete_selected(ticket, &id, result);
    }

    /// Drops "selected", as on navigation away from the detail view.
    pub async fn leave_appointment(&self) {
        self.state.write().await.appointments.clear_selected();
    }

    /// Changes an appointment's status and/or check-in flag.
    ///
    /// The server's echo replaces the cached copy wherever it is held, then the
    /// dashboard counts are adjusted by one unit from the previous status to the new
    /// one. Requests that break the status DAG for a cached appointment, or that set
    /// `is_checked` on anything but a confirmed appointment, are rejected locally.
    #[instrument(skip(self))]
    pub async fn update_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
        is_checked: Option<bool>,
    ) {
        let (ticket, patch) = {
            let mut state = self.state.write().await;
            match validate_status_update(&state, &id, status, is_checked) {
                Ok(patch) => (state.appointments.begin_update(), patch),
                Err(e) => {
                    state.appointments.reject(&e);
                    return;
                }
            }
        };

        let result = self.gateway.update_appointment(&id, &patch).await;
        if let Err(e) = &result {
            error!("Failed to update appointment {}: {}", id, e);
        }

        let mut state = self.state.write().await;
        let Some(change) = state.appointments.complete_update(ticket, result) else {
            return;
        };
        match change.previous {
            Some(previous) => state.dashboard.reconcile(previous, change.current),
            None => debug!(
                "Appointment {} not in delta scope, dashboard counts left unchanged",
                id
            ),
        }
        info!("Appointment {} is now {}", id, change.current);
    }

    /// Loads monthly earnings buckets.
    #[instrument(skip(self))]
    pub async fn load_earnings(&self) {
        let ticket = self.state.write().await.earnings.begin();
        let result = self.gateway.fetch_earnings().await;

        if let Err(e) = &result {
            error!("Failed to load earnings: {}", e);
        }
        self.state.write().await.earnings.complete(ticket, result);
    }

    /// Loads the review list.
    #[instrument(skip(self))]
    pub async fn load_reviews(&self) {
        let ticket = self.state.write().await.reviews.begin();
        let result = self.gateway.fetch_reviews().await;

        if let Err(e) = &result {
            error!("Failed to load reviews: {}", e);
        }
        self.state.write().await.reviews.complete(ticket, result);
    }

    /// Updates the doctor profile; a returned average rating refreshes the dashboard.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: ProfileUpdate) {
        let ticket = {
            let mut state = self.state.write().await;
            if let Err(e) = update.validate() {
                warn!("Profile update rejected: {}", e);
                state.profile.reject(&e);
                return;
            }
            state.profile.begin()
        };

        let result = self.gateway.update_profile(&update).await;
        if let Err(e) = &result {
            error!("Failed to update profile: {}", e);
        }

        let rating = result.as_ref().ok().and_then(|profile| profile.average_rating);
        let mut state = self.state.write().await;
        if state.profile.complete(ticket, result) {
            if let Some(rating) = rating {
                state.dashboard.refresh_average_rating(rating);
            }
        }
    }

    /// Searches the public doctor directory.
    #[instrument(skip(self))]
    pub async fn search_doctors(&self, filter: DoctorFilter) {
        let ticket = self.state.write().await.doctors.begin();
        let result = self.gateway.search_doctors(&filter).await;

        if let Err(e) = &result {
            error!("Failed to search doctors: {}", e);
        }
        self.state.write().await.doctors.complete(ticket, result);
    }

    /// Clears every cache, as on logout.
    pub async fn reset(&self) {
        self.state.write().await.reset();
        info!("Client state reset");
    }
}

/// Checks a status update against what the client already knows.
///
/// Appointments that are not cached are passed through; the server decides.
fn validate_status_update(
    state: &ClinicState,
    id: &AppointmentId,
    status: AppointmentStatus,
    is_checked: Option<bool>,
) -> Result<AppointmentPatch> {
    if is_checked.is_some() && status != AppointmentStatus::Confirmed {
        return Err(Error::validation(format!(
            "Check-in can only be changed on a confirmed appointment, not {status}"
        )));
    }

    if let Some(current) = state.appointments().get(id).map(|a| a.status) {
        if current != status && !current.can_transition_to(status) {
            return Err(Error::validation(format!(
                "Cannot change appointment {id} from {current} to {status}"
            )));
        }
    }

    Ok(AppointmentPatch {
        status: Some(status),
        is_checked,
    })
}

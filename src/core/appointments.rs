//! Appointment store.
//!
//! Appointments are kept once, in a map keyed by id. The list page, the "selected"
//! appointment and the dashboard's recent appointments are index views over that map,
//! so a status change lands in every view at once. Entries that no view references are
//! pruned whenever a view is replaced.
//!
//! The dashboard delta for a status change is based on the status the store held
//! *before* the change. By default only the list view supplies that previous status:
//! an appointment known only as "selected" or "recent" changes without a delta, which
//! leaves the dashboard counts out of step with the server until the next full load.

use crate::config::{CheckedOnCompletion, DeltaScope, FetchOrdering, SyncConfig};
use crate::core::resource::{LoadTracker, RequestTicket, Sequencer};
use crate::errors::{Error, Result};
use crate::models::{
    Appointment, AppointmentId, AppointmentPage, AppointmentStatus, Pagination,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// A status change applied to the store, with the previous status the delta is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status held before the change, if it came from a view in delta scope
    pub previous: Option<AppointmentStatus>,
    /// Status echoed by the server
    pub current: AppointmentStatus,
}

/// Normalized cache of appointments and their views.
#[derive(Debug, Clone)]
pub struct AppointmentStore {
    tracker: LoadTracker,
    list_sequencer: Sequencer,
    selected_sequencer: Sequencer,
    update_sequencer: Sequencer,
    entries: HashMap<AppointmentId, Appointment>,
    list: Vec<AppointmentId>,
    selected: Option<AppointmentId>,
    recent: Vec<AppointmentId>,
    pagination: Pagination,
    checked_on_completion: CheckedOnCompletion,
    delta_scope: DeltaScope,
    recent_limit: usize,
}

impl AppointmentStore {
    /// Empty store using the given policies.
    #[must_use]
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            tracker: LoadTracker::default(),
            list_sequencer: Sequencer::new(config.fetch_ordering),
            selected_sequencer: Sequencer::new(config.fetch_ordering),
            // Every update echo applies; only a cleared store turns them away.
            update_sequencer: Sequencer::new(FetchOrdering::LastCompletedWins),
            entries: HashMap::new(),
            list: Vec::new(),
            selected: None,
            recent: Vec::new(),
            pagination: Pagination::default(),
            checked_on_completion: config.checked_on_completion,
            delta_scope: config.delta_scope,
            recent_limit: config.recent_limit,
        }
    }

    // --- list view ---

    /// Enters `Loading` for a list fetch.
    pub fn begin_list(&mut self) -> RequestTicket {
        self.tracker.begin();
        self.list_sequencer.issue()
    }

    /// Applies a resolved list fetch. Returns `false` if the response was discarded.
    ///
    /// A successful page replaces the whole list view and the pagination metadata; a
    /// failure keeps the previous page.
    pub fn complete_list(&mut self, ticket: RequestTicket, result: Result<AppointmentPage>) -> bool {
        if !self.list_sequencer.admit(ticket) {
            return false;
        }
        match result {
            Ok(page) => {
                self.replace_list(page);
                self.tracker.succeed();
            }
            Err(e) => self.tracker.fail(&e),
        }
        true
    }

    /// Replaces the list view and pagination with a fetched page.
    pub fn replace_list(&mut self, page: AppointmentPage) {
        self.pagination = Pagination::from(&page);
        self.list = Vec::with_capacity(page.appointments.len());
        for appointment in page.appointments {
            // Duplicate ids on one page collapse to a single list slot.
            if !self.list.contains(&appointment.id) {
                self.list.push(appointment.id.clone());
            }
            self.entries.insert(appointment.id.clone(), appointment);
        }
        self.prune();
        debug!(
            "List view replaced: {} appointments, page {}/{}",
            self.list.len(),
            self.pagination.page,
            self.pagination.total_pages
        );
    }

    // --- selected view ---

    /// Enters `Loading` for a single-appointment fetch.
    pub fn begin_selected(&mut self) -> RequestTicket {
        self.tracker.begin();
        self.selected_sequencer.issue()
    }

    /// Applies a resolved single-appointment fetch for `requested`.
    ///
    /// Not-found responses, and responses for a different id, clear "selected" rather
    /// than leaving a stale record behind. Any other failure keeps the stale record.
    pub fn complete_selected(
        &mut self,
        ticket: RequestTicket,
        requested: &AppointmentId,
        result: Result<Appointment>,
    ) -> bool {
        if !self.selected_sequencer.admit(ticket) {
            return false;
        }
        let result = result.and_then(|appointment| {
            if appointment.id == *requested {
                Ok(appointment)
            } else {
                Err(Error::Api {
                    status: crate::errors::NOT_FOUND_STATUS,
                    message: format!(
                        "Requested appointment {requested} but received {}",
                        appointment.id
                    ),
                })
            }
        });
        match result {
            Ok(appointment) => {
                self.set_selected(appointment);
                self.tracker.succeed();
            }
            Err(e) => {
                if e.is_not_found() {
                    self.clear_selected();
                }
                self.tracker.fail(&e);
            }
        }
        true
    }

    /// Makes `appointment` the selected one.
    pub fn set_selected(&mut self, appointment: Appointment) {
        let id = appointment.id.clone();
        self.entries.insert(id.clone(), appointment);
        self.selected = Some(id);
        self.prune();
    }

    /// Drops the selected appointment, e.g. on navigation away.
    pub fn clear_selected(&mut self) {
        if self.selected.take().is_some() {
            self.prune();
        }
    }

    // --- recent view ---

    /// Replaces the dashboard's recent view, keeping at most the configured number.
    pub fn replace_recent(&mut self, appointments: Vec<Appointment>) {
        self.recent = Vec::with_capacity(self.recent_limit.min(appointments.len()));
        for appointment in appointments.into_iter().take(self.recent_limit) {
            if !self.recent.contains(&appointment.id) {
                self.recent.push(appointment.id.clone());
            }
            self.entries.insert(appointment.id.clone(), appointment);
        }
        self.prune();
    }

    // --- mutations ---

    /// Enters `Loading` for a status update.
    pub fn begin_update(&mut self) -> RequestTicket {
        self.tracker.begin();
        self.update_sequencer.issue()
    }

    /// Applies a resolved status update.
    ///
    /// Returns the change to reconcile into the dashboard, or `None` if the update
    /// failed or was issued before the store was cleared.
    pub fn complete_update(
        &mut self,
        ticket: RequestTicket,
        result: Result<Appointment>,
    ) -> Option<StatusChange> {
        if !self.update_sequencer.admit(ticket) {
            return None;
        }
        match result {
            Ok(updated) => {
                let change = self.apply_status_change(updated);
                self.tracker.succeed();
                Some(change)
            }
            Err(e) => {
                self.tracker.fail(&e);
                None
            }
        }
    }

    /// Replaces the cached copy of `updated` in every view that holds it.
    ///
    /// Absence from a view is not an error; the update lands wherever the id is found.
    /// The returned previous status is read before the replacement, from the views
    /// allowed by the delta scope.
    pub fn apply_status_change(&mut self, mut updated: Appointment) -> StatusChange {
        let previous = self.delta_source_status(&updated.id);
        let current = updated.status;

        if current == AppointmentStatus::Completed
            && self.checked_on_completion == CheckedOnCompletion::Reset
        {
            updated.is_checked = false;
        }

        match self.entries.get_mut(&updated.id) {
            Some(slot) => {
                trace!("Replacing cached appointment {}", updated.id);
                *slot = updated;
            }
            None => debug!(
                "Appointment {} is not cached in any view, skipping",
                updated.id
            ),
        }

        StatusChange { previous, current }
    }

    /// Empties every view, as on logout. Requests still in flight are orphaned.
    pub fn clear(&mut self) {
        self.tracker = LoadTracker::default();
        self.list_sequencer.advance_generation();
        self.selected_sequencer.advance_generation();
        self.update_sequencer.advance_generation();
        self.entries.clear();
        self.list.clear();
        self.selected = None;
        self.recent.clear();
        self.pagination = Pagination::default();
    }

    /// Records a failure raised before any request was issued.
    pub fn reject(&mut self, error: &Error) {
        warn!("Appointment request rejected: {}", error);
        self.tracker.fail(error);
    }

    // --- selectors ---

    /// Appointments in the list view, in server order.
    #[must_use]
    pub fn list(&self) -> Vec<&Appointment> {
        self.resolve(&self.list)
    }

    /// The selected appointment.
    #[must_use]
    pub fn selected(&self) -> Option<&Appointment> {
        self.selected.as_ref().and_then(|id| self.entries.get(id))
    }

    /// The dashboard's recent appointments, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<&Appointment> {
        self.resolve(&self.recent)
    }

    /// Pagination metadata of the list view.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Any cached appointment by id.
    #[must_use]
    pub fn get(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.entries.get(id)
    }

    /// Whether the list view contains `id`.
    #[must_use]
    pub fn in_list(&self, id: &AppointmentId) -> bool {
        self.list.contains(id)
    }

    /// Number of appointments held across all views.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.entries.len()
    }

    /// Loading/error tracker of the appointments cache.
    #[must_use]
    pub const fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }

    fn delta_source_status(&self, id: &AppointmentId) -> Option<AppointmentStatus> {
        let in_scope = match self.delta_scope {
            DeltaScope::List => self.in_list(id),
            DeltaScope::AnyView => true,
        };
        if in_scope {
            self.entries.get(id).map(|a| a.status)
        } else {
            None
        }
    }

    fn resolve(&self, ids: &[AppointmentId]) -> Vec<&Appointment> {
        ids.iter().filter_map(|id| self.entries.get(id)).collect()
    }

    fn prune(&mut self) {
        let referenced: HashSet<&AppointmentId> = self
            .list
            .iter()
            .chain(self.recent.iter())
            .chain(self.selected.iter())
            .collect();
        let before = self.entries.len();
        self.entries.retain(|id, _| referenced.contains(id));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            trace!("Pruned {} unreferenced appointments", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{appointment, page_of};

    fn store() -> AppointmentStore {
        AppointmentStore::new(&SyncConfig::default())
    }

    fn confirmed(id: &str, is_checked: bool) -> Appointment {
        let mut a = appointment(id, AppointmentStatus::Confirmed);
        a.is_checked = is_checked;
        a
    }

    #[test]
    fn test_replace_list_drops_previous_filter_items() {
        let mut store = store();
        store.replace_list(page_of(vec![
            appointment("1", AppointmentStatus::Pending),
            appointment("2", AppointmentStatus::Pending),
        ]));
        store.replace_list(page_of(vec![appointment("3", AppointmentStatus::Completed)]));

        let ids: Vec<&str> = store.list().into_iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
        assert!(store.get(&"1".into()).is_none());
        assert_eq!(store.cached_len(), 1);
        assert_eq!(store.pagination().total, 1);
    }

    #[test]
    fn test_status_change_reaches_list_and_selected() {
        let mut store = store();
        store.replace_list(page_of(vec![appointment("1", AppointmentStatus::Pending)]));
        store.set_selected(appointment("1", AppointmentStatus::Pending));

        let change = store.apply_status_change(appointment("1", AppointmentStatus::Confirmed));

        assert_eq!(change.previous, Some(AppointmentStatus::Pending));
        assert_eq!(change.current, AppointmentStatus::Confirmed);
        assert_eq!(store.list()[0].status, AppointmentStatus::Confirmed);
        assert_eq!(
            store.selected().map(|a| a.status),
            Some(AppointmentStatus::Confirmed)
        );
    }

    #[test]
    fn test_selected_only_change_has_no_delta_by_default() {
        let mut store = store();
        store.set_selected(appointment("9", AppointmentStatus::Pending));

        let change = store.apply_status_change(appointment("9", AppointmentStatus::Cancelled));

        assert_eq!(change.previous, None);
        assert_eq!(
            store.selected().map(|a| a.status),
            Some(AppointmentStatus::Cancelled)
        );
    }

    #[test]
    fn test_any_view_scope_uses_selected_status() {
        let config = SyncConfig {
            delta_scope: DeltaScope::AnyView,
            ..SyncConfig::default()
        };
        let mut store = AppointmentStore::new(&config);
        store.set_selected(appointment("9", AppointmentStatus::Pending));

        let change = store.apply_status_change(appointment("9", AppointmentStatus::Cancelled));
        assert_eq!(change.previous, Some(AppointmentStatus::Pending));
    }

    #[test]
    fn test_uncached_change_is_skipped_silently() {
        let mut store = store();
        let change = store.apply_status_change(appointment("404", AppointmentStatus::Confirmed));
        assert_eq!(change.previous, None);
        assert_eq!(store.cached_len(), 0);
        assert_eq!(store.tracker().error(), None);
    }

    #[test]
    fn test_is_checked_kept_on_completion_by_default() {
        let mut store = store();
        store.replace_list(page_of(vec![confirmed("1", true)]));

        let mut completed = confirmed("1", true);
        completed.status = AppointmentStatus::Completed;
        store.apply_status_change(completed);

        assert!(store.list()[0].is_checked);
    }

    #[test]
    fn test_is_checked_reset_on_completion_when_configured() {
        let config = SyncConfig {
            checked_on_completion: CheckedOnCompletion::Reset,
            ..SyncConfig::default()
        };
        let mut store = AppointmentStore::new(&config);
        store.replace_list(page_of(vec![confirmed("1", true)]));

        let mut completed = confirmed("1", true);
        completed.status = AppointmentStatus::Completed;
        store.apply_status_change(completed);

        assert!(!store.list()[0].is_checked);
    }

    #[test]
    fn test_not_found_clears_selected() {
        let mut store = store();
        store.set_selected(appointment("1", AppointmentStatus::Pending));

        let ticket = store.begin_selected();
        let applied = store.complete_selected(
            ticket,
            &"2".into(),
            Err(Error::Api {
                status: 404,
                message: "Appointment not found".to_string(),
            }),
        );

        assert!(applied);
        assert!(store.selected().is_none());
        assert_eq!(store.tracker().error(), Some("Appointment not found"));
    }

    #[test]
    fn test_transport_failure_keeps_stale_selected() {
        let mut store = store();
        store.set_selected(appointment("1", AppointmentStatus::Pending));

        let ticket = store.begin_selected();
        store.complete_selected(
            ticket,
            &"1".into(),
            Err(Error::Transport {
                message: "offline".to_string(),
            }),
        );

        assert_eq!(store.selected().map(|a| a.id.as_str()), Some("1"));
        assert_eq!(store.tracker().error(), Some("offline"));
    }

    #[test]
    fn test_mismatched_id_clears_selected() {
        let mut store = store();
        let ticket = store.begin_selected();
        store.complete_selected(
            ticket,
            &"1".into(),
            Ok(appointment("2", AppointmentStatus::Pending)),
        );
        assert!(store.selected().is_none());
        assert!(store.tracker().error().is_some());
    }

    #[test]
    fn test_recent_view_is_bounded() {
        let config = SyncConfig {
            recent_limit: 2,
            ..SyncConfig::default()
        };
        let mut store = AppointmentStore::new(&config);
        store.replace_recent(vec![
            appointment("a", AppointmentStatus::Pending),
            appointment("b", AppointmentStatus::Confirmed),
            appointment("c", AppointmentStatus::Completed),
        ]);

        let ids: Vec<&str> = store.recent().into_iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.cached_len(), 2);
    }

    #[test]
    fn test_clear_selected_keeps_listed_entry() {
        let mut store = store();
        store.replace_list(page_of(vec![appointment("1", AppointmentStatus::Pending)]));
        store.set_selected(appointment("1", AppointmentStatus::Pending));
        store.clear_selected();

        assert!(store.selected().is_none());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_clear_empties_views_and_orphans_update() {
        let mut store = store();
        store.replace_list(page_of(vec![appointment("1", AppointmentStatus::Pending)]));
        store.replace_recent(vec![appointment("2", AppointmentStatus::Pending)]);
        let in_flight = store.begin_update();

        store.clear();
        store.replace_list(page_of(vec![appointment("1", AppointmentStatus::Pending)]));
        let change = store.complete_update(
            in_flight,
            Ok(appointment("1", AppointmentStatus::Confirmed)),
        );

        assert!(change.is_none());
        assert_eq!(store.list()[0].status, AppointmentStatus::Pending);
        assert!(store.recent().is_empty());
        assert_eq!(store.tracker().state(), crate::core::resource::LoadState::Idle);
    }

    #[test]
    fn test_recent_only_change_reaches_recent_without_delta() {
        let mut store = store();
        store.replace_list(page_of(vec![appointment("1", AppointmentStatus::Pending)]));
        store.replace_recent(vec![appointment("r", AppointmentStatus::Pending)]);

        let change = store.apply_status_change(appointment("r", AppointmentStatus::Confirmed));

        assert_eq!(change.previous, None);
        assert_eq!(store.recent()[0].status, AppointmentStatus::Confirmed);
    }
}

//! Appointment model - a scheduled consultation between a patient and a doctor.
//!
//! Status transitions form a small DAG: pending can become confirmed or cancelled,
//! confirmed can become completed, and completed/cancelled are terminal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned appointment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked by the patient, awaiting the doctor
    Pending,
    /// Accepted by the doctor
    Confirmed,
    /// Session took place (terminal)
    Completed,
    /// Session will not take place (terminal)
    Cancelled,
}

impl AppointmentStatus {
    /// Every status, in dashboard display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Terminal statuses have no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Statuses reachable from `self` in one step.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Completed],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Whether `self -> next` is a legal edge.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next_statuses().contains(&next)
    }

    /// Lowercase wire name, as used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Billing status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not paid yet
    #[default]
    Pending,
    /// Paid in full
    Completed,
}

/// Appointment as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Unique identifier
    #[serde(alias = "_id")]
    pub id: AppointmentId,
    /// Reference to the booking patient
    #[serde(alias = "patient")]
    pub patient_ref: String,
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Time slot, as displayed (e.g. "10:30")
    pub time: String,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Billing status
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Fee charged for the session
    #[serde(default)]
    pub amount: f64,
    /// Doctor's check-in flag, meaningful only while confirmed
    #[serde(default)]
    pub is_checked: bool,
    /// Free-text description supplied at booking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_description: Option<String>,
}

/// Query filter for the appointment list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AppointmentFilter {
    /// Restrict to one status
    pub status: Option<AppointmentStatus>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl AppointmentFilter {
    /// Filter on a status, first page.
    #[must_use]
    pub const fn by_status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            page: None,
        }
    }

    /// Same filter, different page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Query pairs in the order the endpoint documents them.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

/// One page of the appointment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPage {
    /// Appointments on this page
    pub appointments: Vec<Appointment>,
    /// Number of pages for the current filter
    pub total_pages: u32,
    /// Page that was returned
    pub current_page: u32,
    /// Total appointments matching the filter
    pub total: u64,
}

/// Pagination metadata kept alongside the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Current page
    pub page: u32,
    /// Number of pages
    pub total_pages: u32,
    /// Total matching appointments
    pub total: u64,
}

impl From<&AppointmentPage> for Pagination {
    fn from(page: &AppointmentPage) -> Self {
        Self {
            page: page.current_page,
            total_pages: page.total_pages,
            total: page.total,
        }
    }
}

/// Body of `PUT /doctors/appointments/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    /// New status, if changing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    /// New check-in flag, if changing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_transition_dag() {
        use AppointmentStatus::{Cancelled, Completed, Confirmed, Pending};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in AppointmentStatus::ALL {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_appointment_accepts_mongo_style_id() {
        let json = r#"{
            "_id": "a1",
            "patient": "p9",
            "date": "2024-05-02",
            "time": "09:30",
            "status": "confirmed",
            "paymentStatus": "completed",
            "amount": 40.0,
            "isChecked": true
        }"#;

        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.id, AppointmentId::from("a1"));
        assert_eq!(appointment.patient_ref, "p9");
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(appointment.payment_status, PaymentStatus::Completed);
        assert!(appointment.is_checked);
        assert!(appointment.problem_description.is_none());
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = AppointmentPatch {
            status: Some(AppointmentStatus::Confirmed),
            is_checked: None,
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"status":"confirmed"}"#
        );
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = AppointmentFilter::by_status(AppointmentStatus::Pending).with_page(3);
        assert_eq!(
            filter.query_pairs(),
            vec![("status", "pending".to_string()), ("page", "3".to_string())]
        );
        assert!(AppointmentFilter::default().query_pairs().is_empty());
    }
}

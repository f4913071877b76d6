//! Dashboard aggregate as served by `GET /doctors/dashboard`.

use super::appointment::{Appointment, AppointmentStatus};
use serde::{Deserialize, Serialize};

/// Number of appointments in each status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCounts {
    /// Appointments awaiting confirmation
    pub pending: u64,
    /// Confirmed appointments
    pub confirmed: u64,
    /// Completed appointments
    pub completed: u64,
    /// Cancelled appointments
    pub cancelled: u64,
}

impl StatusCounts {
    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: AppointmentStatus) -> u64 {
        match status {
            AppointmentStatus::Pending => self.pending,
            AppointmentStatus::Confirmed => self.confirmed,
            AppointmentStatus::Completed => self.completed,
            AppointmentStatus::Cancelled => self.cancelled,
        }
    }

    /// Mutable slot for one status.
    pub fn get_mut(&mut self, status: AppointmentStatus) -> &mut u64 {
        match status {
            AppointmentStatus::Pending => &mut self.pending,
            AppointmentStatus::Confirmed => &mut self.confirmed,
            AppointmentStatus::Completed => &mut self.completed,
            AppointmentStatus::Cancelled => &mut self.cancelled,
        }
    }

    /// Sum over every status.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.confirmed + self.completed + self.cancelled
    }

    /// Tallies the statuses of a collection of appointments.
    pub fn tally<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> Self {
        let mut counts = Self::default();
        for appointment in appointments {
            *counts.get_mut(appointment.status) += 1;
        }
        counts
    }
}

/// Precomputed dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// Per-status appointment counts
    pub counts: StatusCounts,
    /// Revenue from completed sessions
    pub total_earnings: f64,
    /// Mean patient rating, 0 to 5
    pub average_rating: f64,
}

/// Full dashboard response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardPayload {
    /// Aggregate counters
    pub stats: DashboardStats,
    /// Most recent appointments, newest first
    pub recent_appointments: Vec<Appointment>,
}

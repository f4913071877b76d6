//! API gateway seam.
//!
//! The [`Gateway`] trait is the only way the synchronization layer talks to the server.
//! Implementations own transport concerns (auth headers, timeouts, retries); the
//! coordinator only sees resolved results.

/// `reqwest`-backed gateway for the clinic REST API
pub mod http;

pub use http::HttpGateway;

use crate::errors::Result;
use crate::models::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentPage, AppointmentPatch,
    DashboardPayload, Doctor, DoctorFilter, EarningsBucket, Profile, ProfileUpdate, Review,
};
use async_trait::async_trait;

/// Asynchronous access to the clinic API.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /doctors/dashboard`
    async fn fetch_dashboard(&self) -> Result<DashboardPayload>;

    /// `GET /doctors/appointments?status=&page=`
    async fn fetch_appointments(&self, filter: &AppointmentFilter) -> Result<AppointmentPage>;

    /// `GET /doctors/appointments/{id}`
    async fn fetch_appointment(&self, id: &AppointmentId) -> Result<Appointment>;

    /// `PUT /doctors/appointments/{id}`
    async fn update_appointment(
        &self,
        id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Appointment>;

    /// `PUT /doctors/profile`
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile>;

    /// `GET /doctors/earnings`
    async fn fetch_earnings(&self) -> Result<Vec<EarningsBucket>>;

    /// `GET /doctors/reviews`
    async fn fetch_reviews(&self) -> Result<Vec<Review>>;

    /// `GET /users/doctors?{filters}`, unauthenticated
    async fn search_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>>;
}

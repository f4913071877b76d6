//! Shared test utilities for `clinic-sync`.
//!
//! Fixtures with sensible defaults, plus a scripted [`MockGateway`] that the
//! coordinator tests drive instead of a live server.
#![allow(clippy::unwrap_used)]

use crate::errors::{Error, NOT_FOUND_STATUS, Result};
use crate::gateway::Gateway;
use crate::models::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentPage, AppointmentPatch,
    AppointmentStatus, DashboardPayload, DashboardStats, Doctor, DoctorFilter, EarningsBucket,
    PaymentStatus, Profile, ProfileUpdate, Review, StatusCounts,
};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an appointment with sensible defaults.
///
/// # Defaults
/// * date: 2024-06-01, time "10:00"
/// * amount: 50.0, payment pending, not checked in
/// * `patient_ref`: "patient-{id}"
pub fn appointment(id: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: AppointmentId::new(id),
        patient_ref: format!("patient-{id}"),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        time: "10:00".to_string(),
        status,
        payment_status: PaymentStatus::Pending,
        amount: 50.0,
        is_checked: false,
        problem_description: None,
    }
}

/// Wraps appointments in a single page.
pub fn page_of(appointments: Vec<Appointment>) -> AppointmentPage {
    let total = appointments.len() as u64;
    AppointmentPage {
        appointments,
        total_pages: 1,
        current_page: 1,
        total,
    }
}

/// Dashboard payload whose counters agree with `appointments`. No recent appointments.
pub fn dashboard_for(appointments: &[Appointment]) -> DashboardPayload {
    let total_earnings = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .map(|a| a.amount)
        .sum();
    DashboardPayload {
        stats: DashboardStats {
            counts: StatusCounts::tally(appointments),
            total_earnings,
            average_rating: 0.0,
        },
        recent_appointments: Vec::new(),
    }
}

/// Creates a review with the given star rating.
pub fn review(rating: i64) -> Review {
    Review {
        patient_ref: "patient-1".to_string(),
        rating,
        text: "Very attentive".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

/// Creates a directory entry.
pub fn doctor(id: &str, specialization: &str) -> Doctor {
    Doctor {
        id: id.to_string(),
        name: format!("Dr. {id}"),
        specialization: specialization.to_string(),
        city: Some("Lyon".to_string()),
        consultation_fee: 60.0,
        average_rating: 4.5,
    }
}

/// A scripted list reply: available immediately or released by the test.
pub enum PageReply {
    Ready(Result<AppointmentPage>),
    Gated(oneshot::Receiver<Result<AppointmentPage>>),
}

/// In-memory gateway with queued replies.
///
/// Queued replies are consumed in order; an empty queue answers with a transport
/// error. Single appointments live in a server-side map that updates mutate, so
/// `fetch_appointment` and `update_appointment` behave like the real endpoints.
/// Every call is recorded in [`MockGateway::calls`] before it resolves.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<String>>,
    dashboard: Mutex<VecDeque<Result<DashboardPayload>>>,
    pages: Mutex<HashMap<AppointmentFilter, VecDeque<PageReply>>>,
    server: Mutex<HashMap<AppointmentId, Appointment>>,
    update_failures: Mutex<VecDeque<Error>>,
    earnings: Mutex<VecDeque<Result<Vec<EarningsBucket>>>>,
    reviews: Mutex<VecDeque<Result<Vec<Review>>>>,
    profile: Mutex<VecDeque<Result<Profile>>>,
    doctors: Mutex<VecDeque<Result<Vec<Doctor>>>>,
}

impl MockGateway {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_dashboard(&self, reply: Result<DashboardPayload>) {
        self.dashboard.lock().unwrap().push_back(reply);
    }

    pub fn push_page(&self, filter: AppointmentFilter, reply: Result<AppointmentPage>) {
        self.push_page_reply(filter, PageReply::Ready(reply));
    }

    pub fn push_gated_page(
        &self,
        filter: AppointmentFilter,
        reply: oneshot::Receiver<Result<AppointmentPage>>,
    ) {
        self.push_page_reply(filter, PageReply::Gated(reply));
    }

    fn push_page_reply(&self, filter: AppointmentFilter, reply: PageReply) {
        self.pages
            .lock()
            .unwrap()
            .entry(filter)
            .or_default()
            .push_back(reply);
    }

    /// Stores an appointment server-side.
    pub fn insert_appointment(&self, appointment: Appointment) {
        self.server
            .lock()
            .unwrap()
            .insert(appointment.id.clone(), appointment);
    }

    /// Makes the next `update_appointment` fail with `error`.
    pub fn fail_next_update(&self, error: Error) {
        self.update_failures.lock().unwrap().push_back(error);
    }

    pub fn push_earnings(&self, reply: Result<Vec<EarningsBucket>>) {
        self.earnings.lock().unwrap().push_back(reply);
    }

    pub fn push_reviews(&self, reply: Result<Vec<Review>>) {
        self.reviews.lock().unwrap().push_back(reply);
    }

    pub fn push_profile(&self, reply: Result<Profile>) {
        self.profile.lock().unwrap().push_back(reply);
    }

    pub fn push_doctors(&self, reply: Result<Vec<Doctor>>) {
        self.doctors.lock().unwrap().push_back(reply);
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T>>>, call: &str) -> Result<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted(call)))
    }
}

fn unscripted(call: &str) -> Error {
    Error::Transport {
        message: format!("no scripted reply for {call}"),
    }
}

fn not_found() -> Error {
    Error::Api {
        status: NOT_FOUND_STATUS,
        message: "Appointment not found".to_string(),
    }
}

fn render_query(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload> {
        self.record("fetch_dashboard".to_string());
        Self::pop(&self.dashboard, "fetch_dashboard")
    }

    async fn fetch_appointments(&self, filter: &AppointmentFilter) -> Result<AppointmentPage> {
        self.record(format!(
            "fetch_appointments {}",
            render_query(&filter.query_pairs())
        ));
        let reply = self
            .pages
            .lock()
            .unwrap()
            .get_mut(filter)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(PageReply::Ready(result)) => result,
            Some(PageReply::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                Err(Error::Transport {
                    message: "gated reply dropped".to_string(),
                })
            }),
            None => Err(unscripted("fetch_appointments")),
        }
    }

    async fn fetch_appointment(&self, id: &AppointmentId) -> Result<Appointment> {
        self.record(format!("fetch_appointment {id}"));
        self.server
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_appointment(
        &self,
        id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Appointment> {
        self.record(format!("update_appointment {id}"));
        if let Some(error) = self.update_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        let mut server = self.server.lock().unwrap();
        let appointment = server.get_mut(id).ok_or_else(not_found)?;
        if let Some(status) = patch.status {
            appointment.status = status;
        }
        if let Some(is_checked) = patch.is_checked {
            appointment.is_checked = is_checked;
        }
        Ok(appointment.clone())
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> Result<Profile> {
        self.record("update_profile".to_string());
        Self::pop(&self.profile, "update_profile")
    }

    async fn fetch_earnings(&self) -> Result<Vec<EarningsBucket>> {
        self.record("fetch_earnings".to_string());
        Self::pop(&self.earnings, "fetch_earnings")
    }

    async fn fetch_reviews(&self) -> Result<Vec<Review>> {
        self.record("fetch_reviews".to_string());
        Self::pop(&self.reviews, "fetch_reviews")
    }

    async fn search_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>> {
        self.record(format!(
            "search_doctors {}",
            render_query(&filter.query_pairs())
        ));
        Self::pop(&self.doctors, "search_doctors")
    }
}

//! Wire models mirrored from the clinic API.
//!
//! Every type here deserializes from the camelCase JSON the gateway returns. The models
//! carry no cache state of their own; the caches in [`crate::core`] own them.

pub mod appointment;
pub mod dashboard;
pub mod doctor;
pub mod earnings;
pub mod profile;
pub mod review;

pub use appointment::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentPage, AppointmentPatch,
    AppointmentStatus, Pagination, PaymentStatus,
};
pub use dashboard::{DashboardPayload, DashboardStats, StatusCounts};
pub use doctor::{Doctor, DoctorFilter};
pub use earnings::EarningsBucket;
pub use profile::{Profile, ProfileUpdate};
pub use review::Review;

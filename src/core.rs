//! Core cache logic - framework-agnostic caches, reconciliation and projections.
//!
//! Nothing in here performs I/O. The coordinator issues gateway calls and hands the
//! resolved results to these caches, which mutate synchronously.

/// Appointment store: normalized map with list, selected and recent views
pub mod appointments;
/// Dashboard aggregate cache and status-delta reconciler
pub mod dashboard;
/// Earnings buckets and derived metrics
pub mod earnings;
/// Text rendering helpers for summaries
pub mod report;
/// Per-cache loading/error state machine and request sequencing
pub mod resource;
/// Review list and rating distribution
pub mod reviews;

//! Text rendering helpers for dashboard, earnings and review summaries.
//!
//! These are framework-agnostic and return plain strings that a UI or the CLI can show
//! as they are.

use crate::core::dashboard::average_rating_display;
use crate::core::earnings::{EarningsSummary, average_per_session};
use crate::core::reviews::RatingDistribution;
use crate::models::review::{MAX_RATING, MIN_RATING};
use crate::models::{AppointmentStatus, DashboardStats};
use std::fmt::Write as _;

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based bar like: `[████████░░] 80.0%`
///
/// # Arguments
/// * `percent` - Percentage (0-100); values outside are clamped in the bar only
/// * `bar_length` - Length of the bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };

    // Cast safety: clamped ∈ [0, 100], length is small (10-20).
    // Result is mathematically in [0, length], truncation/sign loss intentional for display.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percent:.1}%", "█".repeat(filled), "░".repeat(empty))
}

/// Formats an amount as currency, e.g. "$50.00".
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Formats a growth rate with an explicit sign, e.g. "+25.0%".
#[must_use]
pub fn format_growth(rate: f64) -> String {
    if rate >= 0.0 {
        format!("+{rate:.1}%")
    } else {
        format!("{rate:.1}%")
    }
}

/// One line per status plus earnings and rating.
#[must_use]
pub fn format_dashboard(stats: &DashboardStats) -> String {
    let mut out = String::new();
    for status in AppointmentStatus::ALL {
        let _ = writeln!(out, "{status:<10} {}", stats.counts.get(status));
    }
    let _ = writeln!(out, "earnings   {}", format_amount(stats.total_earnings));
    let _ = write!(out, "rating     {}", average_rating_display(stats));
    out
}

/// Earnings summary with one line per month, most recent first.
#[must_use]
pub fn format_earnings(summary: &EarningsSummary) -> String {
    let mut out = format!(
        "total {} over {} sessions, growth {}",
        format_amount(summary.total_earnings),
        summary.total_sessions,
        format_growth(summary.growth_rate)
    );
    for bucket in &summary.buckets {
        let _ = write!(
            out,
            "\n{:<15} {:>10} {:>4} sessions, {} avg",
            bucket.label(),
            format_amount(bucket.total),
            bucket.count,
            format_amount(average_per_session(bucket))
        );
    }
    out
}

/// Star-by-star rating bars, highest rating first.
#[must_use]
pub fn format_rating_distribution(distribution: &RatingDistribution) -> String {
    let mut lines = vec![format!(
        "{} reviews, average {:.1}",
        distribution.total(),
        distribution.average()
    )];
    for stars in (MIN_RATING..=MAX_RATING).rev() {
        lines.push(format!(
            "{stars}★ {}",
            format_progress_bar(distribution.percentage(stars), None)
        ));
    }
    lines.join("\n")
}

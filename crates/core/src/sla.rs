//! Ticket SLA due-date arithmetic.
//!
//! A ticket's due date is its creation time plus a fixed number of hours
//! chosen by priority name. Matching is case-insensitive; unknown or missing
//! priorities fall back to [`DEFAULT_SLA_HOURS`].

use chrono::Duration;

use crate::types::Timestamp;

pub const CRITICAL_SLA_HOURS: i64 = 4;
pub const HIGH_SLA_HOURS: i64 = 8;
pub const MEDIUM_SLA_HOURS: i64 = 24;
pub const LOW_SLA_HOURS: i64 = 48;
pub const DEFAULT_SLA_HOURS: i64 = 24;

/// Hours allowed for a ticket of the given priority.
pub fn hours_for_priority(priority_name: Option<&str>) -> i64 {
    let Some(name) = priority_name else {
        return DEFAULT_SLA_HOURS;
    };
    match name.trim().to_ascii_lowercase().as_str() {
        "critical" => CRITICAL_SLA_HOURS,
        "high" => HIGH_SLA_HOURS,
        "medium" => MEDIUM_SLA_HOURS,
        "low" => LOW_SLA_HOURS,
        _ => DEFAULT_SLA_HOURS,
    }
}

/// `created_at` plus the priority's SLA window.
pub fn due_date(created_at: Timestamp, priority_name: Option<&str>) -> Timestamp {
    created_at + Duration::hours(hours_for_priority(priority_name))
}

/// Whether a resolved ticket met its SLA. Tickets without a due date or
/// resolution date are not counted as met.
pub fn met_sla(due: Option<Timestamp>, resolved: Option<Timestamp>) -> bool {
    matches!((due, resolved), (Some(d), Some(r)) if r <= d)
}

//! Knowledge-base article lifecycle: Draft → Approved → Published → Expired.

use crate::error::CoreError;

pub const STATUS_DRAFT: &str = "Draft";
pub const STATUS_APPROVED: &str = "Approved";
pub const STATUS_PUBLISHED: &str = "Published";
pub const STATUS_EXPIRED: &str = "Expired";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_APPROVED, STATUS_PUBLISHED, STATUS_EXPIRED];

/// Entries shown in each leaderboard on the solutions dashboard.
pub const DASHBOARD_TOP_N: i64 = 5;

/// A lifecycle step an admin can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStep {
    Approve,
    Publish,
    Expire,
}

impl SolutionStep {
    pub fn target_status(self) -> &'static str {
        match self {
            SolutionStep::Approve => STATUS_APPROVED,
            SolutionStep::Publish => STATUS_PUBLISHED,
            SolutionStep::Expire => STATUS_EXPIRED,
        }
    }

    fn allowed_from(self) -> &'static [&'static str] {
        match self {
            SolutionStep::Approve => &[STATUS_DRAFT],
            SolutionStep::Publish => &[STATUS_DRAFT, STATUS_APPROVED],
            SolutionStep::Expire => &[STATUS_PUBLISHED],
        }
    }
}

/// Check a lifecycle step and return the status to store.
pub fn apply_step(current: &str, step: SolutionStep) -> Result<&'static str, CoreError> {
    if step.allowed_from().contains(&current) {
        Ok(step.target_status())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move solution from '{current}' to '{}'",
            step.target_status()
        )))
    }
}

/// Validate a status supplied on create/edit.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid solution status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Admins see every article and authors see their own at any stage.
/// Everyone else only sees published ones.
pub fn visible_to(status: &str, is_admin: bool, is_author: bool) -> bool {
    is_admin || is_author || status == STATUS_PUBLISHED
}

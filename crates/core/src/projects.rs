//! Project and task vocabulary, including the Kanban board columns.

use crate::error::CoreError;

pub const TASK_TODO: &str = "To Do";
pub const TASK_IN_PROGRESS: &str = "In Progress";
pub const TASK_REVIEW: &str = "Review";
pub const TASK_DONE: &str = "Done";

/// Kanban columns in board order.
pub const KANBAN_COLUMNS: &[&str] = &[TASK_TODO, TASK_IN_PROGRESS, TASK_REVIEW, TASK_DONE];

/// Task statuses that no longer count as outstanding.
pub const COMPLETED_TASK_STATUSES: &[&str] = &[TASK_DONE, "Completed"];

pub const PROJECT_PLANNING: &str = "Planning";
pub const PROJECT_ACTIVE: &str = "Active";
pub const PROJECT_IN_PROGRESS: &str = "In Progress";
pub const PROJECT_COMPLETED: &str = "Completed";

/// Project statuses counted as active on the dashboard.
pub const ACTIVE_PROJECT_STATUSES: &[&str] = &[PROJECT_ACTIVE, PROJECT_IN_PROGRESS];

pub const DEFAULT_PRIORITY: &str = "Medium";

pub const ACTIVITY_CREATED: &str = "Created Project";
pub const ACTIVITY_UPDATED: &str = "Updated Project";
pub const ACTIVITY_TASK_CREATED: &str = "Created Task";
pub const ACTIVITY_TASK_MOVED: &str = "Moved Task";

/// Validate a Kanban move target.
pub fn validate_task_status(status: &str) -> Result<(), CoreError> {
    if KANBAN_COLUMNS.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid task status '{status}'. Must be one of: {}",
            KANBAN_COLUMNS.join(", ")
        )))
    }
}

pub fn is_task_complete(status: &str) -> bool {
    COMPLETED_TASK_STATUSES.contains(&status)
}

/// Percentage of tasks done, rounded down. An empty project is 0%.
pub fn completion_percent(total: i64, done: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (done.clamp(0, total) * 100) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kanban_columns_are_valid_targets() {
        for column in KANBAN_COLUMNS {
            assert!(validate_task_status(column).is_ok());
        }
        assert!(validate_task_status("Blocked").is_err());
    }

    #[test]
    fn test_completion_percent() {
        assert_eq!(completion_percent(0, 0), 0);
        assert_eq!(completion_percent(3, 1), 33);
        assert_eq!(completion_percent(4, 4), 100);
    }

    #[test]
    fn test_task_completion() {
        assert!(is_task_complete("Done"));
        assert!(is_task_complete("Completed"));
        assert!(!is_task_complete("Review"));
    }
}

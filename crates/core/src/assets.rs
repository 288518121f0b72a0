//! Asset lifecycle vocabulary.

use crate::error::CoreError;

pub const STATUS_AVAILABLE: &str = "Available";
pub const STATUS_IN_USE: &str = "In Use";
pub const STATUS_UNDER_MAINTENANCE: &str = "Under Maintenance";
pub const STATUS_RETIRED: &str = "Retired";
pub const STATUS_DISPOSED: &str = "Disposed";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_AVAILABLE,
    STATUS_IN_USE,
    STATUS_UNDER_MAINTENANCE,
    STATUS_RETIRED,
    STATUS_DISPOSED,
];

pub const HISTORY_REGISTRATION: &str = "Registration";
pub const HISTORY_ASSIGNMENT: &str = "Assignment";
pub const HISTORY_MAINTENANCE: &str = "Maintenance";
pub const HISTORY_UPDATE: &str = "Update";

/// Page size for the asset list.
pub const PAGE_SIZE: i64 = 20;

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid asset status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Retired and disposed assets cannot be handed out.
pub fn check_assignable(status: &str) -> Result<(), CoreError> {
    match status {
        STATUS_RETIRED | STATUS_DISPOSED => Err(CoreError::Conflict(format!(
            "Asset with status '{status}' cannot be assigned"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_status() {
        assert!(validate_status("In Use").is_ok());
        assert!(validate_status("in use").is_err());
    }

    #[test]
    fn test_retired_assets_are_not_assignable() {
        assert!(check_assignable(STATUS_AVAILABLE).is_ok());
        assert!(check_assignable(STATUS_IN_USE).is_ok());
        assert!(check_assignable(STATUS_RETIRED).is_err());
        assert!(check_assignable(STATUS_DISPOSED).is_err());
    }
}

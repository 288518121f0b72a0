//! Contract approval workflow and term arithmetic.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Date;

pub const STATUS_DRAFT: &str = "Draft";
pub const STATUS_PENDING_APPROVAL: &str = "Pending Approval";
pub const STATUS_APPROVED: &str = "Approved";
pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_EXPIRING_SOON: &str = "Expiring Soon";
pub const STATUS_EXPIRED: &str = "Expired";
pub const STATUS_TERMINATED: &str = "Terminated";

pub const DEFAULT_CURRENCY: &str = "USD";

/// Contracts ending within this many days are flagged on the dashboard.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

pub const DECISION_APPROVED: &str = "Approved";
pub const DECISION_REJECTED: &str = "Rejected";

pub const PAYMENT_PENDING: &str = "Pending";
pub const PAYMENT_PAID: &str = "Paid";
pub const PAYMENT_OVERDUE: &str = "Overdue";

pub const VALID_PAYMENT_STATUSES: &[&str] = &[PAYMENT_PENDING, PAYMENT_PAID, PAYMENT_OVERDUE];

/// History actions written alongside every contract mutation.
pub const HISTORY_CREATED: &str = "Created";
pub const HISTORY_UPDATED: &str = "Updated";
pub const HISTORY_SUBMITTED: &str = "Submitted";
pub const HISTORY_APPROVED: &str = "Approved";
pub const HISTORY_REJECTED: &str = "Rejected";
pub const HISTORY_PAYMENT: &str = "Payment Recorded";
pub const HISTORY_ATTACHMENT: &str = "Attachment Added";

/// Submitting for approval is only possible from Draft.
pub fn submit(current: &str) -> Result<&'static str, CoreError> {
    if current == STATUS_DRAFT {
        Ok(STATUS_PENDING_APPROVAL)
    } else {
        Err(CoreError::Conflict(format!(
            "Only draft contracts can be submitted (current status: '{current}')"
        )))
    }
}

/// Approval activates a pending (or still-draft) contract.
pub fn approve(current: &str) -> Result<&'static str, CoreError> {
    match current {
        STATUS_PENDING_APPROVAL | STATUS_DRAFT => Ok(STATUS_ACTIVE),
        _ => Err(CoreError::Conflict(format!(
            "Contract in status '{current}' cannot be approved"
        ))),
    }
}

/// Rejection sends a pending contract back to Draft.
pub fn reject(current: &str) -> Result<&'static str, CoreError> {
    match current {
        STATUS_PENDING_APPROVAL | STATUS_DRAFT => Ok(STATUS_DRAFT),
        _ => Err(CoreError::Conflict(format!(
            "Contract in status '{current}' cannot be rejected"
        ))),
    }
}

/// Whether a contract ends inside the expiry window (or already has).
pub fn is_expiring_soon(end_date: Date, today: Date) -> bool {
    end_date <= today + Duration::days(EXPIRY_WINDOW_DAYS)
}

/// Start must not come after end.
pub fn validate_term(start: Date, end: Date) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::Validation(
            "Contract start date must be on or before the end date".into(),
        ));
    }
    Ok(())
}

pub fn validate_payment_status(status: &str) -> Result<(), CoreError> {
    if VALID_PAYMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid payment status '{status}'. Must be one of: {}",
            VALID_PAYMENT_STATUSES.join(", ")
        )))
    }
}

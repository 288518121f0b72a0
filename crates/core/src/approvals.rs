//! Generic approval requests and their side effects.

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_APPROVED: &str = "Approved";
pub const STATUS_REJECTED: &str = "Rejected";
pub const STATUS_CANCELLED: &str = "Cancelled";

/// Decisions an approver may record.
pub const VALID_DECISIONS: &[&str] = &[STATUS_APPROVED, STATUS_REJECTED, STATUS_CANCELLED];

/// Request type whose approval closes the related ticket.
pub const TYPE_TICKET_RESOLUTION: &str = "Ticket_Resolution";

/// Validate an approver's decision against the current status.
pub fn decide(current: &str, decision: &str) -> Result<(), CoreError> {
    if !VALID_DECISIONS.contains(&decision) {
        return Err(CoreError::Validation(format!(
            "Invalid decision '{decision}'. Must be one of: {}",
            VALID_DECISIONS.join(", ")
        )));
    }
    if current != STATUS_PENDING {
        return Err(CoreError::Conflict(format!(
            "Approval already decided (status: '{current}')"
        )));
    }
    Ok(())
}

/// Whether approving this request should close the ticket it points at.
pub fn closes_ticket(request_type: &str, decision: &str) -> bool {
    request_type == TYPE_TICKET_RESOLUTION && decision == STATUS_APPROVED
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pending_accepts_decisions() {
        for d in VALID_DECISIONS {
            assert!(decide(STATUS_PENDING, d).is_ok());
        }
    }

    #[test]
    fn test_decided_request_is_conflict() {
        assert_matches!(decide(STATUS_APPROVED, STATUS_REJECTED), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn test_unknown_decision_is_validation_error() {
        assert_matches!(decide(STATUS_PENDING, "Maybe"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_ticket_resolution_approval_closes_ticket() {
        assert!(closes_ticket(TYPE_TICKET_RESOLUTION, STATUS_APPROVED));
        assert!(!closes_ticket(TYPE_TICKET_RESOLUTION, STATUS_REJECTED));
        assert!(!closes_ticket("Purchase", STATUS_APPROVED));
    }
}

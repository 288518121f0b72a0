//! Well-known role name constants.
//!
//! These must match the rows seeded by `20261001000001_create_roles_and_users.sql`.
//! Role names are stored verbatim in `users.role` and `role_permissions.role_name`.

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_AGENT: &str = "Agent";
pub const ROLE_TECHNICAL: &str = "Technical";
pub const ROLE_MEMBER: &str = "Member";
pub const ROLE_USER: &str = "User";

/// Role assigned to self-registered and invited accounts.
pub const DEFAULT_USER_ROLE: &str = ROLE_USER;

/// Built-in roles with their descriptions, in display order.
pub const DEFAULT_ROLES: &[(&str, &str)] = &[
    (ROLE_ADMIN, "System Administrator with full access"),
    (ROLE_AGENT, "Support Agent who manages tickets"),
    (ROLE_TECHNICAL, "Technical staff for specialized tasks"),
    (ROLE_MEMBER, "Project Team Member"),
    (ROLE_USER, "End User who creates tickets"),
];

pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Roles allowed into the ticket manager workspace.
pub fn is_staff(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_AGENT | ROLE_TECHNICAL)
}

/// Roles that see every approval request rather than only their own.
pub fn sees_all_approvals(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_AGENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert!(is_staff(ROLE_ADMIN));
        assert!(is_staff(ROLE_AGENT));
        assert!(is_staff(ROLE_TECHNICAL));
        assert!(!is_staff(ROLE_MEMBER));
        assert!(!is_staff(ROLE_USER));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        assert!(!is_admin("admin"));
        assert!(is_admin("Admin"));
    }

    #[test]
    fn test_approval_visibility() {
        assert!(sees_all_approvals(ROLE_AGENT));
        assert!(!sees_all_approvals(ROLE_TECHNICAL));
    }

    #[test]
    fn test_default_roles_cover_all_constants() {
        let names: Vec<&str> = DEFAULT_ROLES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![ROLE_ADMIN, ROLE_AGENT, ROLE_TECHNICAL, ROLE_MEMBER, ROLE_USER]
        );
    }
}

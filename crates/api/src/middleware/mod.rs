//! Authentication and authorization middleware.
//!
//! - [`permission::enforce`] -- Per-request filter: authenticates the caller
//!   and checks the role's grant for the feature guarding the route.
//! - [`auth::AuthUser`] -- Extracts the authenticated user.
//! - [`rbac::RequireAdmin`] -- Requires the Admin role.
//! - [`rbac::RequireStaff`] -- Requires Admin, Agent or Technical.

pub mod auth;
pub mod permission;
pub mod rbac;

//! Domain rules for ServiceCore.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates call into these modules for status lifecycles, the permission
//! catalog, SLA arithmetic and notification fan-out decisions.

pub mod approvals;
pub mod assets;
pub mod contracts;
pub mod csv;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod pagination;
pub mod permissions;
pub mod projects;
pub mod roles;
pub mod sla;
pub mod solutions;
pub mod tickets;
pub mod types;
pub mod uploads;

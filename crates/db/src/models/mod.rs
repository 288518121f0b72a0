//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod approval;
pub mod asset;
pub mod attachment;
pub mod contract;
pub mod dashboard;
pub mod notification;
pub mod project;
pub mod role;
pub mod setting;
pub mod solution;
pub mod ticket;
pub mod user;

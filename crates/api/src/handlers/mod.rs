//! Request handlers, one module per route area.
//!
//! Handlers delegate to the repositories in `servicecore_db` and the rules
//! in `servicecore_core`, mapping errors via [`AppError`](crate::error::AppError).

pub mod account;
pub mod admin;
pub mod approvals;
pub mod assets;
pub mod contracts;
pub mod home;
pub mod kanban;
pub mod notifications;
pub mod projects;
pub mod reports;
pub mod settings;
pub mod solutions;
pub mod tasks;
pub mod tickets;
pub mod tickets_manager;
pub mod users;
pub mod users_manager;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod approval_repo;
pub mod asset_repo;
pub mod attachment_repo;
pub mod contract_repo;
pub mod dashboard_repo;
pub mod lookup_repo;
pub mod notification_repo;
pub mod permission_repo;
pub mod project_repo;
pub mod role_repo;
pub mod setting_repo;
pub mod solution_repo;
pub mod task_repo;
pub mod ticket_repo;
pub mod user_repo;
pub mod vendor_repo;

pub use approval_repo::ApprovalRepo;
pub use asset_repo::AssetRepo;
pub use attachment_repo::AttachmentRepo;
pub use contract_repo::ContractRepo;
pub use dashboard_repo::DashboardRepo;
pub use lookup_repo::LookupRepo;
pub use notification_repo::NotificationRepo;
pub use permission_repo::PermissionRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::{DepartmentRepo, RoleRepo};
pub use setting_repo::SettingRepo;
pub use solution_repo::{SolutionRepo, TopicRepo};
pub use task_repo::TaskRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
pub use vendor_repo::{ContractTypeRepo, VendorRepo};

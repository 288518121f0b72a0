//! Feature-key catalog and the route → feature mapping used by the
//! permission filter.
//!
//! Every protected capability has a stable string key (for example
//! `Tickets_Edit`) stored in `role_permissions.feature_key`. A request is
//! resolved in three steps:
//!
//! 1. [`RouteAction::from_route`] turns the HTTP method and matched route
//!    template into a controller area plus an action name.
//! 2. [`feature_for`] maps that pair to a [`Feature`] (or `None` for routes
//!    that only need a signed-in user).
//! 3. [`is_allowed`] combines the caller's role with the stored allow flag.
//!    Admin always passes; a missing row denies.

use serde::Serialize;

use crate::roles::{is_admin, ROLE_AGENT, ROLE_MEMBER, ROLE_TECHNICAL, ROLE_USER};

// ---------------------------------------------------------------------------
// Feature catalog
// ---------------------------------------------------------------------------

/// A protected capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    Dashboard,
    TicketsView,
    TicketsCreate,
    TicketsEdit,
    TicketsDelete,
    TicketsManage,
    TicketsManager,
    ProjectsView,
    ProjectsManage,
    TasksView,
    TasksManage,
    KanbanBoard,
    UsersView,
    UsersManage,
    ReportsView,
    AdminMetadata,
    AdminSettings,
    AdminPermissions,
    AssetsView,
    AssetsManage,
    ApprovalsView,
    ApprovalsManage,
    SolutionsView,
    SolutionsCreate,
    SolutionsManage,
    SolutionsTopics,
    ContractsView,
    ContractsCreate,
    ContractsManage,
    ContractsApprovals,
    VendorsManage,
}

impl Feature {
    /// Every feature, in the order the permission editor lists them.
    pub const ALL: &'static [Feature] = &[
        Feature::Dashboard,
        Feature::TicketsView,
        Feature::TicketsCreate,
        Feature::TicketsEdit,
        Feature::TicketsDelete,
        Feature::TicketsManage,
        Feature::TicketsManager,
        Feature::ProjectsView,
        Feature::ProjectsManage,
        Feature::TasksView,
        Feature::TasksManage,
        Feature::KanbanBoard,
        Feature::UsersView,
        Feature::UsersManage,
        Feature::ReportsView,
        Feature::AdminMetadata,
        Feature::AdminSettings,
        Feature::AdminPermissions,
        Feature::AssetsView,
        Feature::AssetsManage,
        Feature::ApprovalsView,
        Feature::ApprovalsManage,
        Feature::SolutionsView,
        Feature::SolutionsCreate,
        Feature::SolutionsManage,
        Feature::SolutionsTopics,
        Feature::ContractsView,
        Feature::ContractsCreate,
        Feature::ContractsManage,
        Feature::ContractsApprovals,
        Feature::VendorsManage,
    ];

    /// The key persisted in `role_permissions.feature_key`.
    pub const fn key(self) -> &'static str {
        match self {
            Feature::Dashboard => "Dashboard",
            Feature::TicketsView => "Tickets_View",
            Feature::TicketsCreate => "Tickets_Create",
            Feature::TicketsEdit => "Tickets_Edit",
            Feature::TicketsDelete => "Tickets_Delete",
            Feature::TicketsManage => "Tickets_Manage",
            Feature::TicketsManager => "Tickets_Manager",
            Feature::ProjectsView => "Projects_View",
            Feature::ProjectsManage => "Projects_Manage",
            Feature::TasksView => "Tasks_View",
            Feature::TasksManage => "Tasks_Manage",
            Feature::KanbanBoard => "Kanban_Board",
            Feature::UsersView => "Users_View",
            Feature::UsersManage => "Users_Manage",
            Feature::ReportsView => "Reports_View",
            Feature::AdminMetadata => "Admin_Metadata",
            Feature::AdminSettings => "Admin_Settings",
            Feature::AdminPermissions => "Admin_Permissions",
            Feature::AssetsView => "Assets_View",
            Feature::AssetsManage => "Assets_Manage",
            Feature::ApprovalsView => "Approvals_View",
            Feature::ApprovalsManage => "Approvals_Manage",
            Feature::SolutionsView => "Solutions_View",
            Feature::SolutionsCreate => "Solutions_Create",
            Feature::SolutionsManage => "Solutions_Manage",
            Feature::SolutionsTopics => "Solutions_Topics",
            Feature::ContractsView => "Contracts_View",
            Feature::ContractsCreate => "Contracts_Create",
            Feature::ContractsManage => "Contracts_Manage",
            Feature::ContractsApprovals => "Contracts_Approvals",
            Feature::VendorsManage => "Vendors_Manage",
        }
    }

    /// Parse a stored feature key. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Controller areas
// ---------------------------------------------------------------------------

/// A top-level route area, identified by the first path segment under
/// `/api/v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Home,
    Tickets,
    TicketsManager,
    Projects,
    Tasks,
    Kanban,
    Users,
    UsersManager,
    Reports,
    Assets,
    Approvals,
    Admin,
    Solutions,
    Contracts,
    Settings,
    Notifications,
    Account,
}

impl Controller {
    /// Map a URL segment (`tickets-manager`) to its area.
    pub fn from_segment(segment: &str) -> Option<Controller> {
        let controller = match segment {
            "home" => Controller::Home,
            "tickets" => Controller::Tickets,
            "tickets-manager" => Controller::TicketsManager,
            "projects" => Controller::Projects,
            "tasks" => Controller::Tasks,
            "kanban" => Controller::Kanban,
            "users" => Controller::Users,
            "users-manager" => Controller::UsersManager,
            "reports" => Controller::Reports,
            "assets" => Controller::Assets,
            "approvals" => Controller::Approvals,
            "admin" => Controller::Admin,
            "solutions" => Controller::Solutions,
            "contracts" => Controller::Contracts,
            "settings" => Controller::Settings,
            "notifications" => Controller::Notifications,
            "account" => Controller::Account,
            _ => return None,
        };
        Some(controller)
    }
}

// ---------------------------------------------------------------------------
// Route → action derivation
// ---------------------------------------------------------------------------

/// API prefix stripped from matched paths before parsing.
const API_PREFIX: &str = "/api/v1";

/// The controller area and action a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAction {
    pub controller: Controller,
    pub action: String,
    /// `true` for GET/HEAD requests.
    pub read_only: bool,
}

impl RouteAction {
    /// Derive the target from an HTTP method and a matched route template
    /// such as `/api/v1/tickets/{id}/comments`.
    ///
    /// The action is the first literal segment after the controller. When
    /// there is none, it falls back to the REST verb: `index` / `create` on
    /// the collection and `details` / `edit` / `delete` on an item.
    pub fn from_route(method: &str, matched_path: &str) -> Option<RouteAction> {
        let path = matched_path.strip_prefix(API_PREFIX).unwrap_or(matched_path);
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        let controller = Controller::from_segment(segments.next()?)?;
        let rest: Vec<&str> = segments.collect();
        let read_only = matches!(method, "GET" | "HEAD");

        let literal = rest.iter().copied().find(|s| !is_path_param(s));
        let action = match literal {
            Some(name) => name,
            None if rest.is_empty() && read_only => "index",
            None if rest.is_empty() => "create",
            None if read_only => "details",
            None if method == "DELETE" => "delete",
            None => "edit",
        };

        Some(RouteAction {
            controller,
            action: action.to_string(),
            read_only,
        })
    }
}

fn is_path_param(segment: &str) -> bool {
    segment.starts_with('{') || segment.starts_with(':')
}

// ---------------------------------------------------------------------------
// Route → feature
// ---------------------------------------------------------------------------

/// Map a route target to the feature guarding it.
///
/// `None` means the route only requires a signed-in user.
pub fn feature_for(target: &RouteAction) -> Option<Feature> {
    let action = target.action.as_str();
    let read = target.read_only;

    let feature = match target.controller {
        Controller::Home => Feature::Dashboard,
        Controller::Tickets => match action {
            _ if read => Feature::TicketsView,
            "create" | "comments" | "attachments" => Feature::TicketsCreate,
            "edit" => Feature::TicketsEdit,
            "delete" => Feature::TicketsDelete,
            _ => Feature::TicketsManage,
        },
        Controller::TicketsManager => Feature::TicketsManager,
        Controller::Projects => {
            if read {
                Feature::ProjectsView
            } else {
                Feature::ProjectsManage
            }
        }
        Controller::Tasks => match action {
            _ if read => Feature::TasksView,
            "comments" => Feature::TasksView,
            _ => Feature::TasksManage,
        },
        Controller::Kanban => Feature::KanbanBoard,
        Controller::Users => {
            if read {
                Feature::UsersView
            } else {
                Feature::UsersManage
            }
        }
        Controller::UsersManager => Feature::UsersManage,
        Controller::Reports => Feature::ReportsView,
        Controller::Assets => {
            if read {
                Feature::AssetsView
            } else {
                Feature::AssetsManage
            }
        }
        Controller::Approvals => match action {
            "action" => Feature::ApprovalsManage,
            _ => Feature::ApprovalsView,
        },
        Controller::Admin => match action {
            "permissions" => Feature::AdminPermissions,
            "settings" => Feature::AdminSettings,
            "topics" => Feature::SolutionsTopics,
            _ => Feature::AdminMetadata,
        },
        Controller::Solutions => match action {
            _ if read => Feature::SolutionsView,
            "create" | "attachments" => Feature::SolutionsCreate,
            _ => Feature::SolutionsManage,
        },
        Controller::Contracts => match action {
            _ if read => Feature::ContractsView,
            "create" | "submit" => Feature::ContractsCreate,
            "approve" | "reject" => Feature::ContractsApprovals,
            "vendors" => Feature::VendorsManage,
            _ => Feature::ContractsManage,
        },
        Controller::Settings => Feature::AdminSettings,
        Controller::Notifications | Controller::Account => return None,
    };
    Some(feature)
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Combine a role with the stored allow flag for the requested feature.
///
/// Admin is always allowed. Any other role needs an explicit `true` row.
pub fn is_allowed(role: &str, stored: Option<bool>) -> bool {
    is_admin(role) || stored.unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Default grants
// ---------------------------------------------------------------------------

const AGENT_GRANTS: &[Feature] = &[
    Feature::Dashboard,
    Feature::TicketsView,
    Feature::TicketsCreate,
    Feature::TicketsEdit,
    Feature::TicketsManage,
    Feature::TicketsManager,
    Feature::AssetsView,
    Feature::AssetsManage,
    Feature::UsersView,
    Feature::SolutionsView,
    Feature::SolutionsCreate,
    Feature::SolutionsManage,
    Feature::ContractsView,
    Feature::ApprovalsView,
    Feature::ApprovalsManage,
];

const TECHNICAL_GRANTS: &[Feature] = &[
    Feature::Dashboard,
    Feature::TicketsView,
    Feature::TicketsManage,
    Feature::TicketsManager,
    Feature::AssetsView,
    Feature::ProjectsView,
    Feature::TasksView,
    Feature::KanbanBoard,
    Feature::SolutionsView,
];

const MEMBER_GRANTS: &[Feature] = &[
    Feature::Dashboard,
    Feature::TicketsView,
    Feature::TicketsCreate,
    Feature::ProjectsView,
    Feature::TasksView,
    Feature::KanbanBoard,
    Feature::SolutionsView,
    Feature::ApprovalsView,
];

const USER_GRANTS: &[Feature] = &[
    Feature::Dashboard,
    Feature::TicketsView,
    Feature::TicketsCreate,
    Feature::SolutionsView,
    Feature::ApprovalsView,
];

/// Features granted to a role on first seed. Admin gets the whole catalog.
/// Unknown roles get nothing.
pub fn default_grants(role: &str) -> &'static [Feature] {
    match role {
        _ if is_admin(role) => Feature::ALL,
        ROLE_AGENT => AGENT_GRANTS,
        ROLE_TECHNICAL => TECHNICAL_GRANTS,
        ROLE_MEMBER => MEMBER_GRANTS,
        ROLE_USER => USER_GRANTS,
        _ => &[],
    }
}

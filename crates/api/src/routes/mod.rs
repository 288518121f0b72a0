pub mod account;
pub mod admin;
pub mod assets;
pub mod contracts;
pub mod health;
pub mod home;
pub mod notifications;
pub mod projects;
pub mod solutions;
pub mod tickets;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the protected `/api/v1` route tree. Every route here runs behind
/// the permission filter.
///
/// Route hierarchy:
///
/// ```text
/// /account/me                                   current user + feature map
/// /account/register                             create user (admin only)
///
/// /home                                         dashboard
/// /reports                                      project completion report
///
/// /tickets                                      list, create
/// /tickets/lookups                              statuses, priorities, categories, users
/// /tickets/{id}                                 get, update, delete
/// /tickets/{id}/comments                        add comment (POST)
/// /tickets/{id}/attachments                     upload (POST, multipart)
///
/// /tickets-manager                              list (?filter=my), create
/// /tickets-manager/{id}                         get, update, delete
/// /tickets-manager/{id}/resolve                 resolve (POST)
/// /tickets-manager/{id}/reassign                reassign (POST)
/// /tickets-manager/{id}/reminder                remind assignee (POST)
/// /tickets-manager/{id}/comments                add comment (POST)
///
/// /projects                                     list, create
/// /projects/{id}                                get, update, delete
/// /projects/{id}/milestones                     list, create
/// /tasks                                        list (?project_id), create
/// /tasks/{id}                                   get, update, delete
/// /tasks/{id}/comments                          add comment (POST)
/// /tasks/{id}/attachments                       upload (POST, multipart)
/// /kanban                                       board (?project_id)
/// /kanban/{task_id}/move                        move task (POST)
///
/// /assets                                       list, create
/// /assets/categories                            asset categories
/// /assets/{id}                                  get, update, delete
/// /assets/{id}/assign                           assign (POST)
/// /assets/{id}/maintenance                      log maintenance (POST)
///
/// /contracts                                    dashboard, create
/// /contracts/reports                            totals by status / vendor
/// /contracts/vendors                            list, upsert
/// /contracts/types                              list, upsert (admin only)
/// /contracts/{id}                               get, update
/// /contracts/{id}/submit|approve|reject         workflow (POST)
/// /contracts/{id}/payments                      record payment (POST)
/// /contracts/{id}/attachments                   upload (POST, multipart)
///
/// /solutions                                    list, create
/// /solutions/dashboard                          knowledge-base stats (admin only)
/// /solutions/{id}                               get, update, delete
/// /solutions/{id}/attachments                   upload (POST, multipart)
/// /solutions/{id}/approve|publish|expire        lifecycle (POST, admin only)
/// /approvals                                    list, request
/// /approvals/{id}/action                        decide (POST)
///
/// /users                                        directory
/// /users/invite                                 invite with temporary password
/// /users-manager                                list, create
/// /users-manager/export                         CSV download
/// /users-manager/{id}                           update, delete
/// /users-manager/{id}/password                  reset password (POST)
///
/// /admin                                        metadata overview (admin only)
/// /admin/categories[/{id}]                      upsert, delete
/// /admin/priorities                             upsert
/// /admin/departments                            upsert
/// /admin/roles[/{id}]                           list, create, update
/// /admin/permissions[/{role}]                   read (?role), bulk save
/// /admin/topics[/{id}]                          list, upsert, delete
/// /settings                                     list, upsert
///
/// /notifications                                list
/// /notifications/unread                         count + newest unread
/// /notifications/read-all                       mark all read (POST)
/// /notifications/{id}/read                      mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/account", account::router())
        .nest("/home", home::router())
        .nest("/reports", home::reports_router())
        .nest("/tickets", tickets::router())
        .nest("/tickets-manager", tickets::manager_router())
        .nest("/projects", projects::router())
        .nest("/tasks", projects::tasks_router())
        .nest("/kanban", projects::kanban_router())
        .nest("/assets", assets::router())
        .nest("/contracts", contracts::router())
        .nest("/solutions", solutions::router())
        .nest("/approvals", solutions::approvals_router())
        .nest("/users", users::router())
        .nest("/users-manager", users::manager_router())
        .nest("/admin", admin::router())
        .nest("/settings", admin::settings_router())
        .nest("/notifications", notifications::router())
}

/// Routes reachable without a session (login, logout).
///
/// ```text
/// /account/login                                start session (POST)
/// /account/logout                               clear session (POST)
/// ```
pub fn public_routes() -> Router<AppState> {
    account::public_router()
}

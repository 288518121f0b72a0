//! Handlers for `/admin`: ticket metadata, roles, departments, the
//! permission matrix and knowledge-base topics. Admin role only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use servicecore_core::error::CoreError;
use servicecore_core::permissions::Feature;
use servicecore_core::roles::is_admin;
use servicecore_core::tickets::{flatten_categories, CategoryNode, FlatCategory};
use servicecore_core::types::DbId;
use servicecore_db::models::role::{
    CreateRole, Department, Role, RolePermission, UpdateRole, UpsertDepartment,
};
use servicecore_db::models::solution::{SolutionTopic, UpsertTopic};
use servicecore_db::models::ticket::{
    TicketCategory, TicketPriority, TicketStatus, UpsertCategory, UpsertPriority,
};
use servicecore_db::repositories::{
    DepartmentRepo, LookupRepo, PermissionRepo, RoleRepo, TopicRepo,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub statuses: Vec<TicketStatus>,
    pub priorities: Vec<TicketPriority>,
    pub categories: Vec<FlatCategory>,
    pub roles: Vec<Role>,
    pub departments: Vec<Department>,
}

/// Query parameters for `GET /admin/permissions`.
#[derive(Debug, Deserialize)]
pub struct PermissionQuery {
    pub role: String,
}

async fn ensure_role(state: &AppState, role: &str) -> AppResult<()> {
    if RoleRepo::exists(&state.pool, role).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role '{role}'"
        ))))
    }
}

/// GET /api/v1/admin
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminOverview>>> {
    let statuses = LookupRepo::statuses(&state.pool).await?;
    let priorities = LookupRepo::priorities(&state.pool).await?;
    let nodes: Vec<CategoryNode> = LookupRepo::categories(&state.pool)
        .await?
        .into_iter()
        .map(|c| CategoryNode {
            id: c.id,
            name: c.name,
            parent_id: c.parent_id,
        })
        .collect();
    let roles = RoleRepo::list(&state.pool).await?;
    let departments = DepartmentRepo::list(&state.pool).await?;

    Ok(Json(DataResponse::new(AdminOverview {
        statuses,
        priorities,
        categories: flatten_categories(&nodes),
        roles,
        departments,
    })))
}

// ---------------------------------------------------------------------------
// Ticket metadata
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/categories
pub async fn upsert_category(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertCategory>,
) -> AppResult<Json<TicketCategory>> {
    input.validate()?;
    if input.id.is_some() && input.id == input.parent_id {
        return Err(AppError::Core(CoreError::Validation(
            "A category cannot be its own parent".into(),
        )));
    }
    let category = LookupRepo::upsert_category(&state.pool, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Category", input.id.unwrap_or_default()))?;
    tracing::info!(category_id = category.id, user_id = auth.user_id, "Category saved");
    Ok(Json(category))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// A category with sub-categories or tickets is kept (409).
pub async fn delete_category(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if LookupRepo::category_in_use(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Category has sub-categories or tickets and cannot be deleted".into(),
        )));
    }
    if !LookupRepo::delete_category(&state.pool, id).await? {
        return Err(AppError::not_found("Category", id));
    }
    tracing::info!(category_id = id, user_id = auth.user_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/priorities
pub async fn upsert_priority(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertPriority>,
) -> AppResult<Json<TicketPriority>> {
    input.validate()?;
    let priority = LookupRepo::upsert_priority(&state.pool, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Priority", input.id.unwrap_or_default()))?;
    tracing::info!(priority_id = priority.id, user_id = auth.user_id, "Priority saved");
    Ok(Json(priority))
}

/// POST /api/v1/admin/departments
pub async fn upsert_department(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertDepartment>,
) -> AppResult<Json<Department>> {
    input.validate()?;
    let department = DepartmentRepo::upsert(&state.pool, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Department", input.id.unwrap_or_default()))?;
    tracing::info!(department_id = department.id, user_id = auth.user_id, "Department saved");
    Ok(Json(department))
}

// ---------------------------------------------------------------------------
// Roles and permissions
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/roles
pub async fn roles(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Role>>>> {
    Ok(Json(DataResponse::new(RoleRepo::list(&state.pool).await?)))
}

/// POST /api/v1/admin/roles
pub async fn create_role(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateRole>,
) -> AppResult<(StatusCode, Json<Role>)> {
    input.validate()?;
    let role = RoleRepo::create(&state.pool, &input).await?;
    tracing::info!(role = %role.name, user_id = auth.user_id, "Role created");
    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/v1/admin/roles/{id}
pub async fn update_role(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<Json<Role>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Role name cannot be empty".into(),
        )));
    }
    let role = RoleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Role", id))?;
    tracing::info!(role_id = id, user_id = auth.user_id, "Role updated");
    Ok(Json(role))
}

/// GET /api/v1/admin/permissions?role=
///
/// Features without a stored row are filled in first: allowed for Admin,
/// denied for everyone else.
pub async fn permissions(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PermissionQuery>,
) -> AppResult<Json<DataResponse<Vec<RolePermission>>>> {
    ensure_role(&state, &params.role).await?;

    let allowed = is_admin(&params.role);
    let mut added = 0usize;
    for feature in Feature::ALL {
        if PermissionRepo::insert_if_missing(&state.pool, &params.role, feature.key(), allowed).await? {
            added += 1;
        }
    }
    if added > 0 {
        tracing::debug!(role = %params.role, added, "Filled missing permission rows");
    }

    Ok(Json(DataResponse::new(
        PermissionRepo::list_for_role(&state.pool, &params.role).await?,
    )))
}

/// PUT /api/v1/admin/permissions/{role}
///
/// Body: `{"Tickets_Edit": true, ...}`. Unknown feature keys are rejected
/// before anything is written.
pub async fn save_permissions(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(grants): Json<std::collections::BTreeMap<String, bool>>,
) -> AppResult<Json<DataResponse<Vec<RolePermission>>>> {
    ensure_role(&state, &role).await?;

    let unknown: Vec<&str> = grants
        .keys()
        .map(String::as_str)
        .filter(|k| Feature::from_key(k).is_none())
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Unknown feature keys: {}",
            unknown.join(", ")
        )));
    }

    let pairs: Vec<(&str, bool)> = grants.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    PermissionRepo::upsert_many(&state.pool, &role, &pairs).await?;

    tracing::info!(role = %role, changed = pairs.len(), user_id = auth.user_id, "Permissions saved");
    Ok(Json(DataResponse::new(
        PermissionRepo::list_for_role(&state.pool, &role).await?,
    )))
}

// ---------------------------------------------------------------------------
// Solution topics
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/topics
pub async fn topics(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SolutionTopic>>>> {
    Ok(Json(DataResponse::new(TopicRepo::list(&state.pool).await?)))
}

/// POST /api/v1/admin/topics
pub async fn upsert_topic(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertTopic>,
) -> AppResult<Json<SolutionTopic>> {
    input.validate()?;
    let topic = TopicRepo::upsert(&state.pool, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Topic", input.id.unwrap_or_default()))?;
    tracing::info!(topic_id = topic.id, user_id = auth.user_id, "Topic saved");
    Ok(Json(topic))
}

/// DELETE /api/v1/admin/topics/{id}
///
/// A topic that still has solutions is kept (409).
pub async fn delete_topic(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TopicRepo::in_use(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Topic has solutions and cannot be deleted".into(),
        )));
    }
    if !TopicRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Topic", id));
    }
    tracing::info!(topic_id = id, user_id = auth.user_id, "Topic deleted");
    Ok(StatusCode::NO_CONTENT)
}

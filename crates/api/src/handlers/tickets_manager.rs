//! Handlers for the `/tickets-manager` workspace (Admin, Agent, Technical).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use servicecore_core::error::CoreError;
use servicecore_core::pagination::{Page, PageRequest};
use servicecore_core::tickets::{resolve_status, FILTER_MINE};
use servicecore_core::types::DbId;
use servicecore_db::models::ticket::{
    CreateComment, CreateTicket, Ticket, TicketComment, TicketFilter, TicketOrder, UpdateTicket,
};
use servicecore_db::repositories::{LookupRepo, TicketRepo, UserRepo};

use super::tickets::{
    comment_on, edit_ticket, find_ticket, open_ticket, ticket_detail, TicketDetail,
};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notifications;
use crate::state::AppState;

/// Query parameters for `GET /tickets-manager`.
#[derive(Debug, Default, Deserialize)]
pub struct ManagerListQuery {
    pub search: Option<String>,
    pub status_id: Option<DbId>,
    pub priority_id: Option<DbId>,
    /// `my` restricts to tickets the caller requested or is assigned.
    pub filter: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Request body for `POST /tickets-manager/{id}/reassign`.
///
/// `0` or `null` clears the assignee.
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub assigned_to_id: Option<DbId>,
}

/// GET /api/v1/tickets-manager
pub async fn list(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<ManagerListQuery>,
) -> AppResult<Json<Page<Ticket>>> {
    let page = PageRequest::new(params.page, params.page_size);
    let mine = params.filter.as_deref() == Some(FILTER_MINE);
    let filter = TicketFilter {
        search: params.search,
        status_id: params.status_id,
        priority_id: params.priority_id,
        involving_user: mine.then_some(auth.user_id),
        assigned_to: None,
        order: TicketOrder::Updated,
    };

    let total = TicketRepo::count(&state.pool, &filter).await?;
    let items = TicketRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    Ok(Json(Page::new(items, page, total)))
}

/// POST /api/v1/tickets-manager
///
/// Staff open tickets on their own behalf and may assign immediately.
pub async fn create(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let ticket = open_ticket(&state, auth.user_id, &input, input.assigned_to_id).await?;

    notifications::notify_user(
        &state,
        ticket.requester_id,
        "Ticket Created",
        &format!(
            "Your ticket #{} - {} has been created successfully.",
            ticket.id, ticket.subject
        ),
        Some(format!("/tickets/{}", ticket.id)),
    )
    .await?;
    if let Some(assignee) = ticket.assigned_to_id {
        if assignee != ticket.requester_id {
            notifications::ticket_assigned(&state, &ticket, assignee).await?;
        }
    }
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/v1/tickets-manager/{id}
pub async fn details(
    RequireStaff(_auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TicketDetail>> {
    let ticket = find_ticket(&state, id).await?;
    Ok(Json(ticket_detail(&state, ticket).await?))
}

/// PUT /api/v1/tickets-manager/{id}
pub async fn update(
    RequireStaff(_auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicket>,
) -> AppResult<Json<Ticket>> {
    let existing = find_ticket(&state, id).await?;
    let ticket = edit_ticket(&state, &existing, &input).await?;
    notifications::ticket_updated(
        &state,
        &ticket,
        &format!("Ticket #{id} was updated by a manager."),
    )
    .await?;
    Ok(Json(ticket))
}

/// DELETE /api/v1/tickets-manager/{id}
pub async fn delete(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TicketRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Ticket", id));
    }
    tracing::info!(ticket_id = id, user_id = auth.user_id, "Ticket deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tickets-manager/{id}/resolve
///
/// Moves to Resolved (or Closed when no Resolved status exists) and stamps
/// the resolution date.
pub async fn resolve(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Ticket>> {
    find_ticket(&state, id).await?;

    let statuses = LookupRepo::statuses(&state.pool).await?;
    let refs: Vec<(DbId, &str)> = statuses.iter().map(|s| (s.id, s.name.as_str())).collect();
    let status_id = resolve_status(&refs).ok_or_else(|| {
        AppError::Core(CoreError::Internal(
            "Neither a Resolved nor a Closed status is configured".into(),
        ))
    })?;

    TicketRepo::set_status_resolved(&state.pool, id, status_id, Utc::now()).await?;
    let ticket = find_ticket(&state, id).await?;
    notifications::ticket_updated(&state, &ticket, &format!("Ticket #{id} marked as resolved."))
        .await?;

    tracing::info!(ticket_id = id, user_id = auth.user_id, "Ticket resolved");
    Ok(Json(ticket))
}

/// POST /api/v1/tickets-manager/{id}/reassign
pub async fn reassign(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReassignRequest>,
) -> AppResult<Json<Ticket>> {
    find_ticket(&state, id).await?;

    let assignee = input.assigned_to_id.filter(|&uid| uid > 0);
    if let Some(uid) = assignee {
        UserRepo::find_by_id(&state.pool, uid)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::not_found("User", uid))?;
    }

    TicketRepo::set_assignee(&state.pool, id, assignee).await?;
    let ticket = find_ticket(&state, id).await?;
    if let Some(uid) = assignee {
        notifications::ticket_assigned(&state, &ticket, uid).await?;
    }

    tracing::info!(ticket_id = id, assignee = ?assignee, user_id = auth.user_id, "Ticket reassigned");
    Ok(Json(ticket))
}

/// POST /api/v1/tickets-manager/{id}/reminder
///
/// Sends the assignee a reminder. A ticket with no assignee is rejected.
pub async fn reminder(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let ticket = find_ticket(&state, id).await?;
    let assignee = ticket.assigned_to_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Ticket has no assignee to remind".into(),
        ))
    })?;

    notifications::ticket_reminder(&state, &ticket, assignee).await?;
    tracing::info!(ticket_id = id, assignee, user_id = auth.user_id, "Reminder sent");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tickets-manager/{id}/comments
pub async fn add_comment(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<TicketComment>)> {
    let ticket = find_ticket(&state, id).await?;
    let comment = comment_on(&state, &ticket, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

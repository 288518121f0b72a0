//! Handlers for the requester-facing `/tickets` resource, plus the ticket
//! workflow helpers shared with the manager workspace.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use servicecore_core::error::CoreError;
use servicecore_core::pagination::{Page, PageRequest};
use servicecore_core::roles::{is_admin, is_staff};
use servicecore_core::sla;
use servicecore_core::tickets::{
    flatten_categories, initial_status, resolution_change, solution_matches, CategoryNode,
    FlatCategory, SolutionText, TicketText, RELATED_SOLUTION_LIMIT,
};
use servicecore_core::types::DbId;
use servicecore_db::models::attachment::{Attachment, AttachmentOwner};
use servicecore_db::models::solution::Solution;
use servicecore_db::models::ticket::{
    CreateComment, CreateTicket, NewTicket, Ticket, TicketChanges, TicketComment, TicketFilter,
    TicketOrder, TicketPriority, TicketStatus, UpdateTicket,
};
use servicecore_db::models::user::UserResponse;
use servicecore_db::repositories::{
    AttachmentRepo, LookupRepo, SolutionRepo, TicketRepo, UserRepo,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::save_attachments;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tickets`.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListQuery {
    pub search: Option<String>,
    pub status_id: Option<DbId>,
    pub priority_id: Option<DbId>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// A ticket with everything its detail screen shows.
#[derive(Debug, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub comments: Vec<TicketComment>,
    pub attachments: Vec<Attachment>,
    pub related_solutions: Vec<Solution>,
}

/// Options for the create and edit forms.
#[derive(Debug, Serialize)]
pub struct TicketLookups {
    pub statuses: Vec<TicketStatus>,
    pub priorities: Vec<TicketPriority>,
    pub categories: Vec<FlatCategory>,
    pub users: Vec<UserResponse>,
}

// ---------------------------------------------------------------------------
// Shared workflow
// ---------------------------------------------------------------------------

pub(crate) async fn find_ticket(state: &AppState, id: DbId) -> AppResult<Ticket> {
    TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket", id))
}

/// Load a ticket the caller may see from the requester view: admins see
/// everything, others only tickets they requested or are assigned.
async fn find_visible_ticket(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Ticket> {
    let ticket = find_ticket(state, id).await?;
    let involved =
        ticket.requester_id == auth.user_id || ticket.assigned_to_id == Some(auth.user_id);
    if is_admin(&auth.role) || involved {
        Ok(ticket)
    } else {
        Err(AppError::not_found("Ticket", id))
    }
}

async fn priority_name(state: &AppState, priority_id: Option<DbId>) -> AppResult<Option<String>> {
    match priority_id {
        None => Ok(None),
        Some(id) => LookupRepo::find_priority(&state.pool, id)
            .await?
            .map(|p| Some(p.name))
            .ok_or_else(|| AppError::not_found("Priority", id)),
    }
}

/// Insert a ticket in its initial status with the SLA due date derived from
/// the priority.
pub(crate) async fn open_ticket(
    state: &AppState,
    requester_id: DbId,
    input: &CreateTicket,
    assigned_to_id: Option<DbId>,
) -> AppResult<Ticket> {
    input.validate()?;

    let statuses = LookupRepo::statuses(&state.pool).await?;
    let refs: Vec<(DbId, &str)> = statuses.iter().map(|s| (s.id, s.name.as_str())).collect();
    let status_id = initial_status(&refs).ok_or_else(|| {
        AppError::Core(CoreError::Internal("No ticket statuses are configured".into()))
    })?;

    let priority = priority_name(state, input.priority_id).await?;
    let created_at = Utc::now();

    let ticket = TicketRepo::create(
        &state.pool,
        &NewTicket {
            subject: input.subject.trim().to_string(),
            description: input.description.clone(),
            status_id,
            priority_id: input.priority_id,
            category_id: input.category_id,
            requester_id,
            assigned_to_id,
            created_at,
            due_date: sla::due_date(created_at, priority.as_deref()),
        },
    )
    .await?;

    tracing::info!(
        ticket_id = ticket.id,
        requester_id,
        priority = priority.as_deref().unwrap_or("none"),
        "Ticket created"
    );
    Ok(ticket)
}

/// Apply an edit. A priority change recomputes the due date from the
/// original creation time; a status change into or out of Closed stamps or
/// clears the resolution date.
pub(crate) async fn edit_ticket(
    state: &AppState,
    existing: &Ticket,
    input: &UpdateTicket,
) -> AppResult<Ticket> {
    input.validate()?;

    let due_date = match input.priority_id {
        Some(new_priority) if Some(new_priority) != existing.priority_id => {
            let name = priority_name(state, Some(new_priority)).await?;
            Some(sla::due_date(existing.created_at, name.as_deref()))
        }
        _ => existing.due_date,
    };

    let resolution_date = match input.status_id {
        Some(new_status) if new_status != existing.status_id => {
            let status = LookupRepo::find_status(&state.pool, new_status)
                .await?
                .ok_or_else(|| AppError::not_found("Status", new_status))?;
            resolution_change(&existing.status_name, &status.name, Utc::now())
                .apply(existing.resolution_date)
        }
        _ => existing.resolution_date,
    };

    let changes = TicketChanges {
        subject: input.subject.as_ref().map(|s| s.trim().to_string()),
        description: input.description.clone(),
        status_id: input.status_id,
        priority_id: input.priority_id,
        category_id: input.category_id,
        assigned_to_id: input.assigned_to_id.filter(|&uid| uid > 0),
        clear_assignee: input.assigned_to_id == Some(0),
        due_date,
        resolution_date,
    };

    let ticket = TicketRepo::update(&state.pool, existing.id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket", existing.id))?;
    tracing::info!(ticket_id = ticket.id, status = %ticket.status_name, "Ticket updated");
    Ok(ticket)
}

/// Published solutions related to the ticket, most viewed first.
async fn related_solutions(state: &AppState, ticket: &Ticket) -> AppResult<Vec<Solution>> {
    let text = TicketText {
        subject: &ticket.subject,
        description: ticket.description.as_deref(),
        category_name: ticket.category_name.as_deref(),
    };
    Ok(SolutionRepo::published(&state.pool)
        .await?
        .into_iter()
        .filter(|s| {
            solution_matches(
                &text,
                &SolutionText {
                    title: &s.title,
                    keywords: s.keywords.as_deref(),
                    topic_name: s.topic_name.as_deref(),
                },
            )
        })
        .take(RELATED_SOLUTION_LIMIT)
        .collect())
}

pub(crate) async fn ticket_detail(state: &AppState, ticket: Ticket) -> AppResult<TicketDetail> {
    let comments = TicketRepo::list_comments(&state.pool, ticket.id).await?;
    let attachments = AttachmentRepo::list(&state.pool, AttachmentOwner::Ticket, ticket.id).await?;
    let related_solutions = related_solutions(state, &ticket).await?;
    Ok(TicketDetail {
        ticket,
        comments,
        attachments,
        related_solutions,
    })
}

/// Store a comment and notify the other parties.
pub(crate) async fn comment_on(
    state: &AppState,
    ticket: &Ticket,
    user_id: DbId,
    input: &CreateComment,
) -> AppResult<TicketComment> {
    input.validate()?;
    let content = input.content.trim();
    if content.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Comment cannot be empty".into(),
        )));
    }

    let comment = TicketRepo::add_comment(&state.pool, ticket.id, user_id, content).await?;
    notifications::comment_added(
        state,
        ticket,
        user_id,
        comment.author_name.as_deref(),
        &comment.content,
    )
    .await?;

    tracing::info!(ticket_id = ticket.id, user_id, "Comment added");
    Ok(comment)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets
///
/// Admin sees all tickets; everyone else sees tickets they requested or are
/// assigned.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TicketListQuery>,
) -> AppResult<Json<Page<Ticket>>> {
    let page = PageRequest::new(params.page, params.page_size);
    let filter = TicketFilter {
        search: params.search,
        status_id: params.status_id,
        priority_id: params.priority_id,
        involving_user: (!is_admin(&auth.role)).then_some(auth.user_id),
        assigned_to: None,
        order: TicketOrder::Created,
    };

    let total = TicketRepo::count(&state.pool, &filter).await?;
    let items = TicketRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    Ok(Json(Page::new(items, page, total)))
}

/// GET /api/v1/tickets/lookups
pub async fn lookups(State(state): State<AppState>) -> AppResult<Json<TicketLookups>> {
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
    let users = UserRepo::list_active(&state.pool).await?;

    Ok(Json(TicketLookups {
        statuses,
        priorities,
        categories: flatten_categories(&nodes),
        users,
    }))
}

/// POST /api/v1/tickets
///
/// The caller is the requester. Only staff may pick an assignee up front.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let assignee = input.assigned_to_id.filter(|_| is_staff(&auth.role));
    let ticket = open_ticket(&state, auth.user_id, &input, assignee).await?;
    notifications::ticket_updated(&state, &ticket, "New ticket created by user.").await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/v1/tickets/{id}
pub async fn details(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TicketDetail>> {
    let ticket = find_visible_ticket(&state, &auth, id).await?;
    Ok(Json(ticket_detail(&state, ticket).await?))
}

/// PUT /api/v1/tickets/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicket>,
) -> AppResult<Json<Ticket>> {
    let existing = find_visible_ticket(&state, &auth, id).await?;
    let input = UpdateTicket {
        assigned_to_id: input.assigned_to_id.filter(|_| is_staff(&auth.role)),
        ..input
    };
    let ticket = edit_ticket(&state, &existing, &input).await?;
    notifications::ticket_updated(&state, &ticket, &format!("Ticket #{id} was updated by a user."))
        .await?;
    Ok(Json(ticket))
}

/// DELETE /api/v1/tickets/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_visible_ticket(&state, &auth, id).await?;
    if !TicketRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Ticket", id));
    }
    tracing::info!(ticket_id = id, user_id = auth.user_id, "Ticket deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tickets/{id}/comments
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<TicketComment>)> {
    let ticket = find_visible_ticket(&state, &auth, id).await?;
    let comment = comment_on(&state, &ticket, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /api/v1/tickets/{id}/attachments (multipart)
pub async fn upload_attachments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Attachment>>>)> {
    find_visible_ticket(&state, &auth, id).await?;
    let saved =
        save_attachments(&state, AttachmentOwner::Ticket, id, auth.user_id, multipart).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(saved))))
}

//! Handlers for the `/approvals` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use servicecore_core::approvals::{closes_ticket, decide, STATUS_CANCELLED};
use servicecore_core::error::CoreError;
use servicecore_core::roles::sees_all_approvals;
use servicecore_core::tickets::STATUS_CLOSED;
use servicecore_core::types::DbId;
use servicecore_db::models::approval::{Approval, ApprovalAction, RequestApproval};
use servicecore_db::repositories::{ApprovalRepo, LookupRepo, TicketRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_approval(state: &AppState, id: DbId) -> AppResult<Approval> {
    ApprovalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Approval", id))
}

/// Whether `auth` may record `decision` on `approval`.
///
/// Admins and Agents decide anything. A named approver decides their own
/// requests, and the requester may withdraw (cancel) theirs.
fn may_act(auth: &AuthUser, approval: &Approval, decision: &str) -> bool {
    sees_all_approvals(&auth.role)
        || approval.approver_id == Some(auth.user_id)
        || (decision == STATUS_CANCELLED && approval.requester_id == auth.user_id)
}

/// GET /api/v1/approvals
///
/// Admins and Agents see every request; everyone else sees the requests
/// they raised or were asked to decide.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Approval>>>> {
    let approvals = if sees_all_approvals(&auth.role) {
        ApprovalRepo::list_all(&state.pool).await?
    } else {
        ApprovalRepo::list_for_user(&state.pool, auth.user_id).await?
    };
    Ok(Json(DataResponse::new(approvals)))
}

/// POST /api/v1/approvals
pub async fn request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RequestApproval>,
) -> AppResult<(StatusCode, Json<Approval>)> {
    input.validate()?;
    let approval = ApprovalRepo::create(&state.pool, auth.user_id, &input).await?;

    if let Some(approver_id) = approval.approver_id {
        notifications::notify_user(
            &state,
            approver_id,
            "Approval Requested",
            &format!("{} requested approval: {}", approval.requester_name, approval.subject),
            None,
        )
        .await?;
    }

    tracing::info!(
        approval_id = approval.id,
        request_type = %approval.request_type,
        user_id = auth.user_id,
        "Approval requested"
    );
    Ok((StatusCode::CREATED, Json(approval)))
}

/// POST /api/v1/approvals/{id}/action
///
/// Approving a `Ticket_Resolution` request closes the related ticket and
/// stamps its resolution date.
pub async fn action(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApprovalAction>,
) -> AppResult<Json<Approval>> {
    let approval = find_approval(&state, id).await?;
    decide(&approval.status, &input.status)?;
    if !may_act(&auth, &approval, &input.status) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot act on this approval".into(),
        )));
    }

    let updated = ApprovalRepo::act(
        &state.pool,
        id,
        auth.user_id,
        &input.status,
        input.comments.as_deref(),
    )
    .await?;
    if !updated {
        // Another approver got there first.
        return Err(AppError::Core(CoreError::Conflict(
            "Approval already decided".into(),
        )));
    }

    if closes_ticket(&approval.request_type, &input.status) {
        close_related_ticket(&state, &approval).await?;
    }

    if approval.requester_id != auth.user_id {
        notifications::notify_user(
            &state,
            approval.requester_id,
            &format!("Approval {}", input.status),
            &format!("Your request \"{}\" was {}.", approval.subject, input.status.to_lowercase()),
            None,
        )
        .await?;
    }

    tracing::info!(approval_id = id, decision = %input.status, user_id = auth.user_id, "Approval decided");
    Ok(Json(find_approval(&state, id).await?))
}

async fn close_related_ticket(state: &AppState, approval: &Approval) -> AppResult<()> {
    let Some(ticket_id) = approval.related_id else {
        tracing::warn!(approval_id = approval.id, "Ticket resolution approval has no ticket");
        return Ok(());
    };
    let closed = LookupRepo::find_status_by_name(&state.pool, STATUS_CLOSED)
        .await?
        .ok_or_else(|| AppError::InternalError("No Closed ticket status configured".into()))?;

    if TicketRepo::set_status_resolved(&state.pool, ticket_id, closed.id, Utc::now()).await? {
        tracing::info!(ticket_id, approval_id = approval.id, "Ticket closed by approval");
    } else {
        tracing::warn!(ticket_id, approval_id = approval.id, "Approved ticket no longer exists");
    }
    Ok(())
}

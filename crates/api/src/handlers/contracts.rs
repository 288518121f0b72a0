//! Handlers for the `/contracts` resource, its vendors and contract types.
//!
//! Every mutation appends a row to the contract history so the detail view
//! can show who did what and when.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Serialize;
use servicecore_core::contracts::{
    self, validate_payment_status, validate_term, DECISION_APPROVED, DECISION_REJECTED,
    EXPIRY_WINDOW_DAYS, HISTORY_APPROVED, HISTORY_ATTACHMENT, HISTORY_CREATED, HISTORY_PAYMENT,
    HISTORY_REJECTED, HISTORY_SUBMITTED, HISTORY_UPDATED,
};
use servicecore_core::types::DbId;
use servicecore_db::models::attachment::{Attachment, AttachmentOwner};
use servicecore_db::models::contract::{
    Contract, ContractApproval, ContractDashboard, ContractDecision, ContractHistory,
    ContractPayment, ContractStatusTotal, ContractType, CreateContract, CreatePayment,
    UpdateContract, UpsertContractType, UpsertVendor, Vendor, VendorTotal,
};
use servicecore_db::repositories::{AttachmentRepo, ContractRepo, ContractTypeRepo, VendorRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::save_attachments;

/// How many recently created contracts the dashboard lists.
const RECENT_CONTRACT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct ContractDetail {
    #[serde(flatten)]
    pub contract: Contract,
    pub expiring_soon: bool,
    pub approvals: Vec<ContractApproval>,
    pub payments: Vec<ContractPayment>,
    pub history: Vec<ContractHistory>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
pub struct ContractReport {
    pub by_status: Vec<ContractStatusTotal>,
    pub by_vendor: Vec<VendorTotal>,
}

async fn find_contract(state: &AppState, id: DbId) -> AppResult<Contract> {
    ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))
}

/// GET /api/v1/contracts
///
/// Active totals, contracts ending inside the expiry window (overdue ones
/// included), the approval backlog and the most recently created contracts.
pub async fn dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ContractDashboard>>> {
    let until = Utc::now().date_naive() + Duration::days(EXPIRY_WINDOW_DAYS);

    let (active_count, total_active_value) = ContractRepo::active_totals(&state.pool).await?;
    let expiring_soon = ContractRepo::expiring_by(&state.pool, until).await?;
    let pending_approvals = ContractRepo::count_pending_approval(&state.pool).await?;
    let recent = ContractRepo::recent(&state.pool, RECENT_CONTRACT_LIMIT).await?;

    Ok(Json(DataResponse::new(ContractDashboard {
        active_count,
        expiring_soon_count: expiring_soon.len() as i64,
        pending_approvals,
        total_active_value,
        expiring_soon,
        recent,
    })))
}

/// GET /api/v1/contracts/reports
pub async fn reports(State(state): State<AppState>) -> AppResult<Json<DataResponse<ContractReport>>> {
    let by_status = ContractRepo::totals_by_status(&state.pool).await?;
    let by_vendor = ContractRepo::totals_by_vendor(&state.pool).await?;
    Ok(Json(DataResponse::new(ContractReport {
        by_status,
        by_vendor,
    })))
}

/// POST /api/v1/contracts
///
/// New contracts start in `Draft`.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<Contract>)> {
    input.validate()?;
    validate_term(input.start_date, input.end_date)?;

    let contract = ContractRepo::create(&state.pool, auth.user_id, &input).await?;
    ContractRepo::add_history(&state.pool, contract.id, HISTORY_CREATED, None, auth.user_id).await?;

    tracing::info!(contract_id = contract.id, user_id = auth.user_id, "Contract created");
    Ok((StatusCode::CREATED, Json(contract)))
}

/// GET /api/v1/contracts/{id}
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ContractDetail>> {
    let contract = find_contract(&state, id).await?;
    let approvals = ContractRepo::approvals(&state.pool, id).await?;
    let payments = ContractRepo::payments(&state.pool, id).await?;
    let history = ContractRepo::history(&state.pool, id).await?;
    let attachments = AttachmentRepo::list(&state.pool, AttachmentOwner::Contract, id).await?;

    Ok(Json(ContractDetail {
        expiring_soon: contracts::is_expiring_soon(contract.end_date, Utc::now().date_naive()),
        contract,
        approvals,
        payments,
        history,
        attachments,
    }))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<Contract>> {
    input.validate()?;
    let existing = find_contract(&state, id).await?;
    validate_term(
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;

    let contract = ContractRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Contract", id))?;
    ContractRepo::add_history(&state.pool, id, HISTORY_UPDATED, None, auth.user_id).await?;

    tracing::info!(contract_id = id, user_id = auth.user_id, "Contract updated");
    Ok(Json(contract))
}

/// POST /api/v1/contracts/{id}/submit
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Contract>> {
    let contract = find_contract(&state, id).await?;
    let next = contracts::submit(&contract.status)?;

    ContractRepo::set_status(&state.pool, id, next).await?;
    ContractRepo::add_history(&state.pool, id, HISTORY_SUBMITTED, None, auth.user_id).await?;

    tracing::info!(contract_id = id, user_id = auth.user_id, "Contract submitted for approval");
    Ok(Json(find_contract(&state, id).await?))
}

/// POST /api/v1/contracts/{id}/approve
pub async fn approve(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ContractDecision>>,
) -> AppResult<Json<ContractApproval>> {
    let contract = find_contract(&state, id).await?;
    let next = contracts::approve(&contract.status)?;
    let comments = body.and_then(|Json(b)| b.comments);

    let approval = ContractRepo::decide(
        &state.pool,
        id,
        next,
        auth.user_id,
        DECISION_APPROVED,
        comments.as_deref(),
    )
    .await?;
    ContractRepo::add_history(&state.pool, id, HISTORY_APPROVED, comments.as_deref(), auth.user_id)
        .await?;

    tracing::info!(contract_id = id, approver_id = auth.user_id, "Contract approved");
    Ok(Json(approval))
}

/// POST /api/v1/contracts/{id}/reject
pub async fn reject(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ContractDecision>>,
) -> AppResult<Json<ContractApproval>> {
    let contract = find_contract(&state, id).await?;
    let next = contracts::reject(&contract.status)?;
    let comments = body.and_then(|Json(b)| b.comments);

    let approval = ContractRepo::decide(
        &state.pool,
        id,
        next,
        auth.user_id,
        DECISION_REJECTED,
        comments.as_deref(),
    )
    .await?;
    ContractRepo::add_history(&state.pool, id, HISTORY_REJECTED, comments.as_deref(), auth.user_id)
        .await?;

    tracing::info!(contract_id = id, approver_id = auth.user_id, "Contract rejected");
    Ok(Json(approval))
}

/// POST /api/v1/contracts/{id}/payments
pub async fn add_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<ContractPayment>)> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_payment_status(status)?;
    }
    find_contract(&state, id).await?;

    let payment = ContractRepo::add_payment(&state.pool, id, &input).await?;
    let notes = format!("{:.2} due {}", payment.amount, payment.due_date);
    ContractRepo::add_history(&state.pool, id, HISTORY_PAYMENT, Some(&notes), auth.user_id).await?;

    tracing::info!(contract_id = id, payment_id = payment.id, "Contract payment recorded");
    Ok((StatusCode::CREATED, Json(payment)))
}

/// POST /api/v1/contracts/{id}/attachments (multipart)
pub async fn upload_attachments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Attachment>>>)> {
    find_contract(&state, id).await?;
    let saved =
        save_attachments(&state, AttachmentOwner::Contract, id, auth.user_id, multipart).await?;

    for attachment in &saved {
        ContractRepo::add_history(
            &state.pool,
            id,
            HISTORY_ATTACHMENT,
            Some(&attachment.file_name),
            auth.user_id,
        )
        .await?;
    }
    Ok((StatusCode::CREATED, Json(DataResponse::new(saved))))
}

// ---------------------------------------------------------------------------
// Vendors and contract types
// ---------------------------------------------------------------------------

/// GET /api/v1/contracts/vendors
pub async fn vendors(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Vendor>>>> {
    Ok(Json(DataResponse::new(VendorRepo::list(&state.pool).await?)))
}

/// POST /api/v1/contracts/vendors
///
/// Creates the vendor when `id` is absent, otherwise updates it.
pub async fn upsert_vendor(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertVendor>,
) -> AppResult<Json<Vendor>> {
    input.validate()?;
    let vendor = VendorRepo::upsert(&state.pool, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Vendor", input.id.unwrap_or_default()))?;
    tracing::info!(vendor_id = vendor.id, user_id = auth.user_id, "Vendor saved");
    Ok(Json(vendor))
}

/// GET /api/v1/contracts/types
pub async fn types(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ContractType>>>> {
    Ok(Json(DataResponse::new(ContractTypeRepo::list(&state.pool).await?)))
}

/// POST /api/v1/contracts/types
pub async fn upsert_type(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertContractType>,
) -> AppResult<Json<ContractType>> {
    input.validate()?;
    let contract_type = ContractTypeRepo::upsert(&state.pool, &input)
        .await?
        .ok_or_else(|| AppError::not_found("ContractType", input.id.unwrap_or_default()))?;
    tracing::info!(type_id = contract_type.id, user_id = auth.user_id, "Contract type saved");
    Ok(Json(contract_type))
}

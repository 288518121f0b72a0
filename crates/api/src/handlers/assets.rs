//! Handlers for the `/assets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use servicecore_core::assets::{check_assignable, validate_status, HISTORY_UPDATE, PAGE_SIZE};
use servicecore_core::pagination::{Page, PageRequest};
use servicecore_core::types::DbId;
use servicecore_db::models::asset::{
    Asset, AssetAssignment, AssetCategory, AssetFilter, AssetHistory, AssetMaintenance,
    AssignAsset, CreateAsset, LogMaintenance, NewAssetHistory, UpdateAsset,
};
use servicecore_db::repositories::{AssetRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /assets`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetListQuery {
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub assignments: Vec<AssetAssignment>,
    pub maintenances: Vec<AssetMaintenance>,
    pub history: Vec<AssetHistory>,
}

async fn find_asset(state: &AppState, id: DbId) -> AppResult<Asset> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Asset", id))
}

/// GET /api/v1/assets?search=&category_id=&page=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AssetListQuery>,
) -> AppResult<Json<Page<Asset>>> {
    let page = PageRequest::new(params.page, Some(PAGE_SIZE));
    let filter = AssetFilter {
        search: params.search,
        category_id: params.category_id,
    };
    let total = AssetRepo::count(&state.pool, &filter).await?;
    let items = AssetRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    Ok(Json(Page::new(items, page, total)))
}

/// GET /api/v1/assets/categories
pub async fn categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AssetCategory>>>> {
    Ok(Json(DataResponse::new(AssetRepo::categories(&state.pool).await?)))
}

/// POST /api/v1/assets
///
/// Registers the asset and writes a `Registration` history row.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_status(status)?;
    }
    let asset = AssetRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(asset_id = asset.id, tag = %asset.asset_tag, "Asset registered");
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /api/v1/assets/{id}
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssetDetail>> {
    let asset = find_asset(&state, id).await?;
    let assignments = AssetRepo::assignments(&state.pool, id).await?;
    let maintenances = AssetRepo::maintenances(&state.pool, id).await?;
    let history = AssetRepo::history(&state.pool, id).await?;

    Ok(Json(AssetDetail {
        asset,
        assignments,
        maintenances,
        history,
    }))
}

/// PUT /api/v1/assets/{id}
///
/// A status change is recorded in the asset history.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_status(status)?;
    }
    let existing = find_asset(&state, id).await?;
    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Asset", id))?;

    if asset.status != existing.status {
        AssetRepo::add_history(
            &state.pool,
            &NewAssetHistory {
                asset_id: id,
                action: HISTORY_UPDATE,
                old_status: Some(&existing.status),
                new_status: Some(&asset.status),
                notes: None,
                performed_by: auth.user_id,
            },
        )
        .await?;
    }

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset updated");
    Ok(Json(asset))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Asset", id));
    }
    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assets/{id}/assign
pub async fn assign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignAsset>,
) -> AppResult<(StatusCode, Json<AssetAssignment>)> {
    let asset = find_asset(&state, id).await?;
    check_assignable(&asset.status)?;
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", input.user_id))?;

    let assignment = AssetRepo::assign(&state.pool, id, &asset.status, auth.user_id, &input).await?;
    tracing::info!(asset_id = id, user_id = input.user_id, "Asset assigned");
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// POST /api/v1/assets/{id}/maintenance
pub async fn log_maintenance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<LogMaintenance>,
) -> AppResult<(StatusCode, Json<AssetMaintenance>)> {
    input.validate()?;
    let asset = find_asset(&state, id).await?;
    let entry =
        AssetRepo::log_maintenance(&state.pool, id, &asset.status, auth.user_id, &input).await?;
    tracing::info!(asset_id = id, kind = %entry.maintenance_type, "Maintenance logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

//! Handlers for the `/settings` key/value store.

use axum::extract::State;
use axum::Json;
use servicecore_db::models::setting::{Setting, UpsertSetting};
use servicecore_db::repositories::SettingRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Setting>>>> {
    Ok(Json(DataResponse::new(SettingRepo::list(&state.pool).await?)))
}

/// POST /api/v1/settings
///
/// Inserts the key or overwrites its value.
pub async fn upsert(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertSetting>,
) -> AppResult<Json<Setting>> {
    input.validate()?;
    let setting = SettingRepo::upsert(&state.pool, input.key.trim(), &input.value).await?;
    tracing::info!(key = %setting.key, user_id = auth.user_id, "Setting saved");
    Ok(Json(setting))
}

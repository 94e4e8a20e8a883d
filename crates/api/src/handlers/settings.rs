use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use noda_db::models::setting::UserSetting;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::Collection;
use crate::services::setting::{self, SettingValue};
use crate::state::AppState;

/// GET /me/settings
pub async fn list_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<UserSetting>>> {
    let settings = setting::list(&state.pool, auth.user_id, &params).await?;
    Ok(Json(Collection::new(params.pagination, settings)))
}

/// GET /me/settings/{key}
pub async fn get_setting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> AppResult<Json<UserSetting>> {
    let setting = setting::get(&state.pool, auth.user_id, &key).await?;
    Ok(Json(setting))
}

/// PUT /me/settings/{key}
pub async fn put_setting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    JsonBody(input): JsonBody<SettingValue>,
) -> AppResult<StatusCode> {
    setting::put(&state.pool, auth.user_id, &key, &input.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

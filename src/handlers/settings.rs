use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};

use super::signed_in;
use crate::{
    entities::{office_setting, Role},
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::settings::SettingsForm,
    services::{auth::Claims, settings::LOGO, SettingsService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_settings).put(update_settings).patch(update_settings),
    )
}

/// Office contact details shown in the site header and footer
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Office settings", body = office_setting::Model)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
) -> ApiResult<Json<office_setting::Model>> {
    Ok(Json(SettingsService::get(&app_state.db).await?))
}

/// Update the supplied settings fields; admins and super admins only
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body(content = SettingsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Saved settings", body = office_setting::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Editors cannot change settings", body = ApiErrorResponse)
    ),
    tag = "settings",
    security(("bearer_auth" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<SettingsForm>,
) -> ApiResult<Json<office_setting::Model>> {
    let claims = signed_in(user_claims)?;
    claims.require_role(&[Role::SuperAdmin, Role::Admin])?;

    let (changes, logo) = form.data.into_patch()?;
    let logo = LOGO.accept(logo)?;

    let settings = SettingsService::update(&app_state.db, &app_state.uploads, changes, logo).await?;
    Ok(Json(settings))
}

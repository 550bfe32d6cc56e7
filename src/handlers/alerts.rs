use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use validator::Validate;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::alert,
    errors::{ApiErrorResponse, ApiResult, JsonBody},
    schemas::{
        alerts::{AlertQuery, AlertRequest},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, AlertService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts).post(create_alert))
        .route(
            "/{id}",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
}

/// Banner alerts. The public list holds active alerts inside their display window.
#[utoipa::path(
    get,
    path = "/api/alerts",
    params(AlertQuery),
    responses(
        (status = 200, description = "Alerts, newest first", body = [alert::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "alerts",
    security((), ("bearer_auth" = []))
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    Query(query): Query<AlertQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<alert::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(AlertService::list(&app_state.db, include_hidden).await?))
}

#[utoipa::path(
    get,
    path = "/api/alerts/{id}",
    params(("id" = i32, Path, description = "Alert id"), AdminListQuery),
    responses(
        (status = 200, description = "Alert", body = alert::Model),
        (status = 404, description = "Unknown id or not currently shown", body = ApiErrorResponse)
    ),
    tag = "alerts",
    security((), ("bearer_auth" = []))
)]
pub async fn get_alert(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<alert::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        AlertService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/alerts",
    request_body = AlertRequest,
    responses(
        (status = 201, description = "Created", example = json!({"message": "Alert created", "alertId": 1})),
        (status = 400, description = "Invalid body", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "alerts",
    security(("bearer_auth" = []))
)]
pub async fn create_alert(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    JsonBody(request): JsonBody<AlertRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    request.validate()?;

    let alert = AlertService::create(&app_state.db, request).await?;
    Ok(created("Alert created", "alertId", alert.id))
}

/// Full replacement of the alert
#[utoipa::path(
    put,
    path = "/api/alerts/{id}",
    params(("id" = i32, Path, description = "Alert id")),
    request_body = AlertRequest,
    responses(
        (status = 200, description = "Updated alert", body = alert::Model),
        (status = 400, description = "Invalid body", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "alerts",
    security(("bearer_auth" = []))
)]
pub async fn update_alert(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    JsonBody(request): JsonBody<AlertRequest>,
) -> ApiResult<Json<alert::Model>> {
    signed_in(user_claims)?;
    request.validate()?;

    Ok(Json(AlertService::update(&app_state.db, id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    params(("id" = i32, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "alerts",
    security(("bearer_auth" = []))
)]
pub async fn delete_alert(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    AlertService::delete(&app_state.db, id).await?;
    Ok(Json(SuccessResponse::new("Alert deleted")))
}

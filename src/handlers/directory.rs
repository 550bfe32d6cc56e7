use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::directory_entry,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        directory::{DirectoryForm, DirectoryQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, directory::PHOTO, DirectoryService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_directory).post(create_entry))
        .route(
            "/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

/// Staff directory ordered by `sort_order`, then name
#[utoipa::path(
    get,
    path = "/api/directory",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Directory entries", body = [directory_entry::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "directory",
    security((), ("bearer_auth" = []))
)]
pub async fn list_directory(
    State(app_state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<directory_entry::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        DirectoryService::list(&app_state.db, &query, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/directory/{id}",
    params(("id" = i32, Path, description = "Entry id"), AdminListQuery),
    responses(
        (status = 200, description = "Directory entry", body = directory_entry::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "directory",
    security((), ("bearer_auth" = []))
)]
pub async fn get_entry(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<directory_entry::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        DirectoryService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/directory",
    request_body(content = DirectoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Directory entry created", "entryId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
pub async fn create_entry(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<DirectoryForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (fields, photo) = form.data.into_fields()?;
    let photo = PHOTO.accept(photo)?;

    let entry = DirectoryService::create(&app_state.db, &app_state.uploads, fields, photo).await?;
    Ok(created("Directory entry created", "entryId", entry.id))
}

/// Replace every text field; the photo only changes when a new one is sent
#[utoipa::path(
    put,
    path = "/api/directory/{id}",
    params(("id" = i32, Path, description = "Entry id")),
    request_body(content = DirectoryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated entry", body = directory_entry::Model),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
pub async fn update_entry(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<DirectoryForm>,
) -> ApiResult<Json<directory_entry::Model>> {
    signed_in(user_claims)?;
    let (fields, photo) = form.data.into_fields()?;
    let photo = PHOTO.accept(photo)?;

    let entry =
        DirectoryService::update(&app_state.db, &app_state.uploads, id, fields, photo).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/directory/{id}",
    params(("id" = i32, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "directory",
    security(("bearer_auth" = []))
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    DirectoryService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Directory entry deleted")))
}

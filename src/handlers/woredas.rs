use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::woreda,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        woredas::{WoredaFiles, WoredaForm},
        AdminListQuery, SuccessResponse,
    },
    services::{
        auth::Claims,
        woreda::{WoredaUploads, ADMIN_PHOTO, BANNER, LOGO},
        WoredaService,
    },
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_woredas).post(create_woreda))
        .route("/slug/{slug}", get(get_woreda_by_slug))
        .route(
            "/{id}",
            get(get_woreda)
                .put(update_woreda)
                .patch(update_woreda)
                .delete(delete_woreda),
        )
}

/// Sniffs all three image parts before anything is written
fn accept_files(files: WoredaFiles) -> ApiResult<WoredaUploads> {
    Ok(WoredaUploads {
        banner: BANNER.accept(files.banner)?,
        logo: LOGO.accept(files.logo)?,
        admin_photo: ADMIN_PHOTO.accept(files.admin_photo)?,
    })
}

#[utoipa::path(
    get,
    path = "/api/woredas",
    params(AdminListQuery),
    responses(
        (status = 200, description = "Woredas by sort order, then name", body = [woreda::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "woredas",
    security((), ("bearer_auth" = []))
)]
pub async fn list_woredas(
    State(app_state): State<AppState>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<woreda::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        WoredaService::list(&app_state.db, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/woredas/{id}",
    params(("id" = i32, Path, description = "Woreda id"), AdminListQuery),
    responses(
        (status = 200, description = "Woreda", body = woreda::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "woredas",
    security((), ("bearer_auth" = []))
)]
pub async fn get_woreda(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<woreda::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        WoredaService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/woredas/slug/{slug}",
    params(("slug" = String, Path, description = "Woreda slug", example = "kemise"), AdminListQuery),
    responses(
        (status = 200, description = "Woreda", body = woreda::Model),
        (status = 404, description = "Unknown slug or inactive", body = ApiErrorResponse)
    ),
    tag = "woredas",
    security((), ("bearer_auth" = []))
)]
pub async fn get_woreda_by_slug(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<woreda::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        WoredaService::get_by_slug(&app_state.db, &slug, include_hidden).await?,
    ))
}

/// Create a woreda. The slug is derived from `name_en` unless given.
#[utoipa::path(
    post,
    path = "/api/woredas",
    request_body(content = WoredaForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Woreda created", "woredaId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 409, description = "Slug already taken", body = ApiErrorResponse,
         example = json!({"error": "Slug already taken", "status": 409}))
    ),
    tag = "woredas",
    security(("bearer_auth" = []))
)]
pub async fn create_woreda(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<WoredaForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (draft, files) = form.data.into_draft()?;
    let files = accept_files(files)?;

    let woreda = WoredaService::create(&app_state.db, &app_state.uploads, draft, files).await?;
    Ok(created("Woreda created", "woredaId", woreda.id))
}

/// Update only the supplied fields; each new image replaces its old file
#[utoipa::path(
    put,
    path = "/api/woredas/{id}",
    params(("id" = i32, Path, description = "Woreda id")),
    request_body(content = WoredaForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated woreda", body = woreda::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse),
        (status = 409, description = "Slug already taken", body = ApiErrorResponse)
    ),
    tag = "woredas",
    security(("bearer_auth" = []))
)]
pub async fn update_woreda(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<WoredaForm>,
) -> ApiResult<Json<woreda::Model>> {
    signed_in(user_claims)?;
    let (changes, files) = form.data.into_patch()?;
    let files = accept_files(files)?;

    let woreda =
        WoredaService::update(&app_state.db, &app_state.uploads, id, changes, files).await?;
    Ok(Json(woreda))
}

/// Delete a woreda; linked projects, gallery items and staff stay, unlinked
#[utoipa::path(
    delete,
    path = "/api/woredas/{id}",
    params(("id" = i32, Path, description = "Woreda id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "woredas",
    security(("bearer_auth" = []))
)]
pub async fn delete_woreda(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    WoredaService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Woreda deleted")))
}

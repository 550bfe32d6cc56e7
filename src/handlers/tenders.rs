use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::tender,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        tenders::{TenderForm, TenderQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, tender::DOCUMENT, TenderService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tenders).post(create_tender))
        .route(
            "/{id}",
            get(get_tender)
                .put(update_tender)
                .patch(update_tender)
                .delete(delete_tender),
        )
}

/// List tenders; cancelled ones are only listed with `admin=true`
#[utoipa::path(
    get,
    path = "/api/tenders",
    params(TenderQuery),
    responses(
        (status = 200, description = "Tenders, newest first", body = [tender::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "tenders",
    security((), ("bearer_auth" = []))
)]
pub async fn list_tenders(
    State(app_state): State<AppState>,
    Query(query): Query<TenderQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<tender::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        TenderService::list(&app_state.db, &query, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/tenders/{id}",
    params(("id" = i32, Path, description = "Tender id"), AdminListQuery),
    responses(
        (status = 200, description = "Tender", body = tender::Model),
        (status = 404, description = "Unknown id or cancelled", body = ApiErrorResponse)
    ),
    tag = "tenders",
    security((), ("bearer_auth" = []))
)]
pub async fn get_tender(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<tender::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        TenderService::get(&app_state.db, id, include_hidden).await?,
    ))
}

/// Publish a tender. `ref_number` must be unique.
#[utoipa::path(
    post,
    path = "/api/tenders",
    request_body(content = TenderForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Tender created", "tenderId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 409, description = "Duplicate reference number", body = ApiErrorResponse)
    ),
    tag = "tenders",
    security(("bearer_auth" = []))
)]
pub async fn create_tender(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<TenderForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let claims = signed_in(user_claims)?;
    let (draft, document) = form.data.into_draft()?;
    let document = DOCUMENT.accept(document)?;

    let tender = TenderService::create(&app_state.db, &app_state.uploads, draft, document).await?;
    tracing::info!(
        "Tender {} ({}) published by {}",
        tender.id,
        tender.ref_number,
        claims.sub
    );
    Ok(created("Tender created", "tenderId", tender.id))
}

/// Update only the supplied fields; a new document replaces the old file
#[utoipa::path(
    put,
    path = "/api/tenders/{id}",
    params(("id" = i32, Path, description = "Tender id")),
    request_body(content = TenderForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated tender", body = tender::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse),
        (status = 409, description = "Duplicate reference number", body = ApiErrorResponse)
    ),
    tag = "tenders",
    security(("bearer_auth" = []))
)]
pub async fn update_tender(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<TenderForm>,
) -> ApiResult<Json<tender::Model>> {
    signed_in(user_claims)?;
    let (changes, document) = form.data.into_patch()?;
    let document = DOCUMENT.accept(document)?;

    let tender =
        TenderService::update(&app_state.db, &app_state.uploads, id, changes, document).await?;
    Ok(Json(tender))
}

#[utoipa::path(
    delete,
    path = "/api/tenders/{id}",
    params(("id" = i32, Path, description = "Tender id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "tenders",
    security(("bearer_auth" = []))
)]
pub async fn delete_tender(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    TenderService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Tender deleted")))
}

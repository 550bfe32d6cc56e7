use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::document,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        documents::{DocumentForm, DocumentQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{
        auth::Claims,
        document::{DocumentUploads, COVER, FILE},
        DocumentService,
    },
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route(
            "/{id}",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
}

#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentQuery),
    responses(
        (status = 200, description = "Documents, newest first", body = [document::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "documents",
    security((), ("bearer_auth" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    Query(query): Query<DocumentQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<document::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        DocumentService::list(&app_state.db, &query, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document id"), AdminListQuery),
    responses(
        (status = 200, description = "Document", body = document::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "documents",
    security((), ("bearer_auth" = []))
)]
pub async fn get_document(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<document::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        DocumentService::get(&app_state.db, id, include_hidden).await?,
    ))
}

/// Upload a document; the `file` part is required, `cover` is optional
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body(content = DocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Document created", "documentId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn create_document(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<DocumentForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (fields, files) = form.data.into_fields()?;
    let file = FILE.require(files.file)?;
    let cover = COVER.accept(files.cover)?;

    let doc = DocumentService::create(&app_state.db, &app_state.uploads, fields, file, cover).await?;
    Ok(created("Document created", "documentId", doc.id))
}

/// Replace every text field; files change only when new ones are sent
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document id")),
    request_body(content = DocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated document", body = document::Model),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn update_document(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<DocumentForm>,
) -> ApiResult<Json<document::Model>> {
    signed_in(user_claims)?;
    let (fields, files) = form.data.into_fields()?;
    let uploads = DocumentUploads {
        file: FILE.accept(files.file)?,
        cover: COVER.accept(files.cover)?,
    };

    let doc = DocumentService::update(&app_state.db, &app_state.uploads, id, fields, uploads).await?;
    Ok(Json(doc))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    DocumentService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Document deleted")))
}

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::gallery_item,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        gallery::{GalleryForm, GalleryQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, gallery::IMAGE, GalleryService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gallery).post(create_gallery_item))
        .route(
            "/{id}",
            get(get_gallery_item)
                .put(update_gallery_item)
                .patch(update_gallery_item)
                .delete(delete_gallery_item),
        )
}

/// Gallery items by `sort_order`, newest first within the same position
#[utoipa::path(
    get,
    path = "/api/gallery",
    params(GalleryQuery),
    responses(
        (status = 200, description = "Gallery items", body = [gallery_item::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "gallery",
    security((), ("bearer_auth" = []))
)]
pub async fn list_gallery(
    State(app_state): State<AppState>,
    Query(query): Query<GalleryQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<gallery_item::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        GalleryService::list(&app_state.db, &query, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/gallery/{id}",
    params(("id" = i32, Path, description = "Gallery item id"), AdminListQuery),
    responses(
        (status = 200, description = "Gallery item", body = gallery_item::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "gallery",
    security((), ("bearer_auth" = []))
)]
pub async fn get_gallery_item(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<gallery_item::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        GalleryService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/gallery",
    request_body(content = GalleryForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Gallery item created", "galleryId": 1})),
        (status = 400, description = "Missing image or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "gallery",
    security(("bearer_auth" = []))
)]
pub async fn create_gallery_item(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<GalleryForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (draft, image) = form.data.into_draft()?;
    let image = IMAGE.require(image)?;

    let item = GalleryService::create(&app_state.db, &app_state.uploads, draft, image).await?;
    Ok(created("Gallery item created", "galleryId", item.id))
}

#[utoipa::path(
    put,
    path = "/api/gallery/{id}",
    params(("id" = i32, Path, description = "Gallery item id")),
    request_body(content = GalleryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated item", body = gallery_item::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "gallery",
    security(("bearer_auth" = []))
)]
pub async fn update_gallery_item(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<GalleryForm>,
) -> ApiResult<Json<gallery_item::Model>> {
    signed_in(user_claims)?;
    let (changes, image) = form.data.into_patch()?;
    let image = IMAGE.accept(image)?;

    let item =
        GalleryService::update(&app_state.db, &app_state.uploads, id, changes, image).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/gallery/{id}",
    params(("id" = i32, Path, description = "Gallery item id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "gallery",
    security(("bearer_auth" = []))
)]
pub async fn delete_gallery_item(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    GalleryService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Gallery item deleted")))
}

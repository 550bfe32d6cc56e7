use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::hero_slide,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{hero_slides::HeroSlideForm, AdminListQuery, SuccessResponse},
    services::{auth::Claims, hero_slide::IMAGE, HeroSlideService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_slides).post(create_slide))
        .route(
            "/{id}",
            get(get_slide).put(update_slide).delete(delete_slide),
        )
}

#[utoipa::path(
    get,
    path = "/api/hero-slides",
    params(AdminListQuery),
    responses(
        (status = 200, description = "Slides by sort order", body = [hero_slide::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "hero-slides",
    security((), ("bearer_auth" = []))
)]
pub async fn list_slides(
    State(app_state): State<AppState>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<hero_slide::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        HeroSlideService::list(&app_state.db, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/hero-slides/{id}",
    params(("id" = i32, Path, description = "Slide id"), AdminListQuery),
    responses(
        (status = 200, description = "Slide", body = hero_slide::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "hero-slides",
    security((), ("bearer_auth" = []))
)]
pub async fn get_slide(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<hero_slide::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        HeroSlideService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/hero-slides",
    request_body(content = HeroSlideForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Slide created", "slideId": 1})),
        (status = 400, description = "Missing image or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "hero-slides",
    security(("bearer_auth" = []))
)]
pub async fn create_slide(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<HeroSlideForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (fields, image) = form.data.into_fields()?;
    let image = IMAGE.require(image)?;

    let slide = HeroSlideService::create(&app_state.db, &app_state.uploads, fields, image).await?;
    Ok(created("Slide created", "slideId", slide.id))
}

/// Replace every text field; the image only changes when a new one is sent
#[utoipa::path(
    put,
    path = "/api/hero-slides/{id}",
    params(("id" = i32, Path, description = "Slide id")),
    request_body(content = HeroSlideForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated slide", body = hero_slide::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "hero-slides",
    security(("bearer_auth" = []))
)]
pub async fn update_slide(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<HeroSlideForm>,
) -> ApiResult<Json<hero_slide::Model>> {
    signed_in(user_claims)?;
    let (fields, image) = form.data.into_fields()?;
    let image = IMAGE.accept(image)?;

    let slide =
        HeroSlideService::update(&app_state.db, &app_state.uploads, id, fields, image).await?;
    Ok(Json(slide))
}

#[utoipa::path(
    delete,
    path = "/api/hero-slides/{id}",
    params(("id" = i32, Path, description = "Slide id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "hero-slides",
    security(("bearer_auth" = []))
)]
pub async fn delete_slide(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    HeroSlideService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Slide deleted")))
}

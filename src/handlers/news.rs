use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::news,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        news::{NewsForm, NewsQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, news::THUMBNAIL, NewsService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news).post(create_news))
        .route(
            "/{id}",
            get(get_news)
                .put(update_news)
                .patch(update_news)
                .delete(delete_news),
        )
}

/// List news, newest first
#[utoipa::path(
    get,
    path = "/api/news",
    params(NewsQuery),
    responses(
        (status = 200, description = "News items", body = [news::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "news",
    security((), ("bearer_auth" = []))
)]
pub async fn list_news(
    State(app_state): State<AppState>,
    Query(query): Query<NewsQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<news::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    let items = NewsService::list(&app_state.db, &query, include_hidden).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(("id" = i32, Path, description = "News id"), AdminListQuery),
    responses(
        (status = 200, description = "News item", body = news::Model),
        (status = 404, description = "Unknown id or unpublished", body = ApiErrorResponse)
    ),
    tag = "news",
    security((), ("bearer_auth" = []))
)]
pub async fn get_news(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<news::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(NewsService::get(&app_state.db, id, include_hidden).await?))
}

/// Create a news item with an optional thumbnail
#[utoipa::path(
    post,
    path = "/api/news",
    request_body(content = NewsForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "News created", "newsId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "news",
    security(("bearer_auth" = []))
)]
pub async fn create_news(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<NewsForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let claims = signed_in(user_claims)?;
    let (draft, thumbnail) = form.data.into_draft()?;
    let thumbnail = THUMBNAIL.accept(thumbnail)?;

    let item = NewsService::create(&app_state.db, &app_state.uploads, draft, thumbnail).await?;
    tracing::info!("News {} created by {}", item.id, claims.sub);
    Ok(created("News created", "newsId", item.id))
}

/// Update only the supplied fields; a new thumbnail replaces the old file
#[utoipa::path(
    put,
    path = "/api/news/{id}",
    params(("id" = i32, Path, description = "News id")),
    request_body(content = NewsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated item", body = news::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "news",
    security(("bearer_auth" = []))
)]
pub async fn update_news(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<NewsForm>,
) -> ApiResult<Json<news::Model>> {
    signed_in(user_claims)?;
    let (changes, thumbnail) = form.data.into_patch()?;
    let thumbnail = THUMBNAIL.accept(thumbnail)?;

    let item =
        NewsService::update(&app_state.db, &app_state.uploads, id, changes, thumbnail).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    params(("id" = i32, Path, description = "News id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "news",
    security(("bearer_auth" = []))
)]
pub async fn delete_news(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    NewsService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("News deleted")))
}

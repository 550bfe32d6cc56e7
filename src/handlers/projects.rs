use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::project,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        projects::{ProjectForm, ProjectQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, project::COVER, ProjectService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project)
                .put(update_project)
                .patch(update_project)
                .delete(delete_project),
        )
}

#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectQuery),
    responses(
        (status = 200, description = "Projects, newest first", body = [project::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "projects",
    security((), ("bearer_auth" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    Query(query): Query<ProjectQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<project::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        ProjectService::list(&app_state.db, &query, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = i32, Path, description = "Project id"), AdminListQuery),
    responses(
        (status = 200, description = "Project", body = project::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "projects",
    security((), ("bearer_auth" = []))
)]
pub async fn get_project(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<project::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        ProjectService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body(content = ProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Project created", "projectId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<ProjectForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (draft, cover) = form.data.into_draft()?;
    let cover = COVER.accept(cover)?;

    let project = ProjectService::create(&app_state.db, &app_state.uploads, draft, cover).await?;
    Ok(created("Project created", "projectId", project.id))
}

/// Update only the supplied fields; a new cover replaces the old file
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = i32, Path, description = "Project id")),
    request_body(content = ProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated project", body = project::Model),
        (status = 400, description = "Invalid field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<ProjectForm>,
) -> ApiResult<Json<project::Model>> {
    signed_in(user_claims)?;
    let (changes, cover) = form.data.into_patch()?;
    let cover = COVER.accept(cover)?;

    let project =
        ProjectService::update(&app_state.db, &app_state.uploads, id, changes, cover).await?;
    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    ProjectService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Project deleted")))
}

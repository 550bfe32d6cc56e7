use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{created, include_hidden, signed_in};
use crate::{
    entities::vacancy,
    errors::{ApiErrorResponse, ApiResult, Multipart},
    schemas::{
        vacancies::{VacancyForm, VacancyQuery},
        AdminListQuery, SuccessResponse,
    },
    services::{auth::Claims, vacancy::ATTACHMENT, VacancyService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vacancies).post(create_vacancy))
        .route(
            "/{id}",
            get(get_vacancy).put(update_vacancy).delete(delete_vacancy),
        )
}

#[utoipa::path(
    get,
    path = "/api/vacancies",
    params(VacancyQuery),
    responses(
        (status = 200, description = "Vacancies, newest first", body = [vacancy::Model]),
        (status = 401, description = "admin=true without a valid token", body = ApiErrorResponse)
    ),
    tag = "vacancies",
    security((), ("bearer_auth" = []))
)]
pub async fn list_vacancies(
    State(app_state): State<AppState>,
    Query(query): Query<VacancyQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<vacancy::Model>>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        VacancyService::list(&app_state.db, &query, include_hidden).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    params(("id" = i32, Path, description = "Vacancy id"), AdminListQuery),
    responses(
        (status = 200, description = "Vacancy", body = vacancy::Model),
        (status = 404, description = "Unknown id or inactive", body = ApiErrorResponse)
    ),
    tag = "vacancies",
    security((), ("bearer_auth" = []))
)]
pub async fn get_vacancy(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AdminListQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<vacancy::Model>> {
    let include_hidden = include_hidden(query.admin, &user_claims)?;
    Ok(Json(
        VacancyService::get(&app_state.db, id, include_hidden).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/vacancies",
    request_body(content = VacancyForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", example = json!({"message": "Vacancy created", "vacancyId": 1})),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse)
    ),
    tag = "vacancies",
    security(("bearer_auth" = []))
)]
pub async fn create_vacancy(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<VacancyForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    signed_in(user_claims)?;
    let (fields, attachment) = form.data.into_fields()?;
    let attachment = ATTACHMENT.accept(attachment)?;

    let vacancy =
        VacancyService::create(&app_state.db, &app_state.uploads, fields, attachment).await?;
    Ok(created("Vacancy created", "vacancyId", vacancy.id))
}

/// Replace every text field; omitted optional fields become empty
#[utoipa::path(
    put,
    path = "/api/vacancies/{id}",
    params(("id" = i32, Path, description = "Vacancy id")),
    request_body(content = VacancyForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated vacancy", body = vacancy::Model),
        (status = 400, description = "Missing field or rejected file", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "vacancies",
    security(("bearer_auth" = []))
)]
pub async fn update_vacancy(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    form: Multipart<VacancyForm>,
) -> ApiResult<Json<vacancy::Model>> {
    signed_in(user_claims)?;
    let (fields, attachment) = form.data.into_fields()?;
    let attachment = ATTACHMENT.accept(attachment)?;

    let vacancy =
        VacancyService::update(&app_state.db, &app_state.uploads, id, fields, attachment).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    delete,
    path = "/api/vacancies/{id}",
    params(("id" = i32, Path, description = "Vacancy id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "vacancies",
    security(("bearer_auth" = []))
)]
pub async fn delete_vacancy(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    signed_in(user_claims)?;
    VacancyService::delete(&app_state.db, &app_state.uploads, id).await?;
    Ok(Json(SuccessResponse::new("Vacancy deleted")))
}

use axum::{
    extract::{Extension, Path, State},
    routing::{get, put},
    Json, Router,
};
use validator::Validate;

use super::signed_in;
use crate::{
    entities::Role,
    errors::{ApiErrorResponse, ApiResult, JsonBody},
    schemas::{
        auth::{UpdateUserRequest, UserInfo},
        SuccessResponse,
    },
    services::{auth::Claims, UserService},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_users)).route(
        "/{id}",
        put(update_user).patch(update_user).delete(delete_user),
    )
}

fn super_admin(user_claims: Option<Extension<Claims>>) -> ApiResult<Claims> {
    let claims = signed_in(user_claims)?;
    claims.require_role(&[Role::SuperAdmin])?;
    Ok(claims)
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts, newest first", body = [UserInfo]),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a super admin", body = ApiErrorResponse)
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<Vec<UserInfo>>> {
    super_admin(user_claims)?;
    let users = UserService::list(&app_state.db).await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

/// Change the supplied fields of an account; a new password is re-hashed
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserInfo),
        (status = 400, description = "Invalid body", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a super admin", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse),
        (status = 409, description = "Username or email already in use", body = ApiErrorResponse)
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<UserInfo>> {
    super_admin(user_claims)?;
    request.validate()?;

    let user =
        UserService::update(&app_state.db, id, request, app_state.config.jwt.bcrypt_cost).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 400, description = "Attempt to delete one's own account", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a super admin", body = ApiErrorResponse),
        (status = 404, description = "Unknown id", body = ApiErrorResponse)
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    let claims = super_admin(user_claims)?;
    UserService::delete(&app_state.db, id, claims.id).await?;
    Ok(Json(SuccessResponse::new("User deleted")))
}

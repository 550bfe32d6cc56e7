use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use validator::Validate;

use super::{created, signed_in};
use crate::{
    entities::Role,
    errors::{ApiError, ApiErrorResponse, ApiResult, JsonBody},
    middleware::logging::get_real_ip,
    schemas::auth::{AuthToken, LoginRequest, RegisterRequest, UserInfo},
    services::{
        auth::{AuthService, Claims},
        UserService,
    },
    AppState,
};

/// Routes behind the access gate. Login is mounted separately, outside it.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/register", post(register))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    summary = "Log in",
    description = "Exchange a username (or email) and password for a JWT access token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthToken),
        (status = 400, description = "Username or password missing", body = ApiErrorResponse),
        (status = 401, description = "Invalid username or password", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    State(app_state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthToken>> {
    let login = request.username.trim();
    if login.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let config = &app_state.config;
    let user = UserService::authenticate(&app_state.db, login, &request.password).await?;

    let claims = Claims::for_user(&user, config.jwt.expiration);
    let access_token = AuthService::create_access_token(&claims, &config.jwt)?;

    tracing::info!(
        "{} logged in from {}",
        user.username,
        get_real_ip(&headers).unwrap_or_else(|| "unknown".to_string())
    );

    Ok(Json(AuthToken {
        access_token,
        expires_in: config.jwt.expiration,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The signed-in user", body = UserInfo),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 404, description = "Account no longer exists", body = ApiErrorResponse)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<UserInfo>> {
    let claims = signed_in(user_claims)?;
    let user = UserService::get(&app_state.db, claims.id).await?;
    Ok(Json(user.into()))
}

/// Create an account; super admins only
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created", example = json!({"message": "User created", "userId": 2})),
        (status = 400, description = "Invalid body", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a super admin", body = ApiErrorResponse),
        (status = 409, description = "Username or email already in use", body = ApiErrorResponse)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(app_state): State<AppState>,
    user_claims: Option<Extension<Claims>>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let claims = signed_in(user_claims)?;
    claims.require_role(&[Role::SuperAdmin])?;
    request.validate()?;

    let user =
        UserService::create(&app_state.db, request, app_state.config.jwt.bcrypt_cost).await?;
    Ok(created("User created", "userId", user.id))
}

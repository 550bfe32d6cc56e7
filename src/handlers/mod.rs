pub mod alerts;
pub mod auth;
pub mod directory;
pub mod documents;
pub mod gallery;
pub mod hero_slides;
pub mod news;
pub mod projects;
pub mod settings;
pub mod tenders;
pub mod users;
pub mod vacancies;
pub mod woredas;

use axum::{http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{
    errors::{ApiError, ApiResult},
    services::auth::Claims,
};

/// Claims placed by the access gate. Absent claims on a write route mean the
/// request never passed the gate.
pub(crate) fn signed_in(claims: Option<Extension<Claims>>) -> ApiResult<Claims> {
    claims
        .map(|Extension(claims)| claims)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
}

/// `?admin=true` bypasses the public visibility filter and needs a valid token
pub(crate) fn include_hidden(
    admin: Option<bool>,
    claims: &Option<Extension<Claims>>,
) -> ApiResult<bool> {
    match (admin.unwrap_or(false), claims) {
        (false, _) => Ok(false),
        (true, Some(_)) => Ok(true),
        (true, None) => Err(ApiError::Unauthorized(
            "admin listing requires a valid token".to_string(),
        )),
    }
}

/// 201 body carrying the new row id under a per-type key such as `tenderId`
pub(crate) fn created(message: &str, id_key: &str, id: i32) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "message": message, id_key: id })),
    )
}

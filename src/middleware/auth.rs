use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{errors::ApiError, services::auth::AuthService, AppState};

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Access gate in front of the content API.
///
/// A valid bearer token puts its `Claims` into the request extensions. Reads pass
/// through either way; mutating requests without valid claims stop here with 401.
/// Role checks are left to the handlers.
pub async fn access_gate(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .map(str::to_owned);

    let rejection = match token {
        Some(token) => match AuthService::verify_token(&token, &app_state.config.jwt) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                None
            }
            Err(reason) => Some(reason),
        },
        None => Some("Missing bearer token".to_string()),
    };

    if let Some(reason) = rejection {
        if is_mutating(req.method()) {
            return ApiError::Unauthorized(reason).into_response();
        }
    }

    next.run(req).await
}

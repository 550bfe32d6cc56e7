mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, Form, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_USERNAME};
use serde_json::json;

async fn login(app: &TestApp, username: &str, password: &str) -> axum::response::Response {
    app.json(
        Method::POST,
        "/api/auth/login",
        None,
        json!({ "username": username, "password": password }),
    )
    .await
}

#[tokio::test]
async fn bootstrap_admin_can_log_in_and_use_the_token() {
    let app = TestApp::spawn().await;

    let response = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "super_admin");
    assert_eq!(body["expires_in"], 3600);
    let token = body["access_token"].as_str().unwrap().to_string();

    let me = body_json(app.get("/api/auth/me", Some(&token)).await).await;
    assert_eq!(me["username"], ADMIN_USERNAME);
    assert_eq!(me["email"], ADMIN_EMAIL);
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn login_accepts_email_and_hides_which_part_was_wrong() {
    let app = TestApp::spawn().await;

    let by_email = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(by_email.status(), StatusCode::OK);

    let wrong_password = login(&app, ADMIN_USERNAME, "not-the-password").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = login(&app, "nobody", ADMIN_PASSWORD).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(
        body_json(wrong_password).await["error"],
        body_json(unknown_user).await["error"]
    );
}

#[tokio::test]
async fn writes_need_a_valid_token() {
    let app = TestApp::spawn().await;
    let form = || Form::new().text("title_en", "Hi").text("content_en", "Body");

    let anonymous = app.multipart(Method::POST, "/api/news", None, form()).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = app
        .multipart(Method::POST, "/api/news", Some("not-a-jwt"), form())
        .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let editor = app
        .multipart(Method::POST, "/api/news", Some(&app.editor()), form())
        .await;
    assert_eq!(editor.status(), StatusCode::CREATED);

    assert_eq!(
        app.delete("/api/news/1", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn roles_gate_registration_and_settings() {
    let app = TestApp::spawn().await;
    let new_user = json!({
        "username": "editor1",
        "email": "editor1@example.com",
        "password": "editor-password"
    });

    let response = app
        .json(
            Method::POST,
            "/api/auth/register",
            Some(&app.editor()),
            new_user.clone(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .json(
            Method::POST,
            "/api/auth/register",
            Some(&app.super_admin()),
            new_user.clone(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["userId"].is_i64());

    let duplicate = app
        .json(
            Method::POST,
            "/api/auth/register",
            Some(&app.super_admin()),
            new_user,
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let response = login(&app, "editor1", "editor-password").await;
    assert_eq!(body_json(response).await["user"]["role"], "editor");

    let settings = Form::new().text("office_name_en", "City Administration");
    let response = app
        .multipart(Method::PUT, "/api/settings", Some(&app.editor()), settings)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let settings = Form::new().text("office_name_en", "City Administration");
    let response = app
        .multipart(
            Method::PUT,
            "/api/settings",
            Some(&app.token(7, portal_api::entities::Role::Admin)),
            settings,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let public = body_json(app.get("/api/settings", None).await).await;
    assert_eq!(public["office_name_en"], "City Administration");
}

#[tokio::test]
async fn super_admin_cannot_delete_their_own_account() {
    let app = TestApp::spawn().await;

    let response = app.delete("/api/users/1", Some(&app.super_admin())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let users = body_json(app.get("/api/users", Some(&app.super_admin())).await).await;
    assert_eq!(users.as_array().unwrap().len(), 1);

    assert_eq!(
        app.get("/api/users", Some(&app.editor())).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/health", None).await.status(), StatusCode::OK);

    let doc = body_json(app.get("/openapi.json", None).await).await;
    assert!(doc["paths"].get("/api/tenders/{id}").is_some());
    assert!(doc["components"]["securitySchemes"]
        .get("bearer_auth")
        .is_some());
}

#[tokio::test]
async fn incomplete_login_body_is_a_json_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": ADMIN_USERNAME }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("password"));

    let response = app
        .json(
            Method::PATCH,
            "/api/users/1",
            Some(&app.super_admin()),
            json!({ "role": "janitor" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}

//! File lifecycle through the news endpoints: create with a thumbnail, replace it,
//! keep it across a text-only edit, and remove it with the row.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, Form, TestApp, PNG, PNG_V2};

fn news_form() -> Form {
    Form::new()
        .text("title_en", "Road works on Main Street")
        .text("content_en", "Lane closures start Monday.")
        .text("status", "published")
}

async fn create_news(app: &TestApp, token: &str) -> i64 {
    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            Some(token),
            news_form().file("thumbnail", "roadworks.png", "image/png", PNG),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "News created");
    json["newsId"].as_i64().unwrap()
}

async fn thumbnail_url(app: &TestApp, id: i64) -> String {
    let response = app.get(&format!("/api/news/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["thumbnail_url"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn uploaded_file_is_served_byte_for_byte() {
    let app = TestApp::spawn().await;
    let id = create_news(&app, &app.editor()).await;

    let url = thumbnail_url(&app, id).await;
    assert!(url.starts_with("/uploads/news-"));
    assert!(url.ends_with(".png"));

    let response = app.get(&url, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, PNG);
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn replacing_the_file_removes_the_old_one() {
    let app = TestApp::spawn().await;
    let token = app.editor();
    let id = create_news(&app, &token).await;
    let old_url = thumbnail_url(&app, id).await;

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/news/{id}"),
            Some(&token),
            Form::new().file("thumbnail", "second.png", "image/png", PNG_V2),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let new_url = body_json(response).await["thumbnail_url"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(new_url, old_url);

    assert_eq!(app.get(&old_url, None).await.status(), StatusCode::NOT_FOUND);
    let response = app.get(&new_url, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, PNG_V2);
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn text_only_update_keeps_the_file() {
    let app = TestApp::spawn().await;
    let token = app.editor();
    let id = create_news(&app, &token).await;
    let url = thumbnail_url(&app, id).await;

    let response = app
        .multipart(
            Method::PATCH,
            &format!("/api/news/{id}"),
            Some(&token),
            Form::new().text("title_en", "Road works postponed"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title_en"], "Road works postponed");
    assert_eq!(json["content_en"], "Lane closures start Monday.");
    assert_eq!(json["thumbnail_url"], url.as_str());

    assert_eq!(app.get(&url, None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_removes_row_and_file_once() {
    let app = TestApp::spawn().await;
    let token = app.editor();
    let id = create_news(&app, &token).await;
    let url = thumbnail_url(&app, id).await;

    let response = app.delete(&format!("/api/news/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        app.get(&format!("/api/news/{id}"), None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.get(&url, None).await.status(), StatusCode::NOT_FOUND);
    assert!(app.stored_files().is_empty());

    let again = app.delete(&format!("/api/news/{id}"), Some(&token)).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disguised_file_is_rejected_before_anything_is_written() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            Some(&app.editor()),
            news_form().file("thumbnail", "photo.png", "image/png", common::PDF),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.stored_files().is_empty());

    let list = body_json(app.get("/api/news?admin=true", Some(&app.editor())).await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_extension_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            Some(&app.editor()),
            news_form().file("thumbnail", "script.exe", "application/octet-stream", PNG),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("thumbnail"));
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn update_of_missing_item_writes_nothing() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::PUT,
            "/api/news/999",
            Some(&app.editor()),
            Form::new().file("thumbnail", "orphan.png", "image/png", PNG),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::spawn().await;
    let mut big = PNG.to_vec();
    big.resize(2 * 1024 * 1024, 0);

    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            Some(&app.editor()),
            news_form().file("thumbnail", "huge.png", "image/png", &big),
        )
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.stored_files().is_empty());
}

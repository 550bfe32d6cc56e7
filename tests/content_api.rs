//! Per-type update styles and visibility rules.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{body_bytes, body_json, Form, TestApp, PDF, PNG};
use serde_json::json;

#[tokio::test]
async fn document_put_overwrites_text_but_keeps_files() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/documents",
            Some(&token),
            Form::new()
                .text("title_en", "Annual budget")
                .text("description_en", "Fiscal year summary")
                .text("category", "finance")
                .file("file", "budget.pdf", "application/pdf", PDF),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["documentId"].as_i64().unwrap();

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/documents/{id}"),
            Some(&token),
            Form::new().text("title_en", "Annual budget (revised)"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["title_en"], "Annual budget (revised)");
    assert!(doc["description_en"].is_null());
    assert_eq!(doc["category"], "general");

    let file_url = doc["file_url"].as_str().unwrap();
    assert_eq!(body_bytes(app.get(file_url, None).await).await, PDF);
}

#[tokio::test]
async fn document_create_needs_a_file() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::POST,
            "/api/documents",
            Some(&app.editor()),
            Form::new().text("title_en", "No attachment"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_form_field_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::POST,
            "/api/news",
            Some(&app.editor()),
            Form::new()
                .text("title_en", "Hello")
                .text("content_en", "Body")
                .file("attachment", "extra.png", "image/png", PNG),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn directory_photos_land_in_their_subfolder() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::POST,
            "/api/directory",
            Some(&app.editor()),
            Form::new()
                .text("name_en", "Abebe Kebede")
                .text("department", "Finance")
                .file("photo", "abebe.png", "image/png", PNG),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["entryId"].as_i64().unwrap();

    let entry = body_json(app.get(&format!("/api/directory/{id}"), None).await).await;
    let url = entry["photo_url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/directory/staff-"));

    let files = app.stored_files();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("directory/"));
    assert_eq!(body_bytes(app.get(url, None).await).await, PNG);
}

#[tokio::test]
async fn news_drafts_are_admin_only() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    for (title, status) in [("Draft", "draft"), ("Live", "published")] {
        let response = app
            .multipart(
                Method::POST,
                "/api/news",
                Some(&token),
                Form::new()
                    .text("title_en", title)
                    .text("content_en", "Body")
                    .text("status", status),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let public = body_json(app.get("/api/news", None).await).await;
    let titles: Vec<_> = public
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title_en"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Live"]);

    let admin = body_json(app.get("/api/news?admin=true", Some(&token)).await).await;
    assert_eq!(admin.as_array().unwrap().len(), 2);

    assert_eq!(
        app.get("/api/news?admin=true", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn alerts_show_only_inside_their_window() {
    let app = TestApp::spawn().await;
    let token = app.editor();
    let now = Utc::now();

    let current = json!({ "message_en": "Office closed Friday", "level": "warning" });
    let upcoming = json!({
        "message_en": "Holiday schedule",
        "starts_at": now + Duration::days(3),
    });
    for body in [current, upcoming] {
        let response = app.json(Method::POST, "/api/alerts", Some(&token), body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let public = body_json(app.get("/api/alerts", None).await).await;
    let public = public.as_array().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["message_en"], "Office closed Friday");

    let admin = body_json(app.get("/api/alerts?admin=true", Some(&token)).await).await;
    assert_eq!(admin.as_array().unwrap().len(), 2);

    let inverted = json!({
        "message_en": "Backwards",
        "starts_at": now + Duration::days(2),
        "ends_at": now + Duration::days(1),
    });
    let response = app
        .json(Method::POST, "/api/alerts", Some(&token), inverted)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hero_slides_need_an_image_and_sort_ascending() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/hero-slides",
            Some(&token),
            Form::new().text("title_en", "No image"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for (title, order) in [("Second", "2"), ("First", "1")] {
        let response = app
            .multipart(
                Method::POST,
                "/api/hero-slides",
                Some(&token),
                Form::new()
                    .text("title_en", title)
                    .text("sort_order", order)
                    .file("image", "slide.png", "image/png", PNG),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let slides = body_json(app.get("/api/hero-slides", None).await).await;
    let titles: Vec<_> = slides
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title_en"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    for uri in [
        "/api/news/404",
        "/api/documents/404",
        "/api/tenders/404",
        "/api/vacancies/404",
        "/api/projects/404",
        "/api/gallery/404",
        "/api/directory/404",
        "/api/woredas/404",
        "/api/alerts/404",
        "/api/hero-slides/404",
    ] {
        assert_eq!(
            app.get(uri, None).await.status(),
            StatusCode::NOT_FOUND,
            "GET {uri}"
        );
        assert_eq!(
            app.delete(uri, Some(&token)).await.status(),
            StatusCode::NOT_FOUND,
            "DELETE {uri}"
        );
    }
}

#[tokio::test]
async fn alert_without_message_is_a_json_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .json(
            Method::POST,
            "/api/alerts",
            Some(&app.editor()),
            json!({ "level": "info" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("message_en"));

    let admin = body_json(app.get("/api/alerts?admin=true", Some(&app.editor())).await).await;
    assert!(admin.as_array().unwrap().is_empty());
}

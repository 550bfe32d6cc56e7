mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, Form, TestApp, PNG, PNG_V2};

fn woreda_form(name: &str, slug: &str) -> Form {
    Form::new().text("name_en", name).text("slug", slug)
}

#[tokio::test]
async fn duplicate_slug_is_rejected_and_leaves_no_files() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let first = app
        .multipart(
            Method::POST,
            "/api/woredas",
            Some(&token),
            woreda_form("Bole", "bole").file("logo", "logo.png", "image/png", PNG),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(app.stored_files().len(), 1);

    let second = app
        .multipart(
            Method::POST,
            "/api/woredas",
            Some(&token),
            woreda_form("Bole Two", "bole")
                .file("banner", "banner.png", "image/png", PNG_V2)
                .file("logo", "logo.png", "image/png", PNG),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["error"], "Slug already taken");
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn slug_lookup_respects_visibility() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/woredas",
            Some(&token),
            woreda_form("Kirkos", "kirkos").text("is_active", "false"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(
        app.get("/api/woredas/slug/kirkos", None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get("/api/woredas/slug/kirkos?admin=true", None)
            .await
            .status(),
        StatusCode::UNAUTHORIZED
    );

    let response = app
        .get("/api/woredas/slug/kirkos?admin=true", Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name_en"], "Kirkos");

    let public = body_json(app.get("/api/woredas", None).await).await;
    assert!(public.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn replacing_one_image_keeps_the_others() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/woredas",
            Some(&token),
            woreda_form("Lideta", "lideta")
                .file("banner", "banner.png", "image/png", PNG)
                .file("logo", "logo.png", "image/png", PNG),
        )
        .await;
    let id = body_json(response).await["woredaId"].as_i64().unwrap();
    let before = body_json(app.get(&format!("/api/woredas/{id}"), None).await).await;

    let response = app
        .multipart(
            Method::PATCH,
            &format!("/api/woredas/{id}"),
            Some(&token),
            Form::new().file("banner", "new-banner.png", "image/png", PNG_V2),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let after = body_json(response).await;

    assert_ne!(after["banner_url"], before["banner_url"]);
    assert_eq!(after["logo_url"], before["logo_url"]);
    assert_eq!(
        app.get(before["banner_url"].as_str().unwrap(), None)
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.stored_files().len(), 2);
}

#[tokio::test]
async fn deleting_a_woreda_removes_all_its_images() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/woredas",
            Some(&token),
            woreda_form("Yeka", "yeka")
                .file("banner", "banner.png", "image/png", PNG)
                .file("admin_photo", "admin.png", "image/png", PNG_V2),
        )
        .await;
    let id = body_json(response).await["woredaId"].as_i64().unwrap();
    assert_eq!(app.stored_files().len(), 2);

    let response = app.delete(&format!("/api/woredas/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.stored_files().is_empty());
}

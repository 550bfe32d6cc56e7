mod common;

use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, Form, TestApp, PDF, PDF_V2};

fn tender_form(ref_number: &str) -> Form {
    Form::new()
        .text("title_en", "Supply of office furniture")
        .text("ref_number", ref_number)
        .text("deadline", "2030-12-31")
}

#[tokio::test]
async fn tender_with_document_round_trip() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/tenders",
            Some(&token),
            tender_form("T-2024-001").file("document", "notice.pdf", "application/pdf", PDF),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Tender created");
    let id = created["tenderId"].as_i64().unwrap();

    let tender = body_json(app.get(&format!("/api/tenders/{id}"), None).await).await;
    assert_eq!(tender["status"], "Open");
    assert_eq!(tender["ref_number"], "T-2024-001");
    let first_url = tender["file_url"].as_str().unwrap().to_string();
    assert!(first_url.starts_with("/uploads/tender-"));
    assert!(first_url.ends_with(".pdf"));
    assert_eq!(body_bytes(app.get(&first_url, None).await).await, PDF);

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/tenders/{id}"),
            Some(&token),
            Form::new().file("document", "amended.pdf", "application/pdf", PDF_V2),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    let second_url = updated["file_url"].as_str().unwrap();
    assert_ne!(second_url, first_url);
    assert_eq!(updated["title_en"], "Supply of office furniture");

    assert_eq!(
        app.get(&first_url, None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(body_bytes(app.get(second_url, None).await).await, PDF_V2);
}

#[tokio::test]
async fn duplicate_reference_is_a_conflict_without_orphans() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let first = app
        .multipart(Method::POST, "/api/tenders", Some(&token), tender_form("T-1"))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .multipart(
            Method::POST,
            "/api/tenders",
            Some(&token),
            tender_form("T-1").file("document", "dup.pdf", "application/pdf", PDF),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(second).await["error"],
        "A tender with this reference number already exists"
    );
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn cancelled_tenders_are_hidden_from_the_public() {
    let app = TestApp::spawn().await;
    let token = app.editor();

    let response = app
        .multipart(
            Method::POST,
            "/api/tenders",
            Some(&token),
            tender_form("T-9").text("status", "Cancelled"),
        )
        .await;
    let id = body_json(response).await["tenderId"].as_i64().unwrap();

    let public = body_json(app.get("/api/tenders", None).await).await;
    assert!(public.as_array().unwrap().is_empty());
    assert_eq!(
        app.get(&format!("/api/tenders/{id}"), None).await.status(),
        StatusCode::NOT_FOUND
    );

    let admin = body_json(app.get("/api/tenders?admin=true", Some(&token)).await).await;
    assert_eq!(admin.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_deadline_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let response = app
        .multipart(
            Method::POST,
            "/api/tenders",
            Some(&app.editor()),
            Form::new()
                .text("title_en", "No deadline")
                .text("ref_number", "T-5"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "deadline is required");
}

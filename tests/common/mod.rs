#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

use portal_api::{
    config::{BootstrapAdmin, Config, DatabaseConfig, JwtConfig, ServerConfig, UploadConfig},
    create_app,
    entities::Role,
    services::auth::{AuthService, Claims},
    AppState,
};

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_EMAIL: &str = "root@example.com";
pub const ADMIN_PASSWORD: &str = "root-password";

/// Smallest file `infer` recognises as a PDF
pub const PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << >>\n%%EOF\n";
pub const PDF_V2: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Catalog /Version 2 >> endobj\n%%EOF\n";
/// PNG signature followed by an IHDR chunk header
pub const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89,
];
pub const PNG_V2: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x08, 0x06, 0x00, 0x00, 0x00, 0xF4,
    0x78, 0xD4, 0xFA,
];

/// A fresh app on its own SQLite file and upload directory
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    dir: TempDir,
}

pub fn test_config(dir: &Path) -> Config {
    Config {
        database: DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.join("portal.db").display()),
            min_connections: 1,
            max_connections: 5,
            connect_timeout: 5,
            acquire_timeout: 5,
            idle_timeout: 60,
            auto_migrate: true,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            public_base_url: None,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiration: 3600,
            bcrypt_cost: 4,
        },
        uploads: UploadConfig {
            dir: dir.join("uploads"),
            max_bytes: 1024 * 1024,
        },
        bootstrap: Some(BootstrapAdmin {
            username: ADMIN_USERNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_config(test_config(dir.path())).await.unwrap();
        let router = create_app(state.clone());
        Self { router, state, dir }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Every file under the upload root, relative to it
    pub fn stored_files(&self) -> Vec<String> {
        fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    let rel = path.strip_prefix(root).unwrap();
                    out.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        let mut files = Vec::new();
        walk(&self.upload_dir(), &self.upload_dir(), &mut files);
        files.sort();
        files
    }

    pub fn token(&self, id: i32, role: Role) -> String {
        let claims = Claims {
            sub: format!("user{id}"),
            id,
            role,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        AuthService::create_access_token(&claims, &self.state.config.jwt).unwrap()
    }

    /// The seeded super admin has id 1
    pub fn super_admin(&self) -> String {
        self.token(1, Role::SuperAdmin)
    }

    pub fn editor(&self) -> String {
        self.token(42, Role::Editor)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(build(Method::GET, uri, token, None, Body::empty()))
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(build(Method::DELETE, uri, token, None, Body::empty()))
            .await
    }

    pub async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(build(
            method,
            uri,
            token,
            Some("application/json".to_string()),
            Body::from(body.to_string()),
        ))
        .await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        form: Form,
    ) -> Response {
        let (content_type, body) = form.finish();
        self.send(build(method, uri, token, Some(content_type), Body::from(body)))
            .await
    }
}

fn build(
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<String>,
    body: Body,
) -> Request<Body> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    request.body(body).unwrap()
}

/// Hand-built multipart/form-data body
pub struct Form {
    boundary: String,
    buf: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self {
            boundary: "portal-test-boundary-7d9f".to_string(),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, contents: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(contents);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.buf,
        )
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

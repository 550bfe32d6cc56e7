pub mod config;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod schemas;
pub mod services;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::{
    alerts, auth, directory, documents, gallery, hero_slides, news, projects, settings, tenders,
    users, vacancies, woredas,
};
use crate::middleware::{access_gate, simple_http_logging_middleware};
use crate::services::auth::SecurityAddon;
use crate::services::database::{establish_connection, DatabaseConnection};
use crate::services::schema::ensure_schema;
use crate::services::upload::PUBLIC_PREFIX;
use crate::services::{UploadStore, UserService};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::me,
        auth::register,
        users::list_users,
        users::update_user,
        users::delete_user,
        news::list_news,
        news::get_news,
        news::create_news,
        news::update_news,
        news::delete_news,
        documents::list_documents,
        documents::get_document,
        documents::create_document,
        documents::update_document,
        documents::delete_document,
        tenders::list_tenders,
        tenders::get_tender,
        tenders::create_tender,
        tenders::update_tender,
        tenders::delete_tender,
        vacancies::list_vacancies,
        vacancies::get_vacancy,
        vacancies::create_vacancy,
        vacancies::update_vacancy,
        vacancies::delete_vacancy,
        projects::list_projects,
        projects::get_project,
        projects::create_project,
        projects::update_project,
        projects::delete_project,
        gallery::list_gallery,
        gallery::get_gallery_item,
        gallery::create_gallery_item,
        gallery::update_gallery_item,
        gallery::delete_gallery_item,
        directory::list_directory,
        directory::get_entry,
        directory::create_entry,
        directory::update_entry,
        directory::delete_entry,
        woredas::list_woredas,
        woredas::get_woreda,
        woredas::get_woreda_by_slug,
        woredas::create_woreda,
        woredas::update_woreda,
        woredas::delete_woreda,
        alerts::list_alerts,
        alerts::get_alert,
        alerts::create_alert,
        alerts::update_alert,
        alerts::delete_alert,
        hero_slides::list_slides,
        hero_slides::get_slide,
        hero_slides::create_slide,
        hero_slides::update_slide,
        hero_slides::delete_slide,
        settings::get_settings,
        settings::update_settings
    ),
    components(
        schemas(
            schemas::auth::LoginRequest,
            schemas::auth::AuthToken,
            schemas::auth::UserInfo,
            schemas::auth::RegisterRequest,
            schemas::auth::UpdateUserRequest,
            schemas::alerts::AlertRequest,
            schemas::news::NewsForm,
            schemas::documents::DocumentForm,
            schemas::tenders::TenderForm,
            schemas::vacancies::VacancyForm,
            schemas::projects::ProjectForm,
            schemas::gallery::GalleryForm,
            schemas::directory::DirectoryForm,
            schemas::woredas::WoredaForm,
            schemas::hero_slides::HeroSlideForm,
            schemas::settings::SettingsForm,
            schemas::SuccessResponse,
            schemas::CreatedResponse,
            entities::news::Model,
            entities::document::Model,
            entities::tender::Model,
            entities::vacancy::Model,
            entities::project::Model,
            entities::gallery_item::Model,
            entities::directory_entry::Model,
            entities::woreda::Model,
            entities::alert::Model,
            entities::hero_slide::Model,
            entities::office_setting::Model,
            entities::Role,
            entities::NewsStatus,
            entities::TenderStatus,
            entities::VacancyStatus,
            entities::ProjectStatus,
            entities::AlertLevel,
            crate::errors::ApiErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and account registration"),
        (name = "users", description = "Account administration"),
        (name = "news", description = "News articles"),
        (name = "documents", description = "Downloadable documents"),
        (name = "tenders", description = "Procurement notices"),
        (name = "vacancies", description = "Job postings"),
        (name = "projects", description = "Development projects"),
        (name = "gallery", description = "Photo gallery"),
        (name = "directory", description = "Staff directory"),
        (name = "woredas", description = "Sub-district pages"),
        (name = "alerts", description = "Site-wide banner alerts"),
        (name = "hero-slides", description = "Home page carousel"),
        (name = "settings", description = "Office-wide settings")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        Self::from_config(Config::from_env()?).await
    }

    /// Connects, prepares the schema and upload root, then seeds the first admin
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let db = establish_connection(&config.database)
            .await
            .context("Failed to connect to the database")?;

        if config.database.auto_migrate {
            ensure_schema(&db).await.context("Failed to create tables")?;
        }

        let state = Self::from_parts(db, config);
        state
            .uploads
            .ensure_root()
            .await
            .with_context(|| format!("Cannot create {}", state.uploads.root().display()))?;

        if let Some(admin) = &state.config.bootstrap {
            UserService::ensure_bootstrap_admin(&state.db, admin, state.config.jwt.bcrypt_cost)
                .await
                .context("Failed to seed the super admin")?;
        }

        Ok(state)
    }

    pub fn from_parts(db: DatabaseConnection, config: Config) -> Self {
        let uploads = Arc::new(UploadStore::new(config.uploads.dir.clone()));
        Self {
            db,
            config: Arc::new(config),
            uploads,
        }
    }
}

/// Slow requests are cut off with a 408
fn request_timeout(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

pub fn create_app(app_state: AppState) -> Router {
    let config = app_state.config.clone();

    let api = Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/news", news::router())
        .nest("/api/documents", documents::router())
        .nest("/api/tenders", tenders::router())
        .nest("/api/vacancies", vacancies::router())
        .nest("/api/projects", projects::router())
        .nest("/api/gallery", gallery::router())
        .nest("/api/directory", directory::router())
        .nest("/api/woredas", woredas::router())
        .nest("/api/alerts", alerts::router())
        .nest("/api/hero-slides", hero_slides::router())
        .nest("/api/settings", settings::router())
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            access_gate,
        ));

    Router::new()
        .merge(api)
        // Login stays outside the gate
        .route("/api/auth/login", post(auth::login))
        .nest_service(PUBLIC_PREFIX, ServeDir::new(app_state.uploads.root()))
        .route("/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.uploads.max_bytes))
        .layer(request_timeout(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(axum_middleware::from_fn(simple_http_logging_middleware))
        .layer(CorsLayer::permissive())
}

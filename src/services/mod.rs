pub mod alert;
pub mod auth;
pub mod database;
pub mod directory;
pub mod document;
pub mod gallery;
pub mod hero_slide;
pub mod news;
pub mod project;
pub mod schema;
pub mod settings;
pub mod tender;
pub mod upload;
pub mod user;
pub mod vacancy;
pub mod woreda;

pub use alert::AlertService;
pub use directory::DirectoryService;
pub use document::DocumentService;
pub use gallery::GalleryService;
pub use hero_slide::HeroSlideService;
pub use news::NewsService;
pub use project::ProjectService;
pub use settings::SettingsService;
pub use tender::TenderService;
pub use upload::{UploadRule, UploadStore};
pub use user::UserService;
pub use vacancy::VacancyService;
pub use woreda::WoredaService;

use sea_orm::{ActiveValue, DbErr, DeleteResult, Value};

use crate::errors::ApiError;

/// A row vanishing between read and write is reported as not found
pub(crate) fn write_err(err: DbErr, not_found: &str) -> ApiError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            ApiError::NotFound(not_found.to_string())
        }
        other => other.into(),
    }
}

pub(crate) const UNKNOWN_WOREDA: &str = "woreda_id does not exist";

/// Insert failure on a row that may point at a woreda
pub(crate) fn linked_insert_err(err: DbErr) -> ApiError {
    ApiError::reference_or_db(err, UNKNOWN_WOREDA)
}

/// Update failure on a row that may point at a woreda
pub(crate) fn linked_write_err(err: DbErr, not_found: &str) -> ApiError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => write_err(err, not_found),
        other => linked_insert_err(other),
    }
}

pub(crate) fn ensure_deleted(result: DeleteResult, not_found: &str) -> Result<(), ApiError> {
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(not_found.to_string()));
    }
    Ok(())
}

/// Overwrites `slot` when the patch carries a value
pub(crate) fn patch<V>(slot: &mut ActiveValue<V>, value: Option<V>)
where
    V: Into<Value>,
{
    if let Some(value) = value {
        *slot = ActiveValue::Set(value);
    }
}

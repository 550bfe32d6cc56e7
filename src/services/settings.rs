use chrono::Utc;
use sea_orm::*;

use super::patch;
use super::upload::{PendingUpload, UploadRule, UploadStore};
use crate::{
    entities::{
        office_setting::{self, SINGLETON_ID},
        prelude::OfficeSetting,
    },
    errors::{ApiError, ApiResult},
    schemas::settings::SettingsPatch,
    services::database::DatabaseConnection,
};

pub const LOGO: UploadRule = UploadRule::image("logo", "office-logo");

pub struct SettingsService;

impl SettingsService {
    /// The stored row, or an empty placeholder before the first save
    pub async fn get(db: &DatabaseConnection) -> ApiResult<office_setting::Model> {
        Ok(OfficeSetting::find_by_id(SINGLETON_ID)
            .one(db.as_ref())
            .await?
            .unwrap_or_else(office_setting::Model::placeholder))
    }

    /// Patches the singleton row, inserting it on the first save
    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        changes: SettingsPatch,
        logo: Option<PendingUpload>,
    ) -> ApiResult<office_setting::Model> {
        let existing = OfficeSetting::find_by_id(SINGLETON_ID)
            .one(db.as_ref())
            .await?;

        if existing.is_none() && changes.office_name_en.is_none() {
            return Err(ApiError::Validation(
                "office_name_en is required for the first save".to_string(),
            ));
        }
        let old_logo = existing.as_ref().and_then(|s| s.logo_url.clone());
        let inserting = existing.is_none();

        let mut settings: office_setting::ActiveModel = match existing {
            Some(row) => row.into(),
            None => office_setting::Model::placeholder()
                .into_active_model()
                .reset_all(),
        };
        patch(&mut settings.office_name_en, changes.office_name_en);
        patch(&mut settings.office_name_am, changes.office_name_am);
        patch(&mut settings.office_name_or, changes.office_name_or);
        patch(&mut settings.address_en, changes.address_en);
        patch(&mut settings.address_am, changes.address_am);
        patch(&mut settings.address_or, changes.address_or);
        patch(&mut settings.phone, changes.phone);
        patch(&mut settings.email, changes.email);
        patch(&mut settings.working_hours_en, changes.working_hours_en);
        patch(&mut settings.facebook_url, changes.facebook_url);
        patch(&mut settings.telegram_url, changes.telegram_url);
        patch(&mut settings.map_embed_url, changes.map_embed_url);

        let mut batch = uploads.batch();
        let new_logo = batch.write(logo).await?;
        let replaced = new_logo.is_some();
        patch(&mut settings.logo_url, new_logo.map(Some));
        settings.updated_at = Set(Utc::now());

        let result = if inserting {
            settings.insert(db.as_ref()).await
        } else {
            settings.update(db.as_ref()).await
        }
        .map_err(ApiError::from);
        let saved = batch.settle(result).await?;

        if replaced {
            uploads.discard(old_logo.as_deref()).await;
        }
        tracing::info!("Office settings saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_row_reads_as_placeholder() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<office_setting::Model>::new()])
                .into_connection(),
        );

        let settings = SettingsService::get(&db).await.unwrap();
        assert_eq!(settings.id, SINGLETON_ID);
        assert!(settings.office_name_en.is_empty());
    }

    #[tokio::test]
    async fn first_save_needs_an_office_name() {
        let dir = tempfile::tempdir().unwrap();
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<office_setting::Model>::new()])
                .into_connection(),
        );

        let err = SettingsService::update(
            &db,
            &UploadStore::new(dir.path()),
            SettingsPatch::default(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, patch, write_err};
use crate::{
    entities::{prelude::Woreda, woreda},
    errors::{ApiError, ApiResult},
    schemas::woredas::{WoredaDraft, WoredaPatch},
    services::database::DatabaseConnection,
};

pub const BANNER: UploadRule = UploadRule::image("banner", "woreda-banner");
pub const LOGO: UploadRule = UploadRule::image("logo", "woreda-logo");
pub const ADMIN_PHOTO: UploadRule = UploadRule::image("admin_photo", "woreda-admin");

const NOT_FOUND: &str = "Woreda not found";
const SLUG_TAKEN: &str = "Slug already taken";

#[derive(Default)]
pub struct WoredaUploads {
    pub banner: Option<PendingUpload>,
    pub logo: Option<PendingUpload>,
    pub admin_photo: Option<PendingUpload>,
}

pub struct WoredaService;

impl WoredaService {
    pub async fn list(
        db: &DatabaseConnection,
        include_hidden: bool,
    ) -> ApiResult<Vec<woreda::Model>> {
        let mut select = Woreda::find();

        if !include_hidden {
            select = select.filter(woreda::Column::IsActive.eq(true));
        }

        Ok(select
            .order_by_asc(woreda::Column::SortOrder)
            .order_by_asc(woreda::Column::NameEn)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<woreda::Model> {
        let woreda = Self::find_any(db, id).await?;
        visible(woreda, include_hidden)
    }

    pub async fn get_by_slug(
        db: &DatabaseConnection,
        slug: &str,
        include_hidden: bool,
    ) -> ApiResult<woreda::Model> {
        let woreda = Woreda::find()
            .filter(woreda::Column::Slug.eq(slug))
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        visible(woreda, include_hidden)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<woreda::Model> {
        Woreda::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        draft: WoredaDraft,
        files: WoredaUploads,
    ) -> ApiResult<woreda::Model> {
        let mut batch = uploads.batch();
        let banner_url = batch.write(files.banner).await?;
        let logo_url = batch.write(files.logo).await?;
        let admin_photo_url = batch.write(files.admin_photo).await?;

        let now = Utc::now();
        let result = woreda::ActiveModel {
            name_en: Set(draft.name_en),
            name_am: Set(draft.name_am),
            name_or: Set(draft.name_or),
            slug: Set(draft.slug),
            description_en: Set(draft.description_en),
            description_am: Set(draft.description_am),
            description_or: Set(draft.description_or),
            population: Set(draft.population),
            admin_name: Set(draft.admin_name),
            admin_photo_url: Set(admin_photo_url),
            banner_url: Set(banner_url),
            logo_url: Set(logo_url),
            phone: Set(draft.phone),
            email: Set(draft.email),
            sort_order: Set(draft.sort_order),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .map_err(|e| ApiError::conflict_or_db(e, SLUG_TAKEN));

        batch.settle(result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        changes: WoredaPatch,
        files: WoredaUploads,
    ) -> ApiResult<woreda::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_banner = existing.banner_url.clone();
        let old_logo = existing.logo_url.clone();
        let old_admin_photo = existing.admin_photo_url.clone();

        let mut woreda: woreda::ActiveModel = existing.into();
        patch(&mut woreda.name_en, changes.name_en);
        patch(&mut woreda.name_am, changes.name_am);
        patch(&mut woreda.name_or, changes.name_or);
        patch(&mut woreda.slug, changes.slug);
        patch(&mut woreda.description_en, changes.description_en);
        patch(&mut woreda.description_am, changes.description_am);
        patch(&mut woreda.description_or, changes.description_or);
        patch(&mut woreda.population, changes.population);
        patch(&mut woreda.admin_name, changes.admin_name);
        patch(&mut woreda.phone, changes.phone);
        patch(&mut woreda.email, changes.email);
        patch(&mut woreda.sort_order, changes.sort_order);
        patch(&mut woreda.is_active, changes.is_active);

        let mut batch = uploads.batch();
        let new_banner = batch.write(files.banner).await?;
        let new_logo = batch.write(files.logo).await?;
        let new_admin_photo = batch.write(files.admin_photo).await?;

        let superseded: Vec<Option<String>> = [
            (new_banner.is_some(), old_banner),
            (new_logo.is_some(), old_logo),
            (new_admin_photo.is_some(), old_admin_photo),
        ]
        .into_iter()
        .filter_map(|(replaced, old)| replaced.then_some(old))
        .collect();

        patch(&mut woreda.banner_url, new_banner.map(Some));
        patch(&mut woreda.logo_url, new_logo.map(Some));
        patch(&mut woreda.admin_photo_url, new_admin_photo.map(Some));
        woreda.updated_at = Set(Utc::now());

        let result = woreda.update(db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => write_err(e, NOT_FOUND),
            other => ApiError::conflict_or_db(other, SLUG_TAKEN),
        });
        let updated = batch.settle(result).await?;

        for old in &superseded {
            uploads.discard(old.as_deref()).await;
        }
        Ok(updated)
    }

    /// Projects, gallery items and directory entries keep their rows with `woreda_id` set to NULL
    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = Woreda::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(existing.banner_url.as_deref()).await;
        uploads.discard(existing.logo_url.as_deref()).await;
        uploads.discard(existing.admin_photo_url.as_deref()).await;
        Ok(())
    }
}

fn visible(woreda: woreda::Model, include_hidden: bool) -> ApiResult<woreda::Model> {
    if !include_hidden && !woreda.is_active {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(woreda)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn kemise(is_active: bool) -> woreda::Model {
        let now = Utc::now();
        woreda::Model {
            id: 3,
            name_en: "Kemise".to_string(),
            name_am: None,
            name_or: None,
            slug: "kemise".to_string(),
            description_en: None,
            description_am: None,
            description_or: None,
            population: Some(42_000),
            admin_name: None,
            admin_photo_url: None,
            banner_url: None,
            logo_url: None,
            phone: None,
            email: None,
            sort_order: 0,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn slug_lookup_respects_visibility() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![kemise(false)], vec![kemise(false)]])
                .into_connection(),
        );

        assert!(matches!(
            WoredaService::get_by_slug(&db, "kemise", false).await,
            Err(ApiError::NotFound(_))
        ));
        let found = WoredaService::get_by_slug(&db, "kemise", true).await.unwrap();
        assert_eq!(found.slug, "kemise");
    }

    #[tokio::test]
    async fn only_the_public_list_filters_on_is_active() {
        for (include_hidden, filtered) in [(false, true), (true, false)] {
            let db: DatabaseConnection = Arc::new(
                MockDatabase::new(DatabaseBackend::MySql)
                    .append_query_results([vec![kemise(true)]])
                    .into_connection(),
            );

            let rows = WoredaService::list(&db, include_hidden).await.unwrap();
            assert_eq!(rows.len(), 1);

            let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
            let sql = &log[0].statements()[0].sql;
            assert_eq!(sql.contains("`is_active`"), filtered, "{sql}");
            assert!(sql.contains("ORDER BY `woredas`.`sort_order` ASC"), "{sql}");
        }
    }

    #[tokio::test]
    async fn update_of_missing_woreda_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path());
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<woreda::Model>::new()])
                .into_connection(),
        );

        let err = WoredaService::update(
            &db,
            &uploads,
            99,
            WoredaPatch::default(),
            WoredaUploads::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

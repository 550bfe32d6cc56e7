use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, linked_insert_err, linked_write_err, patch};
use crate::{
    entities::{directory_entry, prelude::DirectoryEntry},
    errors::{ApiError, ApiResult},
    schemas::directory::{DirectoryFields, DirectoryQuery},
    services::database::DatabaseConnection,
};

/// Staff photos live in their own folder under the upload root
pub const PHOTO: UploadRule = UploadRule::image("photo", "staff").in_subfolder("directory");

const NOT_FOUND: &str = "Directory entry not found";

pub struct DirectoryService;

impl DirectoryService {
    pub async fn list(
        db: &DatabaseConnection,
        query: &DirectoryQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<directory_entry::Model>> {
        let mut select = DirectoryEntry::find();

        if !include_hidden {
            select = select.filter(directory_entry::Column::IsActive.eq(true));
        }
        if let Some(department) = &query.department {
            select = select.filter(directory_entry::Column::Department.eq(department.as_str()));
        }
        if let Some(woreda_id) = query.woreda_id {
            select = select.filter(directory_entry::Column::WoredaId.eq(woreda_id));
        }

        Ok(select
            .order_by_asc(directory_entry::Column::SortOrder)
            .order_by_asc(directory_entry::Column::NameEn)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<directory_entry::Model> {
        let entry = Self::find_any(db, id).await?;
        if !include_hidden && !entry.is_active {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(entry)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<directory_entry::Model> {
        DirectoryEntry::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        fields: DirectoryFields,
        photo: Option<PendingUpload>,
    ) -> ApiResult<directory_entry::Model> {
        let mut batch = uploads.batch();
        let photo_url = batch.write(photo).await?;

        let now = Utc::now();
        let mut entry = directory_entry::ActiveModel {
            photo_url: Set(photo_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        assign(&mut entry, fields);

        let result = entry.insert(db.as_ref()).await.map_err(linked_insert_err);
        batch.settle(result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        fields: DirectoryFields,
        photo: Option<PendingUpload>,
    ) -> ApiResult<directory_entry::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_photo = existing.photo_url.clone();

        let mut entry: directory_entry::ActiveModel = existing.into();
        assign(&mut entry, fields);

        let mut batch = uploads.batch();
        let new_photo = batch.write(photo).await?;
        let replaced = new_photo.is_some();
        patch(&mut entry.photo_url, new_photo.map(Some));
        entry.updated_at = Set(Utc::now());

        let result = entry
            .update(db.as_ref())
            .await
            .map_err(|e| linked_write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(old_photo.as_deref()).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = DirectoryEntry::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(existing.photo_url.as_deref()).await;
        Ok(())
    }
}

fn assign(entry: &mut directory_entry::ActiveModel, fields: DirectoryFields) {
    entry.name_en = Set(fields.name_en);
    entry.name_am = Set(fields.name_am);
    entry.name_or = Set(fields.name_or);
    entry.position_en = Set(fields.position_en);
    entry.position_am = Set(fields.position_am);
    entry.position_or = Set(fields.position_or);
    entry.department = Set(fields.department);
    entry.phone = Set(fields.phone);
    entry.email = Set(fields.email);
    entry.woreda_id = Set(fields.woreda_id);
    entry.sort_order = Set(fields.sort_order);
    entry.is_active = Set(fields.is_active);
}

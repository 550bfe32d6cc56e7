use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, patch, write_err};
use crate::{
    entities::{document, prelude::Document},
    errors::{ApiError, ApiResult},
    schemas::documents::{DocumentFields, DocumentQuery},
    services::database::DatabaseConnection,
};

pub const FILE: UploadRule = UploadRule::document("file", "document");
pub const COVER: UploadRule = UploadRule::image("cover", "document-cover");

const NOT_FOUND: &str = "Document not found";

pub struct DocumentUploads {
    pub file: Option<PendingUpload>,
    pub cover: Option<PendingUpload>,
}

pub struct DocumentService;

impl DocumentService {
    pub async fn list(
        db: &DatabaseConnection,
        query: &DocumentQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<document::Model>> {
        let mut select = Document::find();

        if !include_hidden {
            select = select.filter(document::Column::IsActive.eq(true));
        }
        if let Some(category) = &query.category {
            select = select.filter(document::Column::Category.eq(category.as_str()));
        }

        Ok(select
            .order_by_desc(document::Column::CreatedAt)
            .order_by_desc(document::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<document::Model> {
        let doc = Self::find_any(db, id).await?;
        if !include_hidden && !doc.is_active {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(doc)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<document::Model> {
        Document::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    /// The document file itself is mandatory, the cover is not
    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        fields: DocumentFields,
        file: PendingUpload,
        cover: Option<PendingUpload>,
    ) -> ApiResult<document::Model> {
        let mut batch = uploads.batch();
        let file_url = batch.write_one(file).await?;
        let cover_url = batch.write(cover).await?;

        let now = Utc::now();
        let result = document::ActiveModel {
            title_en: Set(fields.title_en),
            title_am: Set(fields.title_am),
            title_or: Set(fields.title_or),
            description_en: Set(fields.description_en),
            description_am: Set(fields.description_am),
            description_or: Set(fields.description_or),
            category: Set(fields.category),
            file_url: Set(file_url),
            cover_image_url: Set(cover_url),
            is_active: Set(fields.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .map_err(ApiError::from);

        batch.settle(result).await
    }

    /// Full replacement of the text fields; files only change when new ones are sent
    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        fields: DocumentFields,
        files: DocumentUploads,
    ) -> ApiResult<document::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_file = existing.file_url.clone();
        let old_cover = existing.cover_image_url.clone();

        let mut doc: document::ActiveModel = existing.into();
        doc.title_en = Set(fields.title_en);
        doc.title_am = Set(fields.title_am);
        doc.title_or = Set(fields.title_or);
        doc.description_en = Set(fields.description_en);
        doc.description_am = Set(fields.description_am);
        doc.description_or = Set(fields.description_or);
        doc.category = Set(fields.category);
        doc.is_active = Set(fields.is_active);

        let mut batch = uploads.batch();
        let new_file = batch.write(files.file).await?;
        let new_cover = batch.write(files.cover).await?;
        let file_replaced = new_file.is_some();
        let cover_replaced = new_cover.is_some();
        patch(&mut doc.file_url, new_file);
        patch(&mut doc.cover_image_url, new_cover.map(Some));
        doc.updated_at = Set(Utc::now());

        let result = doc
            .update(db.as_ref())
            .await
            .map_err(|e| write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if file_replaced {
            uploads.discard(Some(&old_file)).await;
        }
        if cover_replaced {
            uploads.discard(old_cover.as_deref()).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = Document::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(Some(&existing.file_url)).await;
        uploads.discard(existing.cover_image_url.as_deref()).await;
        Ok(())
    }
}

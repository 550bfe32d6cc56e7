use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, linked_insert_err, linked_write_err, patch};
use crate::{
    entities::{gallery_item, prelude::GalleryItem},
    errors::{ApiError, ApiResult},
    schemas::gallery::{GalleryDraft, GalleryPatch, GalleryQuery},
    services::database::DatabaseConnection,
};

pub const IMAGE: UploadRule = UploadRule::image("image", "gallery");

const NOT_FOUND: &str = "Gallery item not found";

pub struct GalleryService;

impl GalleryService {
    pub async fn list(
        db: &DatabaseConnection,
        query: &GalleryQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<gallery_item::Model>> {
        let mut select = GalleryItem::find();

        if !include_hidden {
            select = select.filter(gallery_item::Column::IsActive.eq(true));
        }
        if let Some(category) = &query.category {
            select = select.filter(gallery_item::Column::Category.eq(category.as_str()));
        }
        if let Some(woreda_id) = query.woreda_id {
            select = select.filter(gallery_item::Column::WoredaId.eq(woreda_id));
        }

        Ok(select
            .order_by_asc(gallery_item::Column::SortOrder)
            .order_by_desc(gallery_item::Column::CreatedAt)
            .order_by_desc(gallery_item::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<gallery_item::Model> {
        let item = Self::find_any(db, id).await?;
        if !include_hidden && !item.is_active {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(item)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<gallery_item::Model> {
        GalleryItem::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        draft: GalleryDraft,
        image: PendingUpload,
    ) -> ApiResult<gallery_item::Model> {
        let mut batch = uploads.batch();
        let image_url = batch.write_one(image).await?;

        let result = gallery_item::ActiveModel {
            title_en: Set(draft.title_en),
            title_am: Set(draft.title_am),
            title_or: Set(draft.title_or),
            image_url: Set(image_url),
            category: Set(draft.category),
            woreda_id: Set(draft.woreda_id),
            sort_order: Set(draft.sort_order),
            is_active: Set(draft.is_active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .map_err(linked_insert_err);

        batch.settle(result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        changes: GalleryPatch,
        image: Option<PendingUpload>,
    ) -> ApiResult<gallery_item::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_image = existing.image_url.clone();

        let mut item: gallery_item::ActiveModel = existing.into();
        patch(&mut item.title_en, changes.title_en);
        patch(&mut item.title_am, changes.title_am);
        patch(&mut item.title_or, changes.title_or);
        patch(&mut item.category, changes.category);
        patch(&mut item.woreda_id, changes.woreda_id);
        patch(&mut item.sort_order, changes.sort_order);
        patch(&mut item.is_active, changes.is_active);

        let mut batch = uploads.batch();
        let new_image = batch.write(image).await?;
        let replaced = new_image.is_some();
        patch(&mut item.image_url, new_image);

        // nothing changed: the row is already what the caller asked for
        if !item.is_changed() {
            return batch.settle(item.try_into_model().map_err(ApiError::from)).await;
        }

        let result = item
            .update(db.as_ref())
            .await
            .map_err(|e| linked_write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(Some(&old_image)).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = GalleryItem::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(Some(&existing.image_url)).await;
        Ok(())
    }
}

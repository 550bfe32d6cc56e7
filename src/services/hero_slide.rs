use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, patch, write_err};
use crate::{
    entities::{hero_slide, prelude::HeroSlide},
    errors::{ApiError, ApiResult},
    schemas::hero_slides::HeroSlideFields,
    services::database::DatabaseConnection,
};

pub const IMAGE: UploadRule = UploadRule::image("image", "hero");

const NOT_FOUND: &str = "Hero slide not found";

pub struct HeroSlideService;

impl HeroSlideService {
    pub async fn list(
        db: &DatabaseConnection,
        include_hidden: bool,
    ) -> ApiResult<Vec<hero_slide::Model>> {
        let mut select = HeroSlide::find();
        if !include_hidden {
            select = select.filter(hero_slide::Column::IsActive.eq(true));
        }

        Ok(select
            .order_by_asc(hero_slide::Column::SortOrder)
            .order_by_asc(hero_slide::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<hero_slide::Model> {
        let slide = Self::find_any(db, id).await?;
        if !include_hidden && !slide.is_active {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(slide)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<hero_slide::Model> {
        HeroSlide::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        fields: HeroSlideFields,
        image: PendingUpload,
    ) -> ApiResult<hero_slide::Model> {
        let mut batch = uploads.batch();
        let image_url = batch.write_one(image).await?;

        let mut slide = hero_slide::ActiveModel {
            image_url: Set(image_url),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        assign(&mut slide, fields);

        let result = slide.insert(db.as_ref()).await.map_err(ApiError::from);
        batch.settle(result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        fields: HeroSlideFields,
        image: Option<PendingUpload>,
    ) -> ApiResult<hero_slide::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_image = existing.image_url.clone();

        let mut slide: hero_slide::ActiveModel = existing.into();
        assign(&mut slide, fields);

        let mut batch = uploads.batch();
        let new_image = batch.write(image).await?;
        let replaced = new_image.is_some();
        patch(&mut slide.image_url, new_image);

        let result = slide
            .update(db.as_ref())
            .await
            .map_err(|e| write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(Some(&old_image)).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = HeroSlide::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(Some(&existing.image_url)).await;
        Ok(())
    }
}

fn assign(slide: &mut hero_slide::ActiveModel, fields: HeroSlideFields) {
    slide.title_en = Set(fields.title_en);
    slide.title_am = Set(fields.title_am);
    slide.title_or = Set(fields.title_or);
    slide.subtitle_en = Set(fields.subtitle_en);
    slide.subtitle_am = Set(fields.subtitle_am);
    slide.subtitle_or = Set(fields.subtitle_or);
    slide.link_url = Set(fields.link_url);
    slide.sort_order = Set(fields.sort_order);
    slide.is_active = Set(fields.is_active);
}

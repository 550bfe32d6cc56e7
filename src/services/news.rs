use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, patch, write_err};
use crate::{
    entities::{news, prelude::News, NewsStatus},
    errors::{ApiError, ApiResult},
    schemas::news::{NewsDraft, NewsPatch, NewsQuery},
    services::database::DatabaseConnection,
};

pub const THUMBNAIL: UploadRule = UploadRule::image("thumbnail", "news");

const NOT_FOUND: &str = "News item not found";

pub struct NewsService;

impl NewsService {
    pub async fn list(
        db: &DatabaseConnection,
        query: &NewsQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<news::Model>> {
        let mut select = News::find();

        if !include_hidden {
            select = select.filter(news::Column::Status.eq(NewsStatus::Published));
        }
        if let Some(category) = &query.category {
            select = select.filter(news::Column::Category.eq(category.as_str()));
        }
        if let Some(status) = &query.status {
            select = select.filter(news::Column::Status.eq(status.clone()));
        }
        if let Some(featured) = query.featured {
            select = select.filter(news::Column::IsFeatured.eq(featured));
        }

        Ok(select
            .order_by_desc(news::Column::CreatedAt)
            .order_by_desc(news::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    /// Drafts are only visible with `include_hidden`
    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<news::Model> {
        let item = Self::find_any(db, id).await?;
        if !include_hidden && item.status != NewsStatus::Published {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(item)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<news::Model> {
        News::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        draft: NewsDraft,
        thumbnail: Option<PendingUpload>,
    ) -> ApiResult<news::Model> {
        let mut batch = uploads.batch();
        let thumbnail_url = batch.write(thumbnail).await?;

        let now = Utc::now();
        let result = news::ActiveModel {
            title_en: Set(draft.title_en),
            title_am: Set(draft.title_am),
            title_or: Set(draft.title_or),
            content_en: Set(draft.content_en),
            content_am: Set(draft.content_am),
            content_or: Set(draft.content_or),
            category: Set(draft.category),
            thumbnail_url: Set(thumbnail_url),
            status: Set(draft.status),
            is_featured: Set(draft.is_featured),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .map_err(ApiError::from);

        batch.settle(result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        changes: NewsPatch,
        thumbnail: Option<PendingUpload>,
    ) -> ApiResult<news::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_thumbnail = existing.thumbnail_url.clone();

        let mut item: news::ActiveModel = existing.into();
        patch(&mut item.title_en, changes.title_en);
        patch(&mut item.title_am, changes.title_am);
        patch(&mut item.title_or, changes.title_or);
        patch(&mut item.content_en, changes.content_en);
        patch(&mut item.content_am, changes.content_am);
        patch(&mut item.content_or, changes.content_or);
        patch(&mut item.category, changes.category);
        patch(&mut item.status, changes.status);
        patch(&mut item.is_featured, changes.is_featured);

        let mut batch = uploads.batch();
        let new_thumbnail = batch.write(thumbnail).await?;
        let replaced = new_thumbnail.is_some();
        patch(&mut item.thumbnail_url, new_thumbnail.map(Some));
        item.updated_at = Set(Utc::now());

        let result = item
            .update(db.as_ref())
            .await
            .map_err(|e| write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(old_thumbnail.as_deref()).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = News::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(existing.thumbnail_url.as_deref()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<news::Model>::new()])
                .into_connection(),
        );

        let err = NewsService::get(&db, 42, true).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_the_public() {
        let now = Utc::now();
        let draft = news::Model {
            id: 1,
            title_en: "Road works on the Kemise ring road".to_string(),
            title_am: None,
            title_or: None,
            content_en: "Works start Monday.".to_string(),
            content_am: None,
            content_or: None,
            category: "general".to_string(),
            thumbnail_url: None,
            status: NewsStatus::Draft,
            is_featured: false,
            created_at: now,
            updated_at: now,
        };
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![draft.clone()], vec![draft]])
                .into_connection(),
        );

        assert!(matches!(
            NewsService::get(&db, 1, false).await,
            Err(ApiError::NotFound(_))
        ));
        assert_eq!(NewsService::get(&db, 1, true).await.unwrap().id, 1);
    }
}

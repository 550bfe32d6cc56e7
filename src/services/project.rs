use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, linked_insert_err, linked_write_err, patch};
use crate::{
    entities::{prelude::Project, project},
    errors::{ApiError, ApiResult},
    schemas::projects::{ProjectDraft, ProjectPatch, ProjectQuery},
    services::database::DatabaseConnection,
};

pub const COVER: UploadRule = UploadRule::image("cover", "project");

const NOT_FOUND: &str = "Project not found";

pub struct ProjectService;

impl ProjectService {
    pub async fn list(
        db: &DatabaseConnection,
        query: &ProjectQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<project::Model>> {
        let mut select = Project::find();

        if !include_hidden {
            select = select.filter(project::Column::IsActive.eq(true));
        }
        if let Some(status) = &query.status {
            select = select.filter(project::Column::Status.eq(status.clone()));
        }
        if let Some(sector) = &query.sector {
            select = select.filter(project::Column::Sector.eq(sector.as_str()));
        }
        if let Some(woreda_id) = query.woreda_id {
            select = select.filter(project::Column::WoredaId.eq(woreda_id));
        }

        Ok(select
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<project::Model> {
        let project = Self::find_any(db, id).await?;
        if !include_hidden && !project.is_active {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(project)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<project::Model> {
        Project::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        draft: ProjectDraft,
        cover: Option<PendingUpload>,
    ) -> ApiResult<project::Model> {
        let mut batch = uploads.batch();
        let cover_url = batch.write(cover).await?;

        let now = Utc::now();
        let result = project::ActiveModel {
            title_en: Set(draft.title_en),
            title_am: Set(draft.title_am),
            title_or: Set(draft.title_or),
            description_en: Set(draft.description_en),
            description_am: Set(draft.description_am),
            description_or: Set(draft.description_or),
            sector: Set(draft.sector),
            status: Set(draft.status),
            budget: Set(draft.budget),
            start_date: Set(draft.start_date),
            end_date: Set(draft.end_date),
            woreda_id: Set(draft.woreda_id),
            cover_image_url: Set(cover_url),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
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
        changes: ProjectPatch,
        cover: Option<PendingUpload>,
    ) -> ApiResult<project::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_cover = existing.cover_image_url.clone();

        let mut project: project::ActiveModel = existing.into();
        patch(&mut project.title_en, changes.title_en);
        patch(&mut project.title_am, changes.title_am);
        patch(&mut project.title_or, changes.title_or);
        patch(&mut project.description_en, changes.description_en);
        patch(&mut project.description_am, changes.description_am);
        patch(&mut project.description_or, changes.description_or);
        patch(&mut project.sector, changes.sector);
        patch(&mut project.status, changes.status);
        patch(&mut project.budget, changes.budget);
        patch(&mut project.start_date, changes.start_date);
        patch(&mut project.end_date, changes.end_date);
        patch(&mut project.woreda_id, changes.woreda_id);
        patch(&mut project.is_active, changes.is_active);

        let mut batch = uploads.batch();
        let new_cover = batch.write(cover).await?;
        let replaced = new_cover.is_some();
        patch(&mut project.cover_image_url, new_cover.map(Some));
        project.updated_at = Set(Utc::now());

        let result = project
            .update(db.as_ref())
            .await
            .map_err(|e| linked_write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(old_cover.as_deref()).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = Project::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(existing.cover_image_url.as_deref()).await;
        Ok(())
    }
}

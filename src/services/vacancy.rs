use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, patch, write_err};
use crate::{
    entities::{prelude::Vacancy, vacancy},
    errors::{ApiError, ApiResult},
    schemas::vacancies::{VacancyFields, VacancyQuery},
    services::database::DatabaseConnection,
};

pub const ATTACHMENT: UploadRule = UploadRule::document("attachment", "vacancy");

const NOT_FOUND: &str = "Vacancy not found";

pub struct VacancyService;

impl VacancyService {
    pub async fn list(
        db: &DatabaseConnection,
        query: &VacancyQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<vacancy::Model>> {
        let mut select = Vacancy::find();

        if !include_hidden {
            select = select.filter(vacancy::Column::IsActive.eq(true));
        }
        if let Some(status) = &query.status {
            select = select.filter(vacancy::Column::Status.eq(status.clone()));
        }

        Ok(select
            .order_by_desc(vacancy::Column::CreatedAt)
            .order_by_desc(vacancy::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<vacancy::Model> {
        let vacancy = Self::find_any(db, id).await?;
        if !include_hidden && !vacancy.is_active {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(vacancy)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<vacancy::Model> {
        Vacancy::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        fields: VacancyFields,
        attachment: Option<PendingUpload>,
    ) -> ApiResult<vacancy::Model> {
        let mut batch = uploads.batch();
        let attachment_url = batch.write(attachment).await?;

        let now = Utc::now();
        let mut vacancy = vacancy::ActiveModel {
            attachment_url: Set(attachment_url),
            created_at: Set(now),
            ..Default::default()
        };
        assign(&mut vacancy, fields);
        vacancy.updated_at = Set(now);

        let result = vacancy.insert(db.as_ref()).await.map_err(ApiError::from);
        batch.settle(result).await
    }

    /// Overwrites every text column; the attachment only changes when a new one is sent
    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        fields: VacancyFields,
        attachment: Option<PendingUpload>,
    ) -> ApiResult<vacancy::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_attachment = existing.attachment_url.clone();

        let mut vacancy: vacancy::ActiveModel = existing.into();
        assign(&mut vacancy, fields);

        let mut batch = uploads.batch();
        let new_attachment = batch.write(attachment).await?;
        let replaced = new_attachment.is_some();
        patch(&mut vacancy.attachment_url, new_attachment.map(Some));
        vacancy.updated_at = Set(Utc::now());

        let result = vacancy
            .update(db.as_ref())
            .await
            .map_err(|e| write_err(e, NOT_FOUND));
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(old_attachment.as_deref()).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = Vacancy::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(existing.attachment_url.as_deref()).await;
        Ok(())
    }
}

fn assign(vacancy: &mut vacancy::ActiveModel, fields: VacancyFields) {
    vacancy.title_en = Set(fields.title_en);
    vacancy.title_am = Set(fields.title_am);
    vacancy.title_or = Set(fields.title_or);
    vacancy.description_en = Set(fields.description_en);
    vacancy.description_am = Set(fields.description_am);
    vacancy.description_or = Set(fields.description_or);
    vacancy.department = Set(fields.department);
    vacancy.location = Set(fields.location);
    vacancy.employment_type = Set(fields.employment_type);
    vacancy.positions = Set(fields.positions);
    vacancy.deadline = Set(fields.deadline);
    vacancy.status = Set(fields.status);
    vacancy.is_active = Set(fields.is_active);
}

use chrono::Utc;
use sea_orm::*;

use super::upload::{PendingUpload, UploadRule, UploadStore};
use super::{ensure_deleted, patch, write_err};
use crate::{
    entities::{prelude::Tender, tender, TenderStatus},
    errors::{ApiError, ApiResult},
    schemas::tenders::{TenderDraft, TenderPatch, TenderQuery},
    services::database::DatabaseConnection,
};

pub const DOCUMENT: UploadRule = UploadRule::document("document", "tender");

const NOT_FOUND: &str = "Tender not found";
const DUPLICATE_REF: &str = "A tender with this reference number already exists";

pub struct TenderService;

impl TenderService {
    /// Cancelled tenders stay out of the public list
    pub async fn list(
        db: &DatabaseConnection,
        query: &TenderQuery,
        include_hidden: bool,
    ) -> ApiResult<Vec<tender::Model>> {
        let mut select = Tender::find();

        if !include_hidden {
            select = select.filter(tender::Column::Status.ne(TenderStatus::Cancelled));
        }
        if let Some(status) = &query.status {
            select = select.filter(tender::Column::Status.eq(status.clone()));
        }

        Ok(select
            .order_by_desc(tender::Column::CreatedAt)
            .order_by_desc(tender::Column::Id)
            .all(db.as_ref())
            .await?)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
        include_hidden: bool,
    ) -> ApiResult<tender::Model> {
        let tender = Self::find_any(db, id).await?;
        if !include_hidden && tender.status == TenderStatus::Cancelled {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(tender)
    }

    async fn find_any(db: &DatabaseConnection, id: i32) -> ApiResult<tender::Model> {
        Tender::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        draft: TenderDraft,
        document: Option<PendingUpload>,
    ) -> ApiResult<tender::Model> {
        let mut batch = uploads.batch();
        let file_url = batch.write(document).await?;

        let now = Utc::now();
        let result = tender::ActiveModel {
            title_en: Set(draft.title_en),
            title_am: Set(draft.title_am),
            title_or: Set(draft.title_or),
            description_en: Set(draft.description_en),
            description_am: Set(draft.description_am),
            description_or: Set(draft.description_or),
            ref_number: Set(draft.ref_number),
            deadline: Set(draft.deadline),
            status: Set(draft.status),
            file_url: Set(file_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .map_err(|e| ApiError::conflict_or_db(e, DUPLICATE_REF));

        batch.settle(result).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        uploads: &UploadStore,
        id: i32,
        changes: TenderPatch,
        document: Option<PendingUpload>,
    ) -> ApiResult<tender::Model> {
        let existing = Self::find_any(db, id).await?;
        let old_file = existing.file_url.clone();

        let mut tender: tender::ActiveModel = existing.into();
        patch(&mut tender.title_en, changes.title_en);
        patch(&mut tender.title_am, changes.title_am);
        patch(&mut tender.title_or, changes.title_or);
        patch(&mut tender.description_en, changes.description_en);
        patch(&mut tender.description_am, changes.description_am);
        patch(&mut tender.description_or, changes.description_or);
        patch(&mut tender.ref_number, changes.ref_number);
        patch(&mut tender.deadline, changes.deadline);
        patch(&mut tender.status, changes.status);

        let mut batch = uploads.batch();
        let new_file = batch.write(document).await?;
        let replaced = new_file.is_some();
        patch(&mut tender.file_url, new_file.map(Some));
        tender.updated_at = Set(Utc::now());

        let result = tender.update(db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => write_err(e, NOT_FOUND),
            other => ApiError::conflict_or_db(other, DUPLICATE_REF),
        });
        let updated = batch.settle(result).await?;

        if replaced {
            uploads.discard(old_file.as_deref()).await;
        }
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, uploads: &UploadStore, id: i32) -> ApiResult<()> {
        let existing = Self::find_any(db, id).await?;

        let result = Tender::delete_by_id(id).exec(db.as_ref()).await?;
        ensure_deleted(result, NOT_FOUND)?;

        uploads.discard(existing.file_url.as_deref()).await;
        Ok(())
    }
}

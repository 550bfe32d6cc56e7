use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{choice, datetime, patch_datetime, patch_required, patch_text, required, text};
use crate::entities::TenderStatus;
use crate::errors::{ApiError, ApiResult};

/// Multipart body for tenders. Updates only touch the supplied fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct TenderForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub ref_number: Option<String>,
    /// RFC 3339 or YYYY-MM-DD
    pub deadline: Option<String>,
    /// Open, Closed, Awarded or Cancelled
    pub status: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub document: Option<FieldData<Bytes>>,
}

pub struct TenderDraft {
    pub title_en: String,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub ref_number: String,
    pub deadline: DateTime<Utc>,
    pub status: TenderStatus,
}

#[derive(Default)]
pub struct TenderPatch {
    pub title_en: Option<String>,
    pub title_am: Option<Option<String>>,
    pub title_or: Option<Option<String>>,
    pub description_en: Option<Option<String>>,
    pub description_am: Option<Option<String>>,
    pub description_or: Option<Option<String>>,
    pub ref_number: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<TenderStatus>,
}

impl TenderForm {
    pub fn into_draft(self) -> ApiResult<(TenderDraft, Option<FieldData<Bytes>>)> {
        let draft = TenderDraft {
            title_en: required(self.title_en, "title_en")?,
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            description_en: text(self.description_en),
            description_am: text(self.description_am),
            description_or: text(self.description_or),
            ref_number: required(self.ref_number, "ref_number")?,
            deadline: datetime(self.deadline, "deadline")?
                .ok_or_else(|| ApiError::Validation("deadline is required".to_string()))?,
            status: choice(self.status, "status")?.unwrap_or(TenderStatus::Open),
        };
        Ok((draft, self.document))
    }

    pub fn into_patch(self) -> ApiResult<(TenderPatch, Option<FieldData<Bytes>>)> {
        let deadline = match patch_datetime(self.deadline, "deadline")? {
            Some(None) => {
                return Err(ApiError::Validation("deadline cannot be cleared".to_string()))
            }
            other => other.flatten(),
        };
        let patch = TenderPatch {
            title_en: patch_required(self.title_en, "title_en")?,
            title_am: patch_text(self.title_am),
            title_or: patch_text(self.title_or),
            description_en: patch_text(self.description_en),
            description_am: patch_text(self.description_am),
            description_or: patch_text(self.description_or),
            ref_number: patch_required(self.ref_number, "ref_number")?,
            deadline,
            status: choice(self.status, "status")?,
        };
        Ok((patch, self.document))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TenderQuery {
    pub status: Option<TenderStatus>,
    /// Include cancelled tenders, requires a token
    pub admin: Option<bool>,
}

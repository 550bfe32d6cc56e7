use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{
    choice, date, flag, int, patch_date, patch_int, patch_required, patch_text, required, text,
};
use crate::entities::ProjectStatus;
use crate::errors::ApiResult;

/// Multipart body for projects. Updates only touch the supplied fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct ProjectForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub sector: Option<String>,
    /// Planned, Ongoing or Completed
    pub status: Option<String>,
    pub budget: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub woreda_id: Option<String>,
    pub is_active: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover: Option<FieldData<Bytes>>,
}

pub struct ProjectDraft {
    pub title_en: String,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub sector: Option<String>,
    pub status: ProjectStatus,
    pub budget: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub woreda_id: Option<i32>,
    pub is_active: bool,
}

#[derive(Default)]
pub struct ProjectPatch {
    pub title_en: Option<String>,
    pub title_am: Option<Option<String>>,
    pub title_or: Option<Option<String>>,
    pub description_en: Option<Option<String>>,
    pub description_am: Option<Option<String>>,
    pub description_or: Option<Option<String>>,
    pub sector: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub budget: Option<Option<i64>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub woreda_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

impl ProjectForm {
    pub fn into_draft(self) -> ApiResult<(ProjectDraft, Option<FieldData<Bytes>>)> {
        let draft = ProjectDraft {
            title_en: required(self.title_en, "title_en")?,
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            description_en: text(self.description_en),
            description_am: text(self.description_am),
            description_or: text(self.description_or),
            sector: text(self.sector),
            status: choice(self.status, "status")?.unwrap_or(ProjectStatus::Planned),
            budget: int(self.budget, "budget")?,
            start_date: date(self.start_date, "start_date")?,
            end_date: date(self.end_date, "end_date")?,
            woreda_id: int(self.woreda_id, "woreda_id")?,
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        Ok((draft, self.cover))
    }

    pub fn into_patch(self) -> ApiResult<(ProjectPatch, Option<FieldData<Bytes>>)> {
        let patch = ProjectPatch {
            title_en: patch_required(self.title_en, "title_en")?,
            title_am: patch_text(self.title_am),
            title_or: patch_text(self.title_or),
            description_en: patch_text(self.description_en),
            description_am: patch_text(self.description_am),
            description_or: patch_text(self.description_or),
            sector: patch_text(self.sector),
            status: choice(self.status, "status")?,
            budget: patch_int(self.budget, "budget")?,
            start_date: patch_date(self.start_date, "start_date")?,
            end_date: patch_date(self.end_date, "end_date")?,
            woreda_id: patch_int(self.woreda_id, "woreda_id")?,
            is_active: flag(self.is_active, "is_active")?,
        };
        Ok((patch, self.cover))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub sector: Option<String>,
    pub woreda_id: Option<i32>,
    pub admin: Option<bool>,
}

use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{choice, flag, patch_required, patch_text, required, text};
use crate::entities::NewsStatus;
use crate::errors::ApiResult;

/// Multipart body for creating or editing a news item
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct NewsForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub content_en: Option<String>,
    pub content_am: Option<String>,
    pub content_or: Option<String>,
    pub category: Option<String>,
    /// `draft` or `published`
    pub status: Option<String>,
    pub is_featured: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumbnail: Option<FieldData<Bytes>>,
}

pub struct NewsDraft {
    pub title_en: String,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub content_en: String,
    pub content_am: Option<String>,
    pub content_or: Option<String>,
    pub category: String,
    pub status: NewsStatus,
    pub is_featured: bool,
}

/// Only the supplied fields change
#[derive(Default)]
pub struct NewsPatch {
    pub title_en: Option<String>,
    pub title_am: Option<Option<String>>,
    pub title_or: Option<Option<String>>,
    pub content_en: Option<String>,
    pub content_am: Option<Option<String>>,
    pub content_or: Option<Option<String>>,
    pub category: Option<String>,
    pub status: Option<NewsStatus>,
    pub is_featured: Option<bool>,
}

impl NewsForm {
    pub fn into_draft(self) -> ApiResult<(NewsDraft, Option<FieldData<Bytes>>)> {
        let draft = NewsDraft {
            title_en: required(self.title_en, "title_en")?,
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            content_en: required(self.content_en, "content_en")?,
            content_am: text(self.content_am),
            content_or: text(self.content_or),
            category: text(self.category).unwrap_or_else(|| "general".to_string()),
            status: choice(self.status, "status")?.unwrap_or(NewsStatus::Draft),
            is_featured: flag(self.is_featured, "is_featured")?.unwrap_or(false),
        };
        Ok((draft, self.thumbnail))
    }

    pub fn into_patch(self) -> ApiResult<(NewsPatch, Option<FieldData<Bytes>>)> {
        let patch = NewsPatch {
            title_en: patch_required(self.title_en, "title_en")?,
            title_am: patch_text(self.title_am),
            title_or: patch_text(self.title_or),
            content_en: patch_required(self.content_en, "content_en")?,
            content_am: patch_text(self.content_am),
            content_or: patch_text(self.content_or),
            category: patch_required(self.category, "category")?,
            status: choice(self.status, "status")?,
            is_featured: flag(self.is_featured, "is_featured")?,
        };
        Ok((patch, self.thumbnail))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NewsQuery {
    pub category: Option<String>,
    pub status: Option<NewsStatus>,
    pub featured: Option<bool>,
    /// Include drafts, requires a token
    pub admin: Option<bool>,
}

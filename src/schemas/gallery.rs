use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{flag, int, patch_int, patch_text, text};
use crate::errors::ApiResult;

/// Multipart body for gallery items. Updates only touch the supplied fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct GalleryForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub category: Option<String>,
    pub woreda_id: Option<String>,
    pub sort_order: Option<String>,
    pub is_active: Option<String>,
    /// Required on create
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<FieldData<Bytes>>,
}

pub struct GalleryDraft {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub category: Option<String>,
    pub woreda_id: Option<i32>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Default)]
pub struct GalleryPatch {
    pub title_en: Option<Option<String>>,
    pub title_am: Option<Option<String>>,
    pub title_or: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub woreda_id: Option<Option<i32>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl GalleryForm {
    pub fn into_draft(self) -> ApiResult<(GalleryDraft, Option<FieldData<Bytes>>)> {
        let draft = GalleryDraft {
            title_en: text(self.title_en),
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            category: text(self.category),
            woreda_id: int(self.woreda_id, "woreda_id")?,
            sort_order: int(self.sort_order, "sort_order")?.unwrap_or(0),
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        Ok((draft, self.image))
    }

    pub fn into_patch(self) -> ApiResult<(GalleryPatch, Option<FieldData<Bytes>>)> {
        let patch = GalleryPatch {
            title_en: patch_text(self.title_en),
            title_am: patch_text(self.title_am),
            title_or: patch_text(self.title_or),
            category: patch_text(self.category),
            woreda_id: patch_int(self.woreda_id, "woreda_id")?,
            sort_order: int(self.sort_order, "sort_order")?,
            is_active: flag(self.is_active, "is_active")?,
        };
        Ok((patch, self.image))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GalleryQuery {
    pub category: Option<String>,
    pub woreda_id: Option<i32>,
    pub admin: Option<bool>,
}

use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use utoipa::ToSchema;

use super::common::{flag, int, text};
use crate::errors::ApiResult;

/// Multipart body for hero slides. Updates are full replacements of the text fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct HeroSlideForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub subtitle_en: Option<String>,
    pub subtitle_am: Option<String>,
    pub subtitle_or: Option<String>,
    pub link_url: Option<String>,
    pub sort_order: Option<String>,
    pub is_active: Option<String>,
    /// Required on create
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<FieldData<Bytes>>,
}

pub struct HeroSlideFields {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub subtitle_en: Option<String>,
    pub subtitle_am: Option<String>,
    pub subtitle_or: Option<String>,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl HeroSlideForm {
    pub fn into_fields(self) -> ApiResult<(HeroSlideFields, Option<FieldData<Bytes>>)> {
        let fields = HeroSlideFields {
            title_en: text(self.title_en),
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            subtitle_en: text(self.subtitle_en),
            subtitle_am: text(self.subtitle_am),
            subtitle_or: text(self.subtitle_or),
            link_url: text(self.link_url),
            sort_order: int(self.sort_order, "sort_order")?.unwrap_or(0),
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        Ok((fields, self.image))
    }
}

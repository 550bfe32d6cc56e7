use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{flag, required, text};
use crate::errors::ApiResult;

/// Multipart body for documents. Updates are full replacements of the text fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct DocumentForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<String>,
    /// pdf, doc or docx, required on create
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<FieldData<Bytes>>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover: Option<FieldData<Bytes>>,
}

pub struct DocumentFields {
    pub title_en: String,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub category: String,
    pub is_active: bool,
}

pub struct DocumentFiles {
    pub file: Option<FieldData<Bytes>>,
    pub cover: Option<FieldData<Bytes>>,
}

impl DocumentForm {
    pub fn into_fields(self) -> ApiResult<(DocumentFields, DocumentFiles)> {
        let fields = DocumentFields {
            title_en: required(self.title_en, "title_en")?,
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            description_en: text(self.description_en),
            description_am: text(self.description_am),
            description_or: text(self.description_or),
            category: text(self.category).unwrap_or_else(|| "general".to_string()),
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        let files = DocumentFiles {
            file: self.file,
            cover: self.cover,
        };
        Ok((fields, files))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DocumentQuery {
    pub category: Option<String>,
    pub admin: Option<bool>,
}

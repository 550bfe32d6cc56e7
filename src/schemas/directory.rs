use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{flag, int, required, text};
use crate::errors::ApiResult;

/// Multipart body for directory entries. Updates are full replacements of the text fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct DirectoryForm {
    pub name_en: Option<String>,
    pub name_am: Option<String>,
    pub name_or: Option<String>,
    pub position_en: Option<String>,
    pub position_am: Option<String>,
    pub position_or: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub woreda_id: Option<String>,
    pub sort_order: Option<String>,
    pub is_active: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<FieldData<Bytes>>,
}

pub struct DirectoryFields {
    pub name_en: String,
    pub name_am: Option<String>,
    pub name_or: Option<String>,
    pub position_en: Option<String>,
    pub position_am: Option<String>,
    pub position_or: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub woreda_id: Option<i32>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl DirectoryForm {
    pub fn into_fields(self) -> ApiResult<(DirectoryFields, Option<FieldData<Bytes>>)> {
        let fields = DirectoryFields {
            name_en: required(self.name_en, "name_en")?,
            name_am: text(self.name_am),
            name_or: text(self.name_or),
            position_en: text(self.position_en),
            position_am: text(self.position_am),
            position_or: text(self.position_or),
            department: text(self.department),
            phone: text(self.phone),
            email: text(self.email),
            woreda_id: int(self.woreda_id, "woreda_id")?,
            sort_order: int(self.sort_order, "sort_order")?.unwrap_or(0),
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        Ok((fields, self.photo))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DirectoryQuery {
    pub department: Option<String>,
    pub woreda_id: Option<i32>,
    pub admin: Option<bool>,
}

use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use utoipa::ToSchema;

use super::common::{patch_required, patch_text};
use crate::errors::ApiResult;

/// Multipart body for the office settings. Only supplied fields change.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct SettingsForm {
    pub office_name_en: Option<String>,
    pub office_name_am: Option<String>,
    pub office_name_or: Option<String>,
    pub address_en: Option<String>,
    pub address_am: Option<String>,
    pub address_or: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub working_hours_en: Option<String>,
    pub facebook_url: Option<String>,
    pub telegram_url: Option<String>,
    pub map_embed_url: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub logo: Option<FieldData<Bytes>>,
}

#[derive(Default)]
pub struct SettingsPatch {
    pub office_name_en: Option<String>,
    pub office_name_am: Option<Option<String>>,
    pub office_name_or: Option<Option<String>>,
    pub address_en: Option<Option<String>>,
    pub address_am: Option<Option<String>>,
    pub address_or: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub working_hours_en: Option<Option<String>>,
    pub facebook_url: Option<Option<String>>,
    pub telegram_url: Option<Option<String>>,
    pub map_embed_url: Option<Option<String>>,
}

impl SettingsForm {
    pub fn into_patch(self) -> ApiResult<(SettingsPatch, Option<FieldData<Bytes>>)> {
        let patch = SettingsPatch {
            office_name_en: patch_required(self.office_name_en, "office_name_en")?,
            office_name_am: patch_text(self.office_name_am),
            office_name_or: patch_text(self.office_name_or),
            address_en: patch_text(self.address_en),
            address_am: patch_text(self.address_am),
            address_or: patch_text(self.address_or),
            phone: patch_text(self.phone),
            email: patch_text(self.email),
            working_hours_en: patch_text(self.working_hours_en),
            facebook_url: patch_text(self.facebook_url),
            telegram_url: patch_text(self.telegram_url),
            map_embed_url: patch_text(self.map_embed_url),
        };
        Ok((patch, self.logo))
    }
}

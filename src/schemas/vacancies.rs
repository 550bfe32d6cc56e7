use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common::{choice, date, flag, int, required, text};
use crate::entities::VacancyStatus;
use crate::errors::ApiResult;

/// Multipart body for vacancies. Updates are full replacements of the text fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct VacancyForm {
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub positions: Option<String>,
    /// YYYY-MM-DD
    pub deadline: Option<String>,
    /// Open or Closed
    pub status: Option<String>,
    pub is_active: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub attachment: Option<FieldData<Bytes>>,
}

pub struct VacancyFields {
    pub title_en: String,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub positions: Option<i32>,
    pub deadline: Option<NaiveDate>,
    pub status: VacancyStatus,
    pub is_active: bool,
}

impl VacancyForm {
    pub fn into_fields(self) -> ApiResult<(VacancyFields, Option<FieldData<Bytes>>)> {
        let fields = VacancyFields {
            title_en: required(self.title_en, "title_en")?,
            title_am: text(self.title_am),
            title_or: text(self.title_or),
            description_en: text(self.description_en),
            description_am: text(self.description_am),
            description_or: text(self.description_or),
            department: text(self.department),
            location: text(self.location),
            employment_type: text(self.employment_type),
            positions: int(self.positions, "positions")?,
            deadline: date(self.deadline, "deadline")?,
            status: choice(self.status, "status")?.unwrap_or(VacancyStatus::Open),
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        Ok((fields, self.attachment))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VacancyQuery {
    pub status: Option<VacancyStatus>,
    pub admin: Option<bool>,
}

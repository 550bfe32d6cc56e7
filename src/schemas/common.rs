//! Request helpers shared by the content forms.
//!
//! Multipart text fields arrive as optional strings. Create/PUT forms use
//! [`text`] and [`required`]; PATCH forms use the `patch_*` helpers, where
//! `None` means "not supplied" and an empty value clears a nullable column.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{ApiError, ApiResult};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    #[schema(example = "Deleted")]
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a 201 response, the id key is per content type (`newsId`, `tenderId`, ...)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "Tender created")]
    pub message: String,
    #[schema(example = 1)]
    pub id: i32,
}

/// `?admin=true` on a list endpoint skips the public visibility filter
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminListQuery {
    #[serde(default)]
    pub admin: Option<bool>,
}

/// Trimmed value, `None` when absent or blank
pub fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    text(value).ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

/// PATCH text: `Some(None)` clears the column
pub fn patch_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| text(Some(v)))
}

/// PATCH text for a NOT NULL column, blank is rejected
pub fn patch_required(value: Option<String>, field: &str) -> ApiResult<Option<String>> {
    value.map(|v| required(Some(v), field)).transpose()
}

pub fn flag(value: Option<String>, field: &str) -> ApiResult<Option<bool>> {
    match text(value).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "on" | "yes") => Ok(Some(true)),
        Some("false" | "0" | "off" | "no") => Ok(Some(false)),
        Some(_) => Err(ApiError::Validation(format!("{field} must be true or false"))),
    }
}

pub fn int<T: std::str::FromStr>(value: Option<String>, field: &str) -> ApiResult<Option<T>> {
    text(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| ApiError::Validation(format!("{field} must be a whole number")))
        })
        .transpose()
}

pub fn patch_int<T: std::str::FromStr>(
    value: Option<String>,
    field: &str,
) -> ApiResult<Option<Option<T>>> {
    value.map(|v| int(Some(v), field)).transpose()
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM` (datetime-local inputs) or a bare date at midnight UTC
pub fn datetime(value: Option<String>, field: &str) -> ApiResult<Option<DateTime<Utc>>> {
    let Some(raw) = text(value) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M") {
        return Ok(Some(parsed.and_utc()));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(parsed.and_hms_opt(0, 0, 0).map(|d| d.and_utc()));
    }

    Err(ApiError::Validation(format!("{field} is not a valid date")))
}

pub fn patch_datetime(
    value: Option<String>,
    field: &str,
) -> ApiResult<Option<Option<DateTime<Utc>>>> {
    value.map(|v| datetime(Some(v), field)).transpose()
}

pub fn date(value: Option<String>, field: &str) -> ApiResult<Option<NaiveDate>> {
    text(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| ApiError::Validation(format!("{field} must be YYYY-MM-DD")))
        })
        .transpose()
}

pub fn patch_date(value: Option<String>, field: &str) -> ApiResult<Option<Option<NaiveDate>>> {
    value.map(|v| date(Some(v), field)).transpose()
}

/// Parses a stored enumeration from its database spelling
pub fn choice<E>(value: Option<String>, field: &str) -> ApiResult<Option<E>>
where
    E: ActiveEnum<Value = String>,
{
    text(value)
        .map(|v| {
            E::try_from_value(&v)
                .map_err(|_| ApiError::Validation(format!("{field} has an unknown value: {v}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TenderStatus;

    #[test]
    fn blank_text_is_absent_but_clears_on_patch() {
        assert_eq!(text(Some("   ".into())), None);
        assert_eq!(text(Some(" Kemise ".into())).as_deref(), Some("Kemise"));
        assert_eq!(patch_text(None), None);
        assert_eq!(patch_text(Some(String::new())), Some(None));
    }

    #[test]
    fn required_and_patch_required_reject_blank() {
        assert!(required(None, "title_en").is_err());
        assert!(patch_required(Some(" ".into()), "title_en").is_err());
        assert_eq!(patch_required(None, "title_en").unwrap(), None);
    }

    #[test]
    fn flags_accept_form_spellings() {
        assert_eq!(flag(Some("on".into()), "is_active").unwrap(), Some(true));
        assert_eq!(flag(Some("0".into()), "is_active").unwrap(), Some(false));
        assert!(flag(Some("maybe".into()), "is_active").is_err());
    }

    #[test]
    fn dates_accept_common_inputs() {
        let d = datetime(Some("2026-11-17".into()), "deadline").unwrap().unwrap();
        assert_eq!(d.to_rfc3339(), "2026-11-17T00:00:00+00:00");
        assert!(datetime(Some("2026-11-17T09:30".into()), "deadline").unwrap().is_some());
        assert!(datetime(Some("2026-11-17T09:30:00Z".into()), "deadline").unwrap().is_some());
        assert!(datetime(Some("next week".into()), "deadline").is_err());
        assert_eq!(patch_date(Some(String::new()), "end_date").unwrap(), Some(None));
    }

    #[test]
    fn enum_choices_use_stored_spelling() {
        let status: Option<TenderStatus> = choice(Some("Awarded".into()), "status").unwrap();
        assert_eq!(status, Some(TenderStatus::Awarded));
        assert!(choice::<TenderStatus>(Some("Lost".into()), "status").is_err());
    }

    #[test]
    fn integers_are_checked() {
        assert_eq!(int::<i32>(Some("12".into()), "sort_order").unwrap(), Some(12));
        assert!(int::<i32>(Some("twelve".into()), "sort_order").is_err());
        assert_eq!(patch_int::<i32>(Some(String::new()), "woreda_id").unwrap(), Some(None));
    }
}

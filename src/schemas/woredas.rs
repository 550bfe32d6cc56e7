use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use utoipa::ToSchema;

use super::common::{flag, int, patch_int, patch_required, patch_text, required, text};
use crate::errors::{ApiError, ApiResult};

/// Lower-case ASCII slug, other character runs collapse to a single `-`
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn checked_slug(raw: &str) -> ApiResult<String> {
    let slug = slugify(raw);
    if slug.is_empty() {
        return Err(ApiError::Validation(
            "slug must contain latin letters or digits".to_string(),
        ));
    }
    Ok(slug)
}

/// Multipart body for woredas. Updates only touch the supplied fields.
#[derive(Debug, TryFromMultipart, ToSchema)]
#[try_from_multipart(strict)]
pub struct WoredaForm {
    pub name_en: Option<String>,
    pub name_am: Option<String>,
    pub name_or: Option<String>,
    /// Derived from `name_en` on create when omitted
    pub slug: Option<String>,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub population: Option<String>,
    pub admin_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub sort_order: Option<String>,
    pub is_active: Option<String>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub banner: Option<FieldData<Bytes>>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub logo: Option<FieldData<Bytes>>,
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub admin_photo: Option<FieldData<Bytes>>,
}

pub struct WoredaDraft {
    pub name_en: String,
    pub name_am: Option<String>,
    pub name_or: Option<String>,
    pub slug: String,
    pub description_en: Option<String>,
    pub description_am: Option<String>,
    pub description_or: Option<String>,
    pub population: Option<i32>,
    pub admin_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Default)]
pub struct WoredaPatch {
    pub name_en: Option<String>,
    pub name_am: Option<Option<String>>,
    pub name_or: Option<Option<String>>,
    pub slug: Option<String>,
    pub description_en: Option<Option<String>>,
    pub description_am: Option<Option<String>>,
    pub description_or: Option<Option<String>>,
    pub population: Option<Option<i32>>,
    pub admin_name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct WoredaFiles {
    pub banner: Option<FieldData<Bytes>>,
    pub logo: Option<FieldData<Bytes>>,
    pub admin_photo: Option<FieldData<Bytes>>,
}

impl WoredaForm {
    fn split_files(&mut self) -> WoredaFiles {
        WoredaFiles {
            banner: self.banner.take(),
            logo: self.logo.take(),
            admin_photo: self.admin_photo.take(),
        }
    }

    pub fn into_draft(mut self) -> ApiResult<(WoredaDraft, WoredaFiles)> {
        let files = self.split_files();
        let name_en = required(self.name_en, "name_en")?;
        let slug = checked_slug(text(self.slug).as_deref().unwrap_or(&name_en))?;
        let draft = WoredaDraft {
            name_en,
            name_am: text(self.name_am),
            name_or: text(self.name_or),
            slug,
            description_en: text(self.description_en),
            description_am: text(self.description_am),
            description_or: text(self.description_or),
            population: int(self.population, "population")?,
            admin_name: text(self.admin_name),
            phone: text(self.phone),
            email: text(self.email),
            sort_order: int(self.sort_order, "sort_order")?.unwrap_or(0),
            is_active: flag(self.is_active, "is_active")?.unwrap_or(true),
        };
        Ok((draft, files))
    }

    pub fn into_patch(mut self) -> ApiResult<(WoredaPatch, WoredaFiles)> {
        let files = self.split_files();
        let patch = WoredaPatch {
            name_en: patch_required(self.name_en, "name_en")?,
            name_am: patch_text(self.name_am),
            name_or: patch_text(self.name_or),
            slug: patch_required(self.slug, "slug")?
                .map(|s| checked_slug(&s))
                .transpose()?,
            description_en: patch_text(self.description_en),
            description_am: patch_text(self.description_am),
            description_or: patch_text(self.description_or),
            population: patch_int(self.population, "population")?,
            admin_name: patch_text(self.admin_name),
            phone: patch_text(self.phone),
            email: patch_text(self.email),
            sort_order: int(self.sort_order, "sort_order")?,
            is_active: flag(self.is_active, "is_active")?,
        };
        Ok((patch, files))
    }
}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary key of the single settings row
pub const SINGLETON_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "office_settings")]
#[schema(as = OfficeSettings)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub office_name_en: String,
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
    pub logo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Served while no settings row has been saved yet
    pub fn placeholder() -> Self {
        Self {
            id: SINGLETON_ID,
            office_name_en: String::new(),
            office_name_am: None,
            office_name_or: None,
            address_en: None,
            address_am: None,
            address_or: None,
            phone: None,
            email: None,
            working_hours_en: None,
            facebook_url: None,
            telegram_url: None,
            map_embed_url: None,
            logo_url: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "gallery_items")]
#[schema(as = GalleryItem)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title_en: Option<String>,
    pub title_am: Option<String>,
    pub title_or: Option<String>,
    pub image_url: String,
    pub category: Option<String>,
    pub woreda_id: Option<i32>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::woreda::Entity",
        from = "Column::WoredaId",
        to = "super::woreda::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Woreda,
}

impl Related<super::woreda::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Woreda.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

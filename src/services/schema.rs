use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::entities::prelude::*;
use crate::services::database::DatabaseConnection;

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Creates every missing table. Woredas go first, other tables reference them.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Woreda).await?;
    create_table(db, &schema, News).await?;
    create_table(db, &schema, Document).await?;
    create_table(db, &schema, Tender).await?;
    create_table(db, &schema, Vacancy).await?;
    create_table(db, &schema, Project).await?;
    create_table(db, &schema, GalleryItem).await?;
    create_table(db, &schema, DirectoryEntry).await?;
    create_table(db, &schema, Alert).await?;
    create_table(db, &schema, HeroSlide).await?;
    create_table(db, &schema, OfficeSetting).await?;

    info!("Database schema ready");
    Ok(())
}

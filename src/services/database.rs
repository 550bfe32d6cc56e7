use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection as SeaOrmDatabaseConnection,
    DbErr, Statement,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub type DatabaseConnection = Arc<SeaOrmDatabaseConnection>;

pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(&config.url);

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(28800))
        .sqlx_logging(false);

    info!(
        "Database pool: min={}, max={}",
        config.min_connections, config.max_connections
    );

    let connection = Arc::new(Database::connect(opt).await?);

    if let Err(e) = warm_up_connection_pool(&connection).await {
        tracing::warn!("⚠️  Connection pool warm-up failed: {}", e);
    } else {
        info!("Connection pool warmed up");
    }

    Ok(connection)
}

async fn warm_up_connection_pool(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_owned());

    for i in 1..=3 {
        match db.execute(stmt.clone()).await {
            Ok(_) => tracing::debug!("Warm-up query {} done", i),
            Err(e) => {
                tracing::warn!("⚠️  Warm-up query {} failed: {}", i, e);
                return Err(e);
            }
        }
    }

    Ok(())
}

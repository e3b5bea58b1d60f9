use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::registration_history;

/// Connect to the configured database and bring the schema in line with the
/// entity definitions.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging);
    if let Some(secs) = config.idle_timeout_secs {
        opt.idle_timeout(Duration::from_secs(secs));
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("recorder::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Ensure required database indexes exist.
///
/// Schema sync creates the unique keys declared on the entities but not
/// composite non-unique indexes, so those are created here.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Active registration lookups:
    // SELECT ... FROM registration_history WHERE vessel_id = ? AND is_active
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_registration_history_vessel_active")
        .table(registration_history::Entity)
        .col(registration_history::Column::VesselId)
        .col(registration_history::Column::IsActive)
        .to_owned();

    let backend = db.get_database_backend();
    match db.execute_raw(backend.build(&stmt)).await {
        Ok(_) => {
            info!("Ensured index idx_registration_history_vessel_active exists");
        }
        Err(e) => {
            warn!(
                "Failed to create index idx_registration_history_vessel_active: {}",
                e
            );
        }
    }

    Ok(())
}

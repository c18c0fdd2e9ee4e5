use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::error::AppResult;

pub async fn connect(
    database_url: &str,
    max_connections: u32,
    run_migrations: bool,
) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.max_connections(max_connections.max(1)).sqlx_logging(false);

    let db = Database::connect(opts).await?;

    if run_migrations {
        // Only creates missing tables; existing data is left alone.
        Migrator::up(&db, None).await?;
        tracing::debug!("migrations applied");
    }

    Ok(db)
}

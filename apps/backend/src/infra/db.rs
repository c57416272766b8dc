use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Connect without touching the schema.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.sqlx_logging(false);
    Database::connect(options).await
}

/// Connect and apply pending migrations. Safe to run on every start.
pub async fn bootstrap_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let conn = connect_db(database_url).await?;
    info!("database connected");

    Migrator::up(&conn, None).await?;
    info!("database migrations applied");
    Ok(conn)
}

use std::path::Path;
use std::time::Duration;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sea_orm_migration::MigratorTrait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::ConnectOptions;
use todo_app_shared::TodoError;
use tracing::debug;

use crate::migration::Migrator;

/// Opens (creating if needed) the SQLite database and brings the schema up to date.
///
/// With no path an in-memory database is used. An in-memory database only
/// lives as long as its connection, so the pool is pinned to one connection
/// that never gets recycled.
pub async fn start_db(db_path: Option<&Path>) -> Result<DatabaseConnection, TodoError> {
    let (options, max_connections) = match db_path {
        Some(path) => {
            debug!("Opening database: {}", path.display());
            (
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true),
                8,
            )
        }
        None => {
            debug!("Opening in-memory database");
            (SqliteConnectOptions::new(), 1)
        }
    };

    let options = options
        .foreign_keys(true)
        .log_statements(log::LevelFilter::Trace)
        .log_slow_statements(log::LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|err| TodoError::DatabaseError(format!("connection failed: {err:?}")))?;

    let conn = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

    Migrator::up(&conn, None).await?;

    Ok(conn)
}

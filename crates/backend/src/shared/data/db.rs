use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS a001_document_sequence (
        id TEXT PRIMARY KEY NOT NULL,
        document_type TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        pattern TEXT NOT NULL,
        current_counter INTEGER NOT NULL DEFAULT 0,
        reset_period TEXT NOT NULL DEFAULT 'never',
        is_deleted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT,
        updated_at TEXT,
        version INTEGER NOT NULL DEFAULT 0
    );
    "#,
    // deleted rows keep their type so it can be configured again
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_a001_document_sequence_type
        ON a001_document_sequence (document_type)
        WHERE is_deleted = 0;
    "#,
];

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Create missing tables and indexes
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    for sql in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

pub fn get_connection() -> Result<&'static DatabaseConnection, DbErr> {
    DB_CONN
        .get()
        .ok_or_else(|| DbErr::Custom("Database connection has not been initialized".into()))
}

/// Fresh in-memory database with the schema applied
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    // every pooled connection would get its own empty memory database
    options.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await.unwrap();
    ensure_schema(&conn).await.unwrap();
    conn
}

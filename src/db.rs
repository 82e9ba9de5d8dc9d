use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::queries::ddl;

type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Open a SQLite connection pool from a `sqlite:` URL, creating the file if needed
/// Enables WAL mode so handlers can read while ideas are being written
pub async fn open_sqlite_pool(url: &str, max_connections: u32) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open a SQLite connection pool for a database file path
pub async fn open_sqlite_file(db_path: &Path, max_connections: u32) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the documents table and its index if they don't exist
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), DynError> {
    sqlx::query(&ddl::create_documents_table())
        .execute(pool)
        .await?;
    sqlx::query(&ddl::create_documents_collection_index())
        .execute(pool)
        .await?;
    Ok(())
}

/// Database name for a SQLite URL: the file stem, or "memory" for in-memory databases
pub fn sqlite_database_name(url: &str) -> String {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return "memory".to_string();
    }

    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Create a SQLite database in a temporary directory for testing
/// The returned guard removes the directory when dropped
pub async fn create_test_connection_in_temporary_file(
) -> Result<(SqlitePool, tempfile::TempDir), DynError> {
    let dir = tempfile::tempdir()?;
    let pool = open_sqlite_file(&dir.path().join("test.sqlite"), 5).await?;
    init_database_schema(&pool).await?;
    Ok((pool, dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_database_name() {
        assert_eq!(sqlite_database_name("sqlite://data/shorts.sqlite"), "shorts");
        assert_eq!(sqlite_database_name("sqlite:shorts.db?mode=rwc"), "shorts");
        assert_eq!(sqlite_database_name("sqlite::memory:"), "memory");
    }
}

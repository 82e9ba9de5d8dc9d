use sea_query::{ColumnDef, Index, PostgresQueryBuilder, SqliteQueryBuilder, Table, TableCreateStatement};

use crate::schema::Documents;

fn documents_table() -> TableCreateStatement {
    Table::create()
        .table(Documents::Table)
        .if_not_exists()
        .col(ColumnDef::new(Documents::Id).string().primary_key())
        .col(ColumnDef::new(Documents::Collection).string().not_null())
        .col(ColumnDef::new(Documents::Body).text().not_null())
        .col(ColumnDef::new(Documents::CreatedAt).big_integer().not_null())
        .to_owned()
}

/// CREATE TABLE IF NOT EXISTS documents (
///     id TEXT PRIMARY KEY,
///     collection TEXT NOT NULL,
///     body TEXT NOT NULL,
///     created_at INTEGER NOT NULL
/// )
pub fn create_documents_table() -> String {
    documents_table().to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, created_at)
pub fn create_documents_collection_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_documents_collection")
        .table(Documents::Table)
        .col(Documents::Collection)
        .col(Documents::CreatedAt)
        .to_string(SqliteQueryBuilder)
}

// ============================================================================
// PostgreSQL variants
// ============================================================================

/// CREATE TABLE IF NOT EXISTS documents - PostgreSQL
pub fn create_documents_table_pg() -> String {
    documents_table().to_string(PostgresQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_documents_collection - PostgreSQL
pub fn create_documents_collection_index_pg() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_documents_collection")
        .table(Documents::Table)
        .col(Documents::Collection)
        .col(Documents::CreatedAt)
        .to_string(PostgresQueryBuilder)
}

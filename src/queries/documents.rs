use sea_query::{Expr, Order, PostgresQueryBuilder, Query, SelectStatement, SqliteQueryBuilder};

use crate::schema::Documents;
use crate::store::DocumentFilter;

/// INSERT INTO documents (id, collection, body, created_at) VALUES (?, ?, ?, ?)
pub fn insert(id: &str, collection: &str, body: &str, created_at_ms: i64) -> String {
    insert_statement(id, collection, body, created_at_ms).to_string(SqliteQueryBuilder)
}

/// SELECT id, body FROM documents WHERE collection = ? [AND json_extract(body, '$.field') = ?]...
/// ORDER BY created_at, id [LIMIT ?]
///
/// A limit of 0 means no limit.
pub fn select_by_collection(collection: &str, filter: &DocumentFilter, limit: u64) -> String {
    let mut query = select_statement(collection, limit);
    for (field, value) in filter.iter() {
        query.and_where(Expr::cust_with_values(
            "json_extract(\"body\", ?) = ?",
            [json_path(field), value.to_string()],
        ));
    }
    query.to_string(SqliteQueryBuilder)
}

/// SELECT DISTINCT collection FROM documents ORDER BY collection LIMIT ?
pub fn select_collections(limit: u64) -> String {
    collections_statement(limit).to_string(SqliteQueryBuilder)
}

// ============================================================================
// PostgreSQL variants
// ============================================================================

/// INSERT INTO documents (id, collection, body, created_at) VALUES (...) - PostgreSQL
pub fn insert_pg(id: &str, collection: &str, body: &str, created_at_ms: i64) -> String {
    insert_statement(id, collection, body, created_at_ms).to_string(PostgresQueryBuilder)
}

/// SELECT id, body FROM documents WHERE collection = ? [AND (CAST(body AS jsonb) ->> 'field') = ?]... - PostgreSQL
pub fn select_by_collection_pg(collection: &str, filter: &DocumentFilter, limit: u64) -> String {
    let mut query = select_statement(collection, limit);
    for (field, value) in filter.iter() {
        query.and_where(Expr::cust_with_values(
            "(CAST(\"body\" AS jsonb) ->> $1) = $2",
            [field.to_string(), value.to_string()],
        ));
    }
    query.to_string(PostgresQueryBuilder)
}

/// SELECT DISTINCT collection FROM documents ORDER BY collection LIMIT ? - PostgreSQL
pub fn select_collections_pg(limit: u64) -> String {
    collections_statement(limit).to_string(PostgresQueryBuilder)
}

// ============================================================================
// Shared statements
// ============================================================================

fn insert_statement(
    id: &str,
    collection: &str,
    body: &str,
    created_at_ms: i64,
) -> sea_query::InsertStatement {
    Query::insert()
        .into_table(Documents::Table)
        .columns([
            Documents::Id,
            Documents::Collection,
            Documents::Body,
            Documents::CreatedAt,
        ])
        .values_panic([id.into(), collection.into(), body.into(), created_at_ms.into()])
        .to_owned()
}

fn select_statement(collection: &str, limit: u64) -> SelectStatement {
    let mut query = Query::select();
    query
        .columns([Documents::Id, Documents::Body])
        .from(Documents::Table)
        .and_where(Expr::col(Documents::Collection).eq(collection))
        .order_by(Documents::CreatedAt, Order::Asc)
        .order_by(Documents::Id, Order::Asc);
    if limit > 0 {
        query.limit(limit);
    }
    query
}

fn collections_statement(limit: u64) -> SelectStatement {
    Query::select()
        .distinct()
        .column(Documents::Collection)
        .from(Documents::Table)
        .order_by(Documents::Collection, Order::Asc)
        .limit(limit)
        .to_owned()
}

/// SQLite JSON path for a top-level field; only identifier characters are kept
fn json_path(field: &str) -> String {
    let name: String = field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("$.{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_filter_or_limit() {
        let sql = select_by_collection("contentidea", &DocumentFilter::new(), 0);
        assert!(sql.contains("\"collection\" = 'contentidea'"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("json_extract"));
    }

    #[test]
    fn test_select_with_filter_and_limit() {
        let filter = DocumentFilter::new().eq("topic", "diet");
        let sql = select_by_collection("contentidea", &filter, 20);
        assert!(sql.contains("json_extract(\"body\", '$.topic') = 'diet'"));
        assert!(sql.contains("LIMIT 20"));
    }

    #[test]
    fn test_select_with_filter_pg() {
        let filter = DocumentFilter::new().eq("channel_id", "abc");
        let sql = select_by_collection_pg("contentidea", &filter, 5);
        assert!(sql.contains("(CAST(\"body\" AS jsonb) ->> 'channel_id') = 'abc'"));
        assert!(sql.contains("LIMIT 5"));
    }

    #[test]
    fn test_select_with_filter_pg_inlines_values() {
        let filter = DocumentFilter::new().eq("topic", "it's");
        let sql = select_by_collection_pg("contentidea", &filter, 5);
        assert!(!sql.contains("->> ?"), "placeholders left in: {}", sql);
        assert!(!sql.contains("$1"), "placeholders left in: {}", sql);
        assert!(sql.contains("->> 'topic')"));
        assert!(sql.contains("it\\'s") || sql.contains("it''s"));
    }

    #[test]
    fn test_insert_escapes_body() {
        let sql = insert("id1", "contentidea", r#"{"hook":"it's"}"#, 1);
        assert!(sql.contains("INSERT INTO \"documents\""));
        assert!(sql.contains("it''s"));
    }

    #[test]
    fn test_select_collections() {
        let sql = select_collections(10);
        assert!(sql.contains("SELECT DISTINCT \"collection\""));
        assert!(sql.contains("LIMIT 10"));
    }
}

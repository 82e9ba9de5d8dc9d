//! Document store backed by SQLite or PostgreSQL
//!
//! Records are kept as JSON text in a single `documents` table, grouped by
//! collection name. The store assigns identifiers and keeps them outside the
//! record body, so reading a document back means mapping its body onto the
//! domain type explicitly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use crate::constants::generate_document_id;
use crate::models::{Collection, ContentIdea};
use crate::queries::documents;
use crate::{db, db_postgres};

type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by document store operations
#[derive(Debug)]
pub enum StoreError {
    /// No store configured, or the database cannot be reached
    Unavailable(String),
    /// The database rejected a write
    Write(String),
    /// A read query failed
    Read(String),
    /// A record could not be converted to or from JSON
    InvalidDocument(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Database unavailable: {}", msg),
            StoreError::Write(msg) => write!(f, "Write failed: {}", msg),
            StoreError::Read(msg) => write!(f, "Read failed: {}", msg),
            StoreError::InvalidDocument(msg) => write!(f, "Invalid document: {}", msg),
        }
    }
}

impl StdError for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Read(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidDocument(err.to_string())
    }
}

impl StoreError {
    /// Error returned when the server runs without a database
    pub fn not_configured() -> Self {
        StoreError::Unavailable("no database configured".to_string())
    }

    fn from_write(err: sqlx::Error) -> Self {
        match StoreError::from(err) {
            StoreError::Read(msg) => StoreError::Write(msg),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Equality filter on top-level string fields of a document body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    fields: BTreeMap<String, String>,
}

impl DocumentFilter {
    /// Filter matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A document as stored: store identifier plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: serde_json::Value,
}

impl StoredDocument {
    /// Drop the store identifier and validate the body against `T`
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.body).map_err(|e| {
            StoreError::InvalidDocument(format!("document '{}': {}", self.id, e))
        })
    }
}

#[derive(Clone)]
enum Backend {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

/// Connection to the document database, shared by all request handlers
#[derive(Clone)]
pub struct DocumentStore {
    backend: Backend,
    database_name: String,
}

impl DocumentStore {
    /// Connect using a `sqlite:` or `postgres://` URL and create the schema
    ///
    /// For PostgreSQL, `database_name` selects the database (created if
    /// missing); otherwise the database in the URL is used. For SQLite it is
    /// only used as the reported name.
    pub async fn connect(
        url: &str,
        database_name: Option<&str>,
        max_connections: u32,
    ) -> std::result::Result<Self, DynError> {
        if url.starts_with("sqlite:") {
            let pool = db::open_sqlite_pool(url, max_connections).await?;
            db::init_database_schema(&pool).await?;
            let name = database_name
                .map(str::to_string)
                .unwrap_or_else(|| db::sqlite_database_name(url));
            Ok(Self::from_sqlite_pool(pool, name))
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let (pool, name) = match database_name {
                Some(name) => {
                    let pool = db_postgres::open_postgres_connection_create_if_needed(
                        url,
                        name,
                        max_connections,
                    )
                    .await?;
                    (pool, name.to_string())
                }
                None => {
                    let pool = db_postgres::open_postgres_connection(url, max_connections).await?;
                    let name = db_postgres::database_from_url(url)
                        .unwrap_or_else(|| "postgres".to_string());
                    (pool, name)
                }
            };
            db_postgres::init_database_schema_pg(&pool).await?;
            Ok(Self {
                backend: Backend::Postgres(pool),
                database_name: name,
            })
        } else {
            Err(format!(
                "Unsupported DATABASE_URL scheme (expected sqlite: or postgres://): {}",
                url
            )
            .into())
        }
    }

    /// Wrap an existing SQLite pool whose schema is already initialized
    pub fn from_sqlite_pool(pool: SqlitePool, database_name: impl Into<String>) -> Self {
        Self {
            backend: Backend::Sqlite(pool),
            database_name: database_name.into(),
        }
    }

    /// Name of the connected database
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Insert a record into `collection` and return its new identifier
    pub async fn create<T: Serialize + ?Sized>(&self, collection: &str, record: &T) -> Result<String> {
        let body = serde_json::to_string(record)?;
        let id = generate_document_id();
        let created_at_ms = chrono::Utc::now().timestamp_millis();

        match &self.backend {
            Backend::Sqlite(pool) => {
                let sql = documents::insert(&id, collection, &body, created_at_ms);
                sqlx::query(&sql)
                    .execute(pool)
                    .await
                    .map_err(StoreError::from_write)?;
            }
            Backend::Postgres(pool) => {
                let sql = documents::insert_pg(&id, collection, &body, created_at_ms);
                sqlx::query(&sql)
                    .execute(pool)
                    .await
                    .map_err(StoreError::from_write)?;
            }
        }

        Ok(id)
    }

    /// Insert a record into its model's collection
    pub async fn insert<T: Collection + Serialize>(&self, record: &T) -> Result<String> {
        self.create(T::NAME, record).await
    }

    /// At most `limit` documents of `collection` matching `filter` (0 = no limit)
    pub async fn list(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        limit: u64,
    ) -> Result<Vec<StoredDocument>> {
        let rows: Vec<(String, String)> = match &self.backend {
            Backend::Sqlite(pool) => {
                let sql = documents::select_by_collection(collection, filter, limit);
                sqlx::query_as(&sql).fetch_all(pool).await?
            }
            Backend::Postgres(pool) => {
                let sql = documents::select_by_collection_pg(collection, filter, limit);
                sqlx::query_as(&sql).fetch_all(pool).await?
            }
        };

        rows.into_iter()
            .map(|(id, body)| {
                let body = serde_json::from_str(&body).map_err(|e| {
                    StoreError::InvalidDocument(format!("document '{}': {}", id, e))
                })?;
                Ok(StoredDocument { id, body })
            })
            .collect()
    }

    /// List documents of a model's collection mapped onto the model type
    pub async fn list_records<T: Collection + DeserializeOwned>(
        &self,
        filter: &DocumentFilter,
        limit: u64,
    ) -> Result<Vec<T>> {
        self.list(T::NAME, filter, limit)
            .await?
            .into_iter()
            .map(StoredDocument::into_record)
            .collect()
    }

    /// Names of collections holding at least one document
    pub async fn list_collections(&self, limit: u64) -> Result<Vec<String>> {
        let names = match &self.backend {
            Backend::Sqlite(pool) => {
                sqlx::query_scalar::<_, String>(&documents::select_collections(limit))
                    .fetch_all(pool)
                    .await?
            }
            Backend::Postgres(pool) => {
                sqlx::query_scalar::<_, String>(&documents::select_collections_pg(limit))
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(names)
    }

    /// Close the underlying pool; later operations fail with `Unavailable`
    pub async fn close(&self) {
        match &self.backend {
            Backend::Sqlite(pool) => pool.close().await,
            Backend::Postgres(pool) => pool.close().await,
        }
    }
}

/// Persist each idea individually, returning one result per idea in order
///
/// Without a store every result is `Unavailable`. Failures are reported, not
/// handled, here.
pub async fn save_ideas(store: Option<&DocumentStore>, ideas: &[ContentIdea]) -> Vec<Result<String>> {
    let mut results = Vec::with_capacity(ideas.len());
    for idea in ideas {
        let result = match store {
            Some(store) => store.insert(idea).await,
            None => Err(StoreError::not_configured()),
        };
        results.push(result);
    }
    results
}

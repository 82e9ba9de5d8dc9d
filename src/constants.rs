/// Collection holding generated content ideas
pub const IDEAS_COLLECTION: &str = "contentidea";

/// Collection holding channel profiles
pub const CHANNELS_COLLECTION: &str = "channelprofile";

/// Collection holding video production tasks
pub const TASKS_COLLECTION: &str = "videotask";

/// Default language code for ideation requests and channel profiles
pub const DEFAULT_LANGUAGE: &str = "id";

/// Default page size for `GET /api/ideas`
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Maximum number of collection names reported by the diagnostics endpoint
pub const DIAGNOSTICS_COLLECTION_LIMIT: u64 = 10;

/// Error text in diagnostics is cut to this many characters
pub const DIAGNOSTICS_ERROR_CHARS: usize = 50;

/// Generate a store identifier for a new document
pub fn generate_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

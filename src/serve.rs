use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::ServerConfig;
use crate::constants::{DEFAULT_LIST_LIMIT, DIAGNOSTICS_COLLECTION_LIMIT, DIAGNOSTICS_ERROR_CHARS};
use crate::ideas::{generate_shorts_ideas, sample_ideas};
use crate::models::{ChannelProfile, ContentIdea, IdeationRequest, IdeationResponse};
use crate::store::{save_ideas, DocumentFilter, DocumentStore, StoreError};

pub const ROOT_MESSAGE: &str = "YouTube Shorts Automator Backend running";

/// State shared by all API handlers
pub struct AppState {
    /// None when no database is configured or the connection failed at startup
    pub store: Option<DocumentStore>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Option<DocumentStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    fn store(&self) -> Result<&DocumentStore, StoreError> {
        self.store.as_ref().ok_or_else(StoreError::not_configured)
    }
}

/// Connect to the configured database, or run without one
///
/// Connection failures are logged and leave the server without a store so
/// ideation keeps working.
pub async fn connect_store(config: &ServerConfig) -> Option<DocumentStore> {
    let url = match &config.database_url {
        Some(url) => url,
        None => {
            warn!("DATABASE_URL not set, ideas will not be persisted");
            return None;
        }
    };

    match DocumentStore::connect(url, config.database_name.as_deref(), config.max_connections).await {
        Ok(store) => {
            info!("Connected to database '{}'", store.database_name());
            Some(store)
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            None
        }
    }
}

/// Build the API router with permissive CORS
pub fn build_router(state: Arc<AppState>) -> Router {
    // Credentials cannot be combined with wildcards, so the request's own
    // origin, method and headers are echoed back
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/ideate", post(ideate_handler))
        .route("/api/channel", post(create_channel_handler))
        .route("/api/ideas", get(list_ideas_handler))
        .route("/test", get(diagnostics_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the API server until Ctrl-C
pub fn serve_api(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting Shorts Automator API server");
    println!("Listening on: http://{}", config.bind_address());
    println!("Endpoints:");
    println!("  GET  /  - Service banner");
    println!("  GET  /health  - Health check");
    println!("  POST /api/ideate  - Generate and save content ideas");
    println!("  POST /api/channel  - Save a channel profile");
    println!("  GET  /api/ideas?limit=<N>  - List saved content ideas");
    println!("  GET  /test  - Database diagnostics");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let store = connect_store(&config).await;
        let app_state = Arc::new(AppState::new(store, config.clone()));
        let app = build_router(app_state.clone());

        let listener = tokio::net::TcpListener::bind(config.bind_address())
            .await
            .map_err(|e| format!("Failed to bind to {}: {}", config.bind_address(), e))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| format!("Server error: {}", e))?;

        if let Some(store) = &app_state.store {
            store.close().await;
        }
        info!("Server stopped");

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": ROOT_MESSAGE }))
}

// Health check endpoint - returns 200 OK if server is running
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn ideate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdeationRequest>,
) -> Response {
    let ideas = generate_shorts_ideas(&req.niche, &req.keywords, &req.language);

    // Best effort: ideas are returned whether or not they were saved
    let results = save_ideas(state.store.as_ref(), &ideas).await;
    for (idea, result) in ideas.iter().zip(&results) {
        match result {
            Ok(id) => debug!("Saved idea '{}' as {}", idea.topic, id),
            Err(e) => warn!("Idea '{}' was not saved: {}", idea.topic, e),
        }
    }

    (StatusCode::OK, Json(IdeationResponse { ideas })).into_response()
}

async fn create_channel_handler(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<ChannelProfile>,
) -> Response {
    let result = match state.store() {
        Ok(store) => store.insert(&profile).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(id) => (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => {
            error!("Failed to save channel '{}': {}", profile.name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "detail": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn default_list_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct ListIdeasQuery {
    /// Maximum number of ideas (0 = no limit, negative values count by magnitude)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

async fn list_ideas_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListIdeasQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "detail": rejection.body_text() })),
            )
                .into_response()
        }
    };

    let result = match state.store() {
        Ok(store) => {
            store
                .list_records::<ContentIdea>(&DocumentFilter::new(), query.limit.unsigned_abs())
                .await
        }
        Err(e) => Err(e),
    };

    let ideas = match result {
        Ok(ideas) => ideas,
        Err(e) => {
            warn!("Failed to list ideas, returning sample set: {}", e);
            sample_ideas()
        }
    };

    (StatusCode::OK, Json(ideas)).into_response()
}

/// Response of `GET /test`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn presence(value: &Option<String>) -> String {
    if value.is_some() {
        "✅ Set".to_string()
    } else {
        "❌ Not Set".to_string()
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Build the diagnostics report for the current state
pub async fn diagnose(state: &AppState) -> DiagnosticsReport {
    let mut report = DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: presence(&state.config.database_url),
        database_name: presence(&state.config.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    match &state.store {
        Some(store) => {
            report.database = "✅ Available".to_string();
            report.connection_status = "Connected".to_string();
            match store.list_collections(DIAGNOSTICS_COLLECTION_LIMIT).await {
                Ok(collections) => {
                    report.collections = collections;
                    report.database = "✅ Connected & Working".to_string();
                }
                Err(e) => {
                    report.database = format!(
                        "⚠️  Connected but Error: {}",
                        truncate_chars(&e.to_string(), DIAGNOSTICS_ERROR_CHARS)
                    );
                }
            }
        }
        None => {
            report.database = "⚠️  Available but not initialized".to_string();
        }
    }

    report
}

async fn diagnostics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(diagnose(&state).await)
}

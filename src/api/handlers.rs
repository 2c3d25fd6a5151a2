//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{batch_get, batch_remove, batch_set, StorageEngine};
use crate::config::{Config, EngineConfig};
use crate::error::{CacheError, Result};
use crate::models::{
    BatchGetResponse, BatchResponse, BatchSetRequest, DeleteResponse, GetResponse, HasResponse,
    HealthResponse, KeysRequest, KeysResponse, QueryRequest, QueryResponse, ReadParams,
    SetRequest, SetResponse, StatsResponse, UsageResponse,
};
use crate::store::{FileStore, KeyValueStore, MemoryStore};

/// Store type the server runs on; file-backed in production, memory in tests.
pub type DynStore = Box<dyn KeyValueStore + Send + Sync>;

/// Application state shared across all handlers.
///
/// The engine is single-actor; the lock serializes requests onto it.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<StorageEngine<DynStore>>>,
}

impl AppState {
    /// Creates a new AppState with the given engine.
    pub fn new(engine: StorageEngine<DynStore>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }

    /// Opens the configured data file and builds the engine over it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: DynStore = Box::new(FileStore::open(&config.data_file)?);
        Ok(Self::new(StorageEngine::new(store, config.engine.clone())?))
    }

    /// Engine over an empty in-memory store.
    pub fn in_memory(config: EngineConfig) -> Result<Self> {
        let store: DynStore = Box::new(MemoryStore::new());
        Ok(Self::new(StorageEngine::new(store, config)?))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut engine = state.engine.write().await;
    engine.set_with(&req.key, &req.value, req.options())?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Reads count as a use, so this takes the write lock.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<ReadParams>,
) -> Result<Json<GetResponse>> {
    let mut engine = state.engine.write().await;
    let value: Option<Value> = engine.get_with(&key, params.into())?;

    match value {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Succeeds whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut engine = state.engine.write().await;
    engine.remove(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HasResponse> {
    let engine = state.engine.read().await;
    let exists = engine.has(&key);

    Json(HasResponse { key, exists })
}

/// Handler for POST /batch/set
pub async fn batch_set_handler(
    State(state): State<AppState>,
    Json(req): Json<BatchSetRequest>,
) -> Result<Json<BatchResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut engine = state.engine.write().await;
    batch_set(&mut *engine, &req.entries, req.options())?;

    Ok(Json(BatchResponse::new("Set", req.entries.len())))
}

/// Handler for POST /batch/get
pub async fn batch_get_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<BatchGetResponse>> {
    let mut engine = state.engine.write().await;
    let values = batch_get(&mut *engine, &req.keys, req.read_options())?;

    Ok(Json(BatchGetResponse { values }))
}

/// Handler for POST /batch/remove
pub async fn batch_remove_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<BatchResponse>> {
    let mut engine = state.engine.write().await;
    batch_remove(&mut *engine, &req.keys)?;

    Ok(Json(BatchResponse::new("Removed", req.keys.len())))
}

/// Handler for POST /query
pub async fn query_handler(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let mut engine = state.engine.write().await;
    let records = engine.select_query(&req.conditions)?;

    Ok(Json(QueryResponse::new(records)))
}

/// Handler for GET /usage/:key
pub async fn usage_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<UsageResponse> {
    let engine = state.engine.read().await;
    let count = engine.usage_count(&key);

    Json(UsageResponse { key, count })
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let engine = state.engine.read().await;
    Json(KeysResponse {
        keys: engine.keys(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = state.engine.read().await;
    let stats = engine.stats();

    Json(StatsResponse::new(&stats, engine.config().max_size_bytes))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! API Module
//!
//! HTTP handlers and routing exposing the storage engine.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value (`compress`/`encrypt` flags, default on)
//! - `GET /get/:key` - Read a value (`?decompress=&decrypt=`)
//! - `DELETE /del/:key` - Remove a key (idempotent)
//! - `GET /has/:key` - Existence check
//! - `POST /batch/set`, `POST /batch/get`, `POST /batch/remove` - Batch operations
//! - `POST /query` - Filter all records by conditions
//! - `GET /usage/:key` - Write count for a key
//! - `GET /keys` - Live logical keys
//! - `GET /stats` - Engine statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

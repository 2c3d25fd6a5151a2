//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its HTTP surface.
///
/// A missing key is never an error at the engine level; `NotFound` only exists
/// for the HTTP handlers, which have to answer with a status code.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Ciphertext or tag failed to verify, or the envelope is malformed
    #[error("Authentication failed: record was tampered with or written under another secret")]
    Authentication,

    /// The cipher refused the plaintext
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Value could not be serialized or the decoded text is not the requested type
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The write cannot fit in the byte budget
    #[error("Capacity exceeded: record of {needed} bytes does not fit in budget of {budget} bytes")]
    CapacityExceeded { needed: usize, budget: usize },

    /// Key material is unusable for AES-256-GCM
    #[error("Invalid secret: {0}")]
    InvalidKey(String),

    /// The persistent store rejected an operation
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Authentication => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Serialization(_) | CacheError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::CapacityExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
            CacheError::InvalidKey(_) | CacheError::Encryption(_) | CacheError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::Authentication, StatusCode::UNPROCESSABLE_ENTITY),
            (
                CacheError::CapacityExceeded {
                    needed: 10,
                    budget: 5,
                },
                StatusCode::INSUFFICIENT_STORAGE,
            ),
            (
                CacheError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_capacity_message_mentions_sizes() {
        let err = CacheError::CapacityExceeded {
            needed: 300,
            budget: 200,
        };
        let msg = err.to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("200"));
    }
}

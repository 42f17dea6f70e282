//! # API Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function ── Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── CoreError::Validation ─────────► VALIDATION_ERROR (+ field)  │
//! │         ├── CoreError::InsufficientStock ──► INSUFFICIENT_STOCK         │
//! │         ├── CoreError::InvalidQuantity ────► INVALID_QUANTITY           │
//! │         ├── CoreError::*NotFound ──────────► NOT_FOUND                  │
//! │         └── ConfigError ───────────────────► CONFIG_ERROR               │
//! │                                                                         │
//! │  Narrative failures never get here: the advisor answers with an        │
//! │  estimate instead.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for Milk 1L: available 3, requested 5" }
//! { "code": "VALIDATION_ERROR", "message": "unit_price must be ...", "field": "unit_price" }
//! ```

use serde::Serialize;
use stockroom_core::CoreError;

use crate::config::ConfigError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Form field that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    InvalidQuantity,
    ConfigError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn not_found(resource: &str, id: u64) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", id),
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ CoreError::InvalidQuantity { .. } => {
                ApiError::new(ErrorCode::InvalidQuantity, e.to_string())
            }
            CoreError::Validation(e) => ApiError {
                code: ErrorCode::ValidationError,
                field: Some(e.field().to_string()),
                message: e.to_string(),
            },
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

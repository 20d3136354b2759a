//! Typed error handling for the menu resource service
//!
//! Callers get a concrete error hierarchy instead of an opaque
//! `anyhow::Error`, so an HTTP layer (or any other client) can match on the
//! exact failure.
//!
//! # Error Categories
//!
//! - [`MenuError`]: business-rule violations on menu resources
//! - [`ValidationError`]: malformed input rejected before storage access
//! - [`StorageError`]: failures reported by a storage backend
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match service.add_menu(menu).await {
//!     Ok(id) => println!("created menu {}", id),
//!     Err(UpmsError::Menu(MenuError::DuplicateKey { menu_code })) => {
//!         println!("{} is taken", menu_code);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Result alias used across the crate
pub type UpmsResult<T> = Result<T, UpmsError>;

/// The main error type of the crate
#[derive(Debug)]
pub enum UpmsError {
    /// Menu business-rule errors
    Menu(MenuError),

    /// Input validation errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for UpmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpmsError::Menu(e) => write!(f, "{}", e),
            UpmsError::Validation(e) => write!(f, "{}", e),
            UpmsError::Storage(e) => write!(f, "{}", e),
            UpmsError::Config(e) => write!(f, "{}", e),
            UpmsError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for UpmsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpmsError::Menu(e) => Some(e),
            UpmsError::Validation(e) => Some(e),
            UpmsError::Storage(e) => Some(e),
            UpmsError::Config(e) => Some(e),
            UpmsError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl UpmsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpmsError::Menu(e) => e.status_code(),
            UpmsError::Validation(_) => StatusCode::BAD_REQUEST,
            UpmsError::Storage(e) => e.status_code(),
            UpmsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UpmsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            UpmsError::Menu(e) => e.error_code(),
            UpmsError::Validation(_) => "VALIDATION_ERROR",
            UpmsError::Storage(e) => e.error_code(),
            UpmsError::Config(_) => "CONFIG_ERROR",
            UpmsError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            UpmsError::Menu(MenuError::DuplicateKey { menu_code }) => {
                Some(serde_json::json!({ "menu_code": menu_code }))
            }
            UpmsError::Menu(
                MenuError::NotFound { menu_id }
                | MenuError::ProtectedResource { menu_id }
                | MenuError::ResourceInUse { menu_id },
            ) => Some(serde_json::json!({ "menu_id": menu_id })),
            UpmsError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for UpmsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Menu Errors
// =============================================================================

/// Business-rule violations on menu resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Another menu already uses this code
    DuplicateKey { menu_code: String },

    /// No menu with this id
    NotFound { menu_id: i64 },

    /// Menu is flagged `is_persist` and cannot be removed
    ProtectedResource { menu_id: i64 },

    /// Menu authority is still granted to a subject
    ResourceInUse { menu_id: i64 },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::DuplicateKey { menu_code } => {
                write!(f, "Menu code '{}' already exists", menu_code)
            }
            MenuError::NotFound { menu_id } => {
                write!(f, "Menu with id '{}' not found", menu_id)
            }
            MenuError::ProtectedResource { menu_id } => {
                write!(
                    f,
                    "Menu '{}' is reserved system data and cannot be removed",
                    menu_id
                )
            }
            MenuError::ResourceInUse { menu_id } => {
                write!(
                    f,
                    "Menu '{}' is granted to at least one subject; revoke the grants and try again",
                    menu_id
                )
            }
        }
    }
}

impl std::error::Error for MenuError {}

impl MenuError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MenuError::DuplicateKey { .. } => StatusCode::CONFLICT,
            MenuError::NotFound { .. } => StatusCode::NOT_FOUND,
            MenuError::ProtectedResource { .. } => StatusCode::FORBIDDEN,
            MenuError::ResourceInUse { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            MenuError::DuplicateKey { .. } => "MENU_DUPLICATE_KEY",
            MenuError::NotFound { .. } => "MENU_NOT_FOUND",
            MenuError::ProtectedResource { .. } => "MENU_PROTECTED",
            MenuError::ResourceInUse { .. } => "MENU_IN_USE",
        }
    }
}

impl From<MenuError> for UpmsError {
    fn from(err: MenuError) -> Self {
        UpmsError::Menu(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for UpmsError {
    fn from(err: ValidationError) -> Self {
        UpmsError::Validation(err)
    }
}

impl From<serde_json::Error> for UpmsError {
    fn from(err: serde_json::Error) -> Self {
        UpmsError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A unique constraint rejected the write
    UniqueViolation { constraint: String, value: String },

    /// Query execution error
    QueryError { backend: String, message: String },

    /// Transaction could not be started, committed or rolled back
    TransactionError { message: String },

    /// A lock guarding the backend state was poisoned
    LockPoisoned { message: String },
}

/// Name of the unique constraint on `menu_code`
pub const MENU_CODE_CONSTRAINT: &str = "uk_menu_code";

/// Name of the unique constraint on `operation_code`
pub const OPERATION_CODE_CONSTRAINT: &str = "uk_operation_code";

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::UniqueViolation { constraint, value } => {
                write!(
                    f,
                    "Unique constraint '{}' violated by value '{}'",
                    constraint, value
                )
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::TransactionError { message } => {
                write!(f, "Transaction error: {}", message)
            }
            StorageError::LockPoisoned { message } => {
                write!(f, "Storage lock poisoned: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::UniqueViolation { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::UniqueViolation { .. } => "STORAGE_UNIQUE_VIOLATION",
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
            StorageError::TransactionError { .. } => "STORAGE_TRANSACTION_ERROR",
            StorageError::LockPoisoned { .. } => "STORAGE_LOCK_POISONED",
        }
    }
}

impl From<StorageError> for UpmsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { constraint, value }
                if constraint == MENU_CODE_CONSTRAINT =>
            {
                UpmsError::Menu(MenuError::DuplicateKey { menu_code: value })
            }
            other => UpmsError::Storage(other),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for UpmsError {
    fn from(err: ConfigError) -> Self {
        UpmsError::Config(err)
    }
}

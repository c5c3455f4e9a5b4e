//! Error types for API calls, schema declarations and configuration.
//!
//! The casting and materialization engine has no error kind of its own:
//! failed calls surface as [`ApiError`], produced by the transport and
//! forwarded untouched.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Category of an API failure, as reported in the error envelope's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    ApiError,
    CardError,
    IdempotencyError,
    InvalidRequestError,
    AuthenticationError,
    RateLimitError,
    /// The request never produced a response (DNS, TLS, timeout, ...).
    NetworkError,
    /// A type this library does not know about yet.
    Other(String),
}

impl ApiErrorKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "api_error" => ApiErrorKind::ApiError,
            "card_error" => ApiErrorKind::CardError,
            "idempotency_error" => ApiErrorKind::IdempotencyError,
            "invalid_request_error" => ApiErrorKind::InvalidRequestError,
            "authentication_error" => ApiErrorKind::AuthenticationError,
            "rate_limit_error" => ApiErrorKind::RateLimitError,
            "network_error" => ApiErrorKind::NetworkError,
            other => ApiErrorKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApiErrorKind::ApiError => "api_error",
            ApiErrorKind::CardError => "card_error",
            ApiErrorKind::IdempotencyError => "idempotency_error",
            ApiErrorKind::InvalidRequestError => "invalid_request_error",
            ApiErrorKind::AuthenticationError => "authentication_error",
            ApiErrorKind::RateLimitError => "rate_limit_error",
            ApiErrorKind::NetworkError => "network_error",
            ApiErrorKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed API call.
///
/// Interpreting the contents (validation vs. authentication vs. rate limit)
/// is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// Machine-readable code such as `resource_missing` or `card_declined`.
    pub code: Option<String>,
    pub message: String,
    /// The offending request field, when the API names one.
    pub param: Option<String>,
    pub decline_code: Option<String>,
    /// HTTP status. `None` when no response was received.
    pub status: Option<u16>,
    pub request_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            param: None,
            decline_code: None,
            status: None,
            request_id: None,
        }
    }

    /// Error for a request that failed before a response was received.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NetworkError, message)
    }

    /// Error for a request rejected locally because `param` is missing or invalid.
    pub fn invalid_request(message: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            param: Some(param.into()),
            ..Self::new(ApiErrorKind::InvalidRequestError, message)
        }
    }

    /// Decode a non-2xx response.
    ///
    /// Bodies that are not an `{"error": {...}}` envelope become an
    /// `api_error` carrying the raw body as message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => Self {
                kind: error
                    .kind
                    .as_deref()
                    .map(ApiErrorKind::parse)
                    .unwrap_or(ApiErrorKind::ApiError),
                code: error.code,
                message: error
                    .message
                    .unwrap_or_else(|| format!("request failed with status {}", status)),
                param: error.param,
                decline_code: error.decline_code,
                status: Some(status),
                request_id: None,
            },
            Err(_) => Self {
                status: Some(status),
                ..Self::new(ApiErrorKind::ApiError, body.trim())
            },
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Single schema declaration error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid entry.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Errors while loading a schema declaration.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema declaration with {} error(s)", errors.len())]
    InvalidDeclaration { errors: Vec<SchemaError> },

    #[error("invalid field at {path}: expected array or object, got {actual}")]
    InvalidFieldType { path: String, actual: String },

    #[error("unknown operation \"{value}\" at {path}: expected create, update, or retrieve")]
    UnknownOperation { path: String, value: String },

    #[error("empty operation list at {path}")]
    EmptyOperations { path: String },
}

impl SchemaLoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SchemaLoadError::FileNotFound { .. } | SchemaLoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("no API key configured (set api_key or {var})")]
    MissingApiKey { var: &'static str },
}

impl ConfigError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::FileNotFound { .. } | ConfigError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

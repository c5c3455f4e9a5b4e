//! Core types shared by casting, transport and request orchestration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operation names accepted in schema declarations.
pub const VALID_OPERATIONS: &[&str] = &["create", "update", "retrieve"];

/// Field name carrying the resource kind in API responses.
pub const DISCRIMINATOR: &str = "object";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Operation a field may participate in.
///
/// A schema leaf lists the operations allowed to set that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Retrieve,
}

impl Operation {
    /// Parse an operation name. Matching is case-insensitive.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Some(Operation::Create),
            "update" => Some(Operation::Update),
            "retrieve" => Some(Operation::Retrieve),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Retrieve => "retrieve",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verb used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options handed through to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Secret key sent as a bearer token.
    pub api_key: String,
    /// Connected account the call is made on behalf of.
    pub connect_account: Option<String>,
    /// Pinned API version. The account default is used when unset.
    pub api_version: Option<String>,
    pub idempotency_key: Option<String>,
}

impl RequestOptions {
    /// Create options carrying only an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Act on behalf of a connected account.
    pub fn connect_account(mut self, account: impl Into<String>) -> Self {
        self.connect_account = Some(account.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

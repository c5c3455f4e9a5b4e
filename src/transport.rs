//! Transport seam between request orchestration and the network.
//!
//! The orchestrator only talks to [`Transport`]. [`HttpTransport`] is the
//! blocking HTTP implementation (requires the `remote` feature, enabled by
//! default); tests substitute their own.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::types::{Method, RequestOptions};

#[cfg(feature = "remote")]
use std::time::Duration;

#[cfg(feature = "remote")]
use crate::config::ClientConfig;

/// Multipart body for file uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// What the file will be used for, e.g. `dispute_evidence`.
    pub purpose: String,
    pub path: PathBuf,
}

impl FileUpload {
    pub fn new(purpose: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            purpose: purpose.into(),
            path: path.into(),
        }
    }
}

/// Issues requests and returns the decoded JSON payload.
///
/// Implementations own timeouts, authentication headers and body encoding.
/// Any failure, including a non-2xx response, is returned as [`ApiError`].
pub trait Transport {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: &Map<String, Value>,
        query: &Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError>;

    fn request_file_upload(
        &self,
        method: Method,
        path: &str,
        body: &FileUpload,
        query: &Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: &Map<String, Value>,
        query: &Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        (**self).request(method, path, body, query, options)
    }

    fn request_file_upload(
        &self,
        method: Method,
        path: &str,
        body: &FileUpload,
        query: &Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        (**self).request_file_upload(method, path, body, query, options)
    }
}

/// Flatten a body into form pairs using bracket notation.
///
/// Nested mappings become `parent[child]`, sequences `parent[0]`. `null`
/// encodes as an empty string, which the API reads as "clear this field".
///
/// ```
/// use serde_json::json;
/// use stripe_cast::encode_form;
///
/// let body = json!({ "card": { "number": "4242", "exp_month": 12 }, "email": null });
/// let pairs = encode_form(body.as_object().unwrap());
///
/// assert!(pairs.contains(&("card[number]".to_string(), "4242".to_string())));
/// assert!(pairs.contains(&("card[exp_month]".to_string(), "12".to_string())));
/// assert!(pairs.contains(&("email".to_string(), String::new())));
/// ```
pub fn encode_form(body: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in body {
        encode_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn encode_value(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((key, String::new())),
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                encode_value(format!("{}[{}]", key, i), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                encode_value(format!("{}[{}]", key, sub), item, pairs);
            }
        }
    }
}

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Default base URL for file uploads.
pub const DEFAULT_UPLOAD_BASE: &str = "https://files.stripe.com/v1";

/// Blocking HTTP transport.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    api_base: String,
    upload_base: String,
}

#[cfg(feature = "remote")]
impl HttpTransport {
    /// Create a transport for the given base URLs.
    ///
    /// # Errors
    ///
    /// Returns a `network_error` if the HTTP client cannot be initialized.
    pub fn new(
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stripe-cast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base.clone(),
            config.upload_base.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn builder(
        &self,
        base: &str,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}/{}", base, path.trim_start_matches('/'));
        let verb = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(verb, url).bearer_auth(&options.api_key);
        if let Some(account) = &options.connect_account {
            builder = builder.header("Stripe-Account", account);
        }
        if let Some(version) = &options.api_version {
            builder = builder.header("Stripe-Version", version);
        }
        if let Some(key) = &options.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }
        builder
    }
}

#[cfg(feature = "remote")]
impl Transport for HttpTransport {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: &Map<String, Value>,
        query: &Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        let mut params = encode_form(query);
        let builder = self.builder(&self.api_base, method, path, options);

        // GET and DELETE carry no body; send its fields as query parameters
        let builder = match method {
            Method::Post => builder.query(&params).form(&encode_form(body)),
            Method::Get | Method::Delete => {
                params.extend(encode_form(body));
                builder.query(&params)
            }
        };

        tracing::debug!(%method, path, "sending request");
        send(builder, method, path)
    }

    fn request_file_upload(
        &self,
        method: Method,
        path: &str,
        body: &FileUpload,
        query: &Map<String, Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        let form = reqwest::blocking::multipart::Form::new()
            .text("purpose", body.purpose.clone())
            .file("file", &body.path)
            .map_err(|e| {
                ApiError::invalid_request(
                    format!("cannot read {}: {}", body.path.display(), e),
                    "file",
                )
            })?;

        let builder = self
            .builder(&self.upload_base, method, path, options)
            .query(&encode_form(query))
            .multipart(form);

        tracing::debug!(%method, path, purpose = %body.purpose, "uploading file");
        send(builder, method, path)
    }
}

#[cfg(feature = "remote")]
fn send(
    builder: reqwest::blocking::RequestBuilder,
    method: Method,
    path: &str,
) -> Result<Value, ApiError> {
    let response = builder.send().map_err(|e| {
        tracing::warn!(%method, path, error = %e, "request failed to complete");
        ApiError::network(e.to_string())
    })?;

    let status = response.status();
    let request_id = response
        .headers()
        .get("request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let text = response
        .text()
        .map_err(|e| ApiError::network(e.to_string()))?;

    if !status.is_success() {
        let mut err = ApiError::from_response(status.as_u16(), &text);
        if let Some(id) = request_id {
            err = err.with_request_id(id);
        }
        tracing::warn!(%method, path, status = status.as_u16(), kind = %err.kind, "request rejected");
        return Err(err);
    }

    serde_json::from_str(&text).map_err(|e| {
        let mut err = ApiError::new(
            crate::error::ApiErrorKind::ApiError,
            format!("invalid JSON response: {}", e),
        );
        err.status = Some(status.as_u16());
        err
    })
}

//! Request orchestration - cast, send, materialize.
//!
//! Each function is a single stateless exchange. Transport errors are
//! returned exactly as produced; nothing is retried or logged here.

use serde_json::{Map, Value};

use crate::caster::cast;
use crate::error::ApiError;
use crate::object::{materialize_as, Object};
use crate::resource::ResourceKind;
use crate::schema::Schema;
use crate::transport::{FileUpload, Transport};
use crate::types::{Method, Operation, RequestOptions};

/// Create a resource: cast `changes` for create and POST them to `endpoint`.
///
/// # Errors
///
/// Returns the transport's `ApiError` unchanged.
pub fn create<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    changes: &Map<String, Value>,
    schema: &Schema,
    resource_type: ResourceKind,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    let body = cast(changes, schema, Operation::Create, &[]);
    let payload = transport.request(Method::Post, endpoint, &body, &Map::new(), options)?;
    Ok(materialize_as(&payload, resource_type))
}

/// Retrieve a resource with a bodiless GET.
///
/// # Errors
///
/// Returns the transport's `ApiError` unchanged.
pub fn retrieve<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    resource_type: ResourceKind,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    let payload = transport.request(Method::Get, endpoint, &Map::new(), &Map::new(), options)?;
    Ok(materialize_as(&payload, resource_type))
}

/// Update a resource: cast `changes` for update, keeping `nullable` clears,
/// and POST them to `endpoint`.
///
/// # Errors
///
/// Returns the transport's `ApiError` unchanged.
pub fn update<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    changes: &Map<String, Value>,
    schema: &Schema,
    nullable: &[&str],
    resource_type: ResourceKind,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    let body = cast(changes, schema, Operation::Update, nullable);
    let payload = transport.request(Method::Post, endpoint, &body, &Map::new(), options)?;
    Ok(materialize_as(&payload, resource_type))
}

/// Delete a resource. The response payload is discarded.
///
/// # Errors
///
/// Returns the transport's `ApiError` unchanged.
pub fn delete<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    options: &RequestOptions,
) -> Result<(), ApiError> {
    transport.request(Method::Delete, endpoint, &Map::new(), &Map::new(), options)?;
    Ok(())
}

/// List resources under `endpoint`, passing `params` as query parameters.
///
/// `params` is sent as-is; list filters are not schema-cast.
///
/// # Errors
///
/// Returns the transport's `ApiError` unchanged.
pub fn list<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    params: &Map<String, Value>,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    let payload = transport.request(Method::Get, endpoint, &Map::new(), params, options)?;
    Ok(materialize_as(&payload, ResourceKind::List))
}

/// Upload a file as multipart. No casting applies.
///
/// # Errors
///
/// Returns the transport's `ApiError` unchanged.
pub fn upload<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    file: &FileUpload,
    resource_type: ResourceKind,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    let payload = transport.request_file_upload(Method::Post, endpoint, file, &Map::new(), options)?;
    Ok(materialize_as(&payload, resource_type))
}

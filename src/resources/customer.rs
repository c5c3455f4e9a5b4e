//! Customers.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::object::Object;
use crate::request;
use crate::resource::ResourceKind;
use crate::schema::Schema;
use crate::transport::Transport;
use crate::types::{Operation, RequestOptions};

const ENDPOINT: &str = "customers";

/// Fields that may be cleared on update by sending `null`.
pub const NULLABLE_KEYS: &[&str] = &["default_source", "description", "email", "metadata"];

const WRITE: &[Operation] = &[Operation::Create, Operation::Update];

pub static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .field("balance", WRITE)
        .field("coupon", WRITE)
        .field("default_source", &[Operation::Update])
        .field("description", WRITE)
        .field("email", WRITE)
        .field("invoice_prefix", WRITE)
        .field("metadata", WRITE)
        .field("name", WRITE)
        .field("payment_method", &[Operation::Create])
        .field("phone", WRITE)
        .field("source", WRITE)
        .nested(
            "address",
            Schema::builder()
                .field("city", WRITE)
                .field("country", WRITE)
                .field("line1", WRITE)
                .field("line2", WRITE)
                .field("postal_code", WRITE)
                .field("state", WRITE),
        )
        .nested(
            "shipping",
            Schema::builder()
                .field("name", WRITE)
                .field("phone", WRITE)
                .nested(
                    "address",
                    Schema::builder()
                        .field("city", WRITE)
                        .field("country", WRITE)
                        .field("line1", WRITE)
                        .field("line2", WRITE)
                        .field("postal_code", WRITE)
                        .field("state", WRITE),
                ),
        )
        .build()
});

fn path(id: &str) -> String {
    format!("{}/{}", ENDPOINT, id)
}

pub fn create<T: Transport + ?Sized>(
    transport: &T,
    changes: &Map<String, Value>,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    request::create(
        transport,
        ENDPOINT,
        changes,
        &SCHEMA,
        ResourceKind::Customer,
        options,
    )
}

pub fn retrieve<T: Transport + ?Sized>(
    transport: &T,
    id: &str,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    request::retrieve(transport, &path(id), ResourceKind::Customer, options)
}

pub fn update<T: Transport + ?Sized>(
    transport: &T,
    id: &str,
    changes: &Map<String, Value>,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    request::update(
        transport,
        &path(id),
        changes,
        &SCHEMA,
        NULLABLE_KEYS,
        ResourceKind::Customer,
        options,
    )
}

pub fn delete<T: Transport + ?Sized>(
    transport: &T,
    id: &str,
    options: &RequestOptions,
) -> Result<(), ApiError> {
    request::delete(transport, &path(id), options)
}

/// One page of customers. `params` (e.g. `limit`, `starting_after`) is sent
/// as query parameters.
pub fn list<T: Transport + ?Sized>(
    transport: &T,
    params: &Map<String, Value>,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    request::list(transport, ENDPOINT, params, options)
}

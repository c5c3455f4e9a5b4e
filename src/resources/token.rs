//! Tokens for card and bank account details.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::object::Object;
use crate::request;
use crate::resource::ResourceKind;
use crate::schema::Schema;
use crate::transport::Transport;
use crate::types::{Operation, RequestOptions};

const ENDPOINT: &str = "tokens";

/// Fields accepted when creating a token.
pub static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder()
        .field("bank_account", &[Operation::Create])
        .field("card", &[Operation::Create])
        .field("customer", &[Operation::Create])
        .nested(
            "pii",
            Schema::builder().field("id_number", &[Operation::Create]),
        )
        .build()
});

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
        ResourceKind::Token,
        options,
    )
}

/// Create a token on a connected account, e.g. to share a platform
/// customer's card with it.
///
/// # Errors
///
/// Returns an `invalid_request_error` for `connect_account`, without
/// contacting the API, if `options` names no connected account.
pub fn create_on_account<T: Transport + ?Sized>(
    transport: &T,
    changes: &Map<String, Value>,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    if options.connect_account.is_none() {
        return Err(ApiError::invalid_request(
            "creating a token on a connected account requires connect_account",
            "connect_account",
        ));
    }
    create(transport, changes, options)
}

pub fn retrieve<T: Transport + ?Sized>(
    transport: &T,
    id: &str,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    request::retrieve(
        transport,
        &format!("{}/{}", ENDPOINT, id),
        ResourceKind::Token,
        options,
    )
}

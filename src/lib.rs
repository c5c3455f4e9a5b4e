//! Stripe Cast
//!
//! Schema-driven request casting and typed response materialization for the
//! Stripe API.
//!
//! Outgoing bodies are filtered against a per-field, per-operation
//! [`Schema`]; responses are turned into typed [`Resource`] values by their
//! `object` discriminator, nested resources included.
//!
//! # Example
//!
//! ```
//! use stripe_cast::{cast, materialize, Operation, ResourceKind, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .field("card", &[Operation::Create])
//!     .field("customer", &[Operation::Create])
//!     .build();
//!
//! let changes = json!({ "card": "card_tok", "customer": "cus_1", "unknown_field": 1 });
//! let body = cast(changes.as_object().unwrap(), &schema, Operation::Create, &[]);
//! assert_eq!(body.len(), 2);
//! assert!(body.get("unknown_field").is_none());
//!
//! let response = json!({
//!     "id": "tok_1",
//!     "object": "token",
//!     "card": { "id": "card_1", "object": "card", "last4": "4242" },
//!     "used": false
//! });
//! let token = materialize(&response);
//! let token = token.as_resource().unwrap();
//! assert_eq!(token.kind(), ResourceKind::Token);
//!
//! let card = token.get("card").and_then(|c| c.as_resource()).unwrap();
//! assert_eq!(card.kind(), ResourceKind::Card);
//! ```
//!
//! # Casting Rules
//!
//! | Schema entry | Input value | Result |
//! |--------------|-------------|--------|
//! | undeclared | any | dropped |
//! | leaf, op not listed | any | dropped |
//! | leaf, op listed | any | kept unchanged |
//! | composite | mapping | cast recursively |
//! | composite | sequence | each mapping cast, others dropped |
//! | composite, nullable on update | `null` | kept |
//! | composite | anything else | dropped |

mod caster;
mod config;
mod error;
mod object;
mod request;
mod resource;
pub mod resources;
mod schema;
mod transport;
mod types;

pub use caster::cast;
pub use config::{ClientConfig, ACCOUNT_VAR, API_BASE_VAR, API_KEY_VAR, API_VERSION_VAR};
pub use error::{ApiError, ApiErrorKind, ConfigError, SchemaError, SchemaLoadError};
pub use object::{materialize, materialize_as, Object};
pub use request::{create, delete, list, retrieve, update, upload};
pub use resource::{
    BankAccount, Card, Charge, Customer, File, List, Refund, Resource, ResourceKind, Token,
};
pub use schema::{Field, OperationSet, Schema, SchemaBuilder};
pub use transport::{
    encode_form, FileUpload, Transport, DEFAULT_API_BASE, DEFAULT_UPLOAD_BASE,
};
pub use types::{json_type_name, Method, Operation, RequestOptions, DISCRIMINATOR, VALID_OPERATIONS};

#[cfg(feature = "remote")]
pub use transport::HttpTransport;

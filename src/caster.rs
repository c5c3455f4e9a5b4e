//! Request body casting - filters a change map down to the fields a schema
//! permits for an operation.
//!
//! Casting is a structural filter, not a validator: undeclared fields and
//! fields not permitted for the operation are dropped silently, and values
//! are never rewritten. Rejecting bad payloads is left to the API.

use serde_json::{Map, Value};

use crate::schema::{Field, Schema};
use crate::types::Operation;

/// Cast `input` against `schema` for `op`.
///
/// Keeps each key that `schema` declares as permitted for `op`, with its
/// value unchanged. Composite fields holding a mapping (or a sequence of
/// mappings) are cast recursively against their sub-schema; a composite
/// counts as permitted when any field below it is.
///
/// `nullable` names top-level composite fields that may be cleared on
/// update by sending `null`. Leaf fields keep `null` without being listed.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use stripe_cast::{cast, Operation, Schema};
///
/// let schema = Schema::builder()
///     .field("card", &[Operation::Create])
///     .field("customer", &[Operation::Create])
///     .build();
///
/// let input = json!({ "card": "card_tok", "customer": "cus_1", "unknown_field": 1 });
/// let body = cast(input.as_object().unwrap(), &schema, Operation::Create, &[]);
///
/// assert_eq!(serde_json::Value::Object(body), json!({ "card": "card_tok", "customer": "cus_1" }));
/// ```
pub fn cast(
    input: &Map<String, Value>,
    schema: &Schema,
    op: Operation,
    nullable: &[&str],
) -> Map<String, Value> {
    let mut result = Map::new();

    for (key, value) in input {
        let Some(field) = schema.get(key) else {
            continue;
        };

        match field {
            Field::Leaf(ops) => {
                if ops.contains(op) {
                    result.insert(key.clone(), value.clone());
                }
            }
            Field::Composite(sub) if field.permits(op) => {
                if let Some(cast_value) = cast_composite(key, value, sub, op, nullable) {
                    result.insert(key.clone(), cast_value);
                }
            }
            Field::Composite(_) => {}
        }
    }

    result
}

fn cast_composite(
    key: &str,
    value: &Value,
    sub: &Schema,
    op: Operation,
    nullable: &[&str],
) -> Option<Value> {
    match value {
        Value::Object(map) => Some(Value::Object(cast(map, sub, op, &[]))),
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .filter_map(|item| item.as_object())
                .map(|map| Value::Object(cast(map, sub, op, &[])))
                .collect(),
        )),
        // Clearing a whole sub-object on update
        Value::Null if op == Operation::Update && nullable.contains(&key) => Some(Value::Null),
        _ => None,
    }
}

//! Response materialization - turns decoded JSON into typed resources.
//!
//! Any mapping whose `object` field names a known [`ResourceKind`] becomes
//! the matching [`Resource`]; everything else keeps its shape with its
//! children materialized, so resources nested inside anonymous containers
//! are still typed.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::resource::{Resource, ResourceKind};
use crate::types::DISCRIMINATOR;

/// A materialized response value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Object {
    /// JSON null, also used for declared attributes missing from a response.
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Object>),
    /// Mapping without a recognized discriminator.
    Map(BTreeMap<String, Object>),
    Resource(Box<Resource>),
}

impl Object {
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Object::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Object]> {
        match self {
            Object::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Object>> {
        match self {
            Object::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Object::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Object::Resource(resource) => Some(*resource),
            _ => None,
        }
    }

    /// Convert back to plain JSON. Resources keep their discriminator, so
    /// materializing the result again yields an equal value.
    pub fn to_value(&self) -> Value {
        match self {
            Object::Null => Value::Null,
            Object::Bool(b) => Value::Bool(*b),
            Object::Number(n) => Value::Number(n.clone()),
            Object::String(s) => Value::String(s.clone()),
            Object::List(items) => Value::Array(items.iter().map(Object::to_value).collect()),
            Object::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Object::Resource(resource) => resource.to_value(),
        }
    }
}

/// Materialize a decoded response.
///
/// - sequences are materialized element by element, order preserved
/// - mappings with a known discriminator become a [`Resource`]; undeclared
///   keys are dropped and missing attributes are [`Object::Null`]
/// - other mappings keep every key, values materialized
/// - scalars are returned unchanged
///
/// Unknown discriminators are not an error; such mappings are treated as
/// plain mappings.
pub fn materialize(raw: &Value) -> Object {
    match raw {
        Value::Null => Object::Null,
        Value::Bool(b) => Object::Bool(*b),
        Value::Number(n) => Object::Number(n.clone()),
        Value::String(s) => Object::String(s.clone()),
        Value::Array(items) => Object::List(items.iter().map(materialize).collect()),
        Value::Object(map) => match discriminate(map) {
            Some(kind) => Object::Resource(Box::new(kind.build(map))),
            None => materialize_map(map),
        },
    }
}

/// Materialize a response expected to be of kind `expected`.
///
/// A top-level mapping with no `object` field at all is built as
/// `expected`. A mapping with any discriminator, known or not, and every
/// non-mapping value follow [`materialize`].
pub fn materialize_as(raw: &Value, expected: ResourceKind) -> Object {
    match raw {
        Value::Object(map) if !map.contains_key(DISCRIMINATOR) => {
            Object::Resource(Box::new(expected.build(map)))
        }
        other => materialize(other),
    }
}

fn discriminate(map: &Map<String, Value>) -> Option<ResourceKind> {
    map.get(DISCRIMINATOR)
        .and_then(Value::as_str)
        .and_then(ResourceKind::from_discriminator)
}

fn materialize_map(map: &Map<String, Value>) -> Object {
    Object::Map(
        map.iter()
            .map(|(k, v)| (k.clone(), materialize(v)))
            .collect(),
    )
}

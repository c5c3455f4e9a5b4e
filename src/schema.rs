//! Declarative field schemas.
//!
//! A [`Schema`] maps each field name to either the set of operations that
//! may set it, or a nested schema for composite fields. Schemas are built
//! once per resource and never mutated afterwards; share them by reference.
//!
//! ```
//! use stripe_cast::{Operation, Schema};
//!
//! let schema = Schema::builder()
//!     .field("card", &[Operation::Create])
//!     .nested(
//!         "pii",
//!         Schema::builder().field("id_number", &[Operation::Create]),
//!     )
//!     .build();
//!
//! assert!(schema.permits("card", Operation::Create));
//! assert!(!schema.permits("card", Operation::Update));
//! assert!(schema.permits("pii", Operation::Create));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Map, Value};

use crate::error::{SchemaError, SchemaLoadError};
use crate::types::{json_type_name, Operation};

/// Ordered, duplicate-free, non-empty set of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSet(Vec<Operation>);

impl OperationSet {
    /// Returns `None` when `ops` is empty.
    pub fn new(ops: &[Operation]) -> Option<Self> {
        let mut set = Vec::with_capacity(ops.len());
        for op in ops {
            if !set.contains(op) {
                set.push(*op);
            }
        }
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    pub fn contains(&self, op: Operation) -> bool {
        self.0.contains(&op)
    }

    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        self.0.iter().copied()
    }
}

/// Schema entry for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Scalar (or opaque) field settable by the listed operations.
    Leaf(OperationSet),
    /// Field whose value is itself a mapping with its own schema.
    Composite(Schema),
}

impl Field {
    /// Whether `op` may reference this field.
    ///
    /// A composite field is referenced by `op` when any field below it is.
    pub fn permits(&self, op: Operation) -> bool {
        match self {
            Field::Leaf(ops) => ops.contains(op),
            Field::Composite(schema) => schema.fields.values().any(|f| f.permits(op)),
        }
    }
}

/// Immutable tree of field declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `name` is declared and may be referenced by `op`.
    pub fn permits(&self, name: &str, op: Operation) -> bool {
        self.get(name).map(|f| f.permits(op)).unwrap_or(false)
    }

    /// Top-level field names referenced by `op`, in name order.
    pub fn permitted_keys(&self, op: Operation) -> Vec<&str> {
        self.fields()
            .filter(|(_, field)| field.permits(op))
            .map(|(name, _)| name)
            .collect()
    }

    /// Parse a schema declaration.
    ///
    /// The declaration maps each field to an array of operation names, or
    /// to a nested declaration:
    ///
    /// ```json
    /// { "card": ["create"], "metadata": { "order_id": ["create", "update"] } }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError::InvalidDeclaration` listing every structural
    /// problem, or `UnknownOperation` / `EmptyOperations` for bad leaves.
    pub fn from_json(declaration: &Value) -> Result<Self, SchemaLoadError> {
        check_declaration(declaration)?;
        match declaration {
            Value::Object(map) => parse_node(map, ""),
            other => Err(SchemaLoadError::InvalidFieldType {
                path: String::new(),
                actual: json_type_name(other).to_string(),
            }),
        }
    }

    /// Parse a schema declaration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, SchemaLoadError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|source| SchemaLoadError::InvalidJson { source })?;
        Self::from_json(&value)
    }

    /// Load a schema declaration from a file path.
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError::FileNotFound` if the file doesn't exist,
    /// or `SchemaLoadError::InvalidJson` if the file isn't valid JSON.
    pub fn load(path: &Path) -> Result<Self, SchemaLoadError> {
        if !path.exists() {
            return Err(SchemaLoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|source| SchemaLoadError::ReadError {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_json_str(&content)
    }
}

/// Builder for statically declared schemas.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: BTreeMap<String, Field>,
}

impl SchemaBuilder {
    /// Declare a leaf field.
    ///
    /// # Panics
    ///
    /// Panics if `ops` is empty; every declared field must be settable by
    /// at least one operation.
    pub fn field(mut self, name: &str, ops: &[Operation]) -> Self {
        let set = OperationSet::new(ops)
            .unwrap_or_else(|| panic!("field `{}` declared with no operations", name));
        self.fields.insert(name.to_string(), Field::Leaf(set));
        self
    }

    /// Declare a composite field with its own sub-schema.
    pub fn nested(mut self, name: &str, schema: SchemaBuilder) -> Self {
        self.fields
            .insert(name.to_string(), Field::Composite(schema.build()));
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

/// Structural check of a declaration against the declaration meta-schema.
fn check_declaration(declaration: &Value) -> Result<(), SchemaLoadError> {
    let meta = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {
            "node": {
                "type": "object",
                "additionalProperties": {
                    "oneOf": [
                        { "type": "array", "items": { "type": "string" } },
                        { "$ref": "#/$defs/node" }
                    ]
                }
            }
        },
        "$ref": "#/$defs/node"
    });

    let validator = jsonschema::validator_for(&meta).map_err(|e| {
        SchemaLoadError::InvalidDeclaration {
            errors: vec![SchemaError {
                path: String::new(),
                message: e.to_string(),
            }],
        }
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(declaration)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaLoadError::InvalidDeclaration { errors })
    }
}

fn parse_node(map: &Map<String, Value>, path: &str) -> Result<Schema, SchemaLoadError> {
    let mut fields = BTreeMap::new();

    for (name, entry) in map {
        let field_path = format!("{}/{}", path, name);
        let field = match entry {
            Value::Array(items) => Field::Leaf(parse_operations(items, &field_path)?),
            Value::Object(sub) => Field::Composite(parse_node(sub, &field_path)?),
            other => {
                return Err(SchemaLoadError::InvalidFieldType {
                    path: field_path,
                    actual: json_type_name(other).to_string(),
                })
            }
        };
        fields.insert(name.clone(), field);
    }

    Ok(Schema { fields })
}

fn parse_operations(items: &[Value], path: &str) -> Result<OperationSet, SchemaLoadError> {
    let mut ops = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}/{}", path, i);
        let Some(name) = item.as_str() else {
            return Err(SchemaLoadError::InvalidFieldType {
                path: item_path,
                actual: json_type_name(item).to_string(),
            });
        };
        let op = Operation::parse(name).ok_or_else(|| SchemaLoadError::UnknownOperation {
            path: item_path,
            value: name.to_string(),
        })?;
        ops.push(op);
    }

    OperationSet::new(&ops).ok_or_else(|| SchemaLoadError::EmptyOperations {
        path: path.to_string(),
    })
}

//! Integration tests for request body casting.

use serde_json::{json, Map, Value};
use stripe_cast::resources::{customer, token};
use stripe_cast::{cast, Operation, Schema};

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn all_ops() -> [Operation; 3] {
    [Operation::Create, Operation::Update, Operation::Retrieve]
}

// === Field Filtering ===

mod filtering {
    use super::*;

    #[test]
    fn token_create_scenario() {
        let input = obj(json!({ "card": "card_tok", "customer": "cus_1", "unknown_field": 1 }));
        let result = cast(&input, &token::SCHEMA, Operation::Create, &[]);
        assert_eq!(
            Value::Object(result),
            json!({ "card": "card_tok", "customer": "cus_1" })
        );
    }

    #[test]
    fn token_fields_dropped_for_update() {
        let input = obj(json!({ "card": "card_tok", "customer": "cus_1" }));
        let result = cast(&input, &token::SCHEMA, Operation::Update, &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn output_keys_are_subset_of_input_and_permitted() {
        let input = obj(json!({
            "email": "jenny@example.com",
            "default_source": "card_1",
            "payment_method": "pm_1",
            "address": { "city": "Paris" },
            "livemode": true,
            "id": "cus_1"
        }));

        for op in all_ops() {
            let result = cast(&input, &customer::SCHEMA, op, &[]);
            let permitted = customer::SCHEMA.permitted_keys(op);
            for key in result.keys() {
                assert!(input.contains_key(key), "{} not in input", key);
                assert!(
                    permitted.contains(&key.as_str()),
                    "{} not permitted for {}",
                    key,
                    op
                );
            }
        }
    }

    #[test]
    fn create_only_field_dropped_on_update() {
        let input = obj(json!({ "payment_method": "pm_1", "email": "a@b.c" }));
        let result = cast(&input, &customer::SCHEMA, Operation::Update, &[]);
        assert_eq!(Value::Object(result), json!({ "email": "a@b.c" }));
    }

    #[test]
    fn deeply_nested_composites() {
        let input = obj(json!({
            "shipping": {
                "name": "Jenny",
                "carrier": "ups",
                "address": { "line1": "1 Main St", "planet": "Earth" }
            }
        }));
        let result = cast(&input, &customer::SCHEMA, Operation::Create, &[]);
        assert_eq!(
            Value::Object(result),
            json!({ "shipping": { "name": "Jenny", "address": { "line1": "1 Main St" } } })
        );
    }

    #[test]
    fn empty_input_casts_to_empty() {
        let result = cast(&Map::new(), &customer::SCHEMA, Operation::Create, &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn empty_schema_drops_everything() {
        let input = obj(json!({ "card": "card_tok" }));
        let result = cast(&input, &Schema::default(), Operation::Create, &[]);
        assert!(result.is_empty());
    }
}

// === Idempotence ===

mod idempotence {
    use super::*;

    #[test]
    fn casting_twice_is_the_same_as_once() {
        let input = obj(json!({
            "email": "a@b.c",
            "bogus": [1, 2],
            "address": { "city": "Paris", "planet": "Earth" },
            "shipping": [{ "name": "x" }],
            "metadata": null,
            "default_source": "card_1"
        }));

        for op in all_ops() {
            let once = cast(&input, &customer::SCHEMA, op, customer::NULLABLE_KEYS);
            let twice = cast(&once, &customer::SCHEMA, op, customer::NULLABLE_KEYS);
            assert_eq!(once, twice, "not idempotent for {}", op);
        }
    }
}

// === Nullable Keys ===

mod nullable {
    use super::*;

    #[test]
    fn nullable_leaf_clear_survives_update() {
        let input = obj(json!({ "description": null, "default_source": null }));
        let result = cast(&input, &customer::SCHEMA, Operation::Update, customer::NULLABLE_KEYS);
        assert_eq!(
            Value::Object(result),
            json!({ "description": null, "default_source": null })
        );
    }

    #[test]
    fn clear_marker_dropped_when_not_declared_for_update() {
        let schema = Schema::builder()
            .field("source", &[Operation::Create])
            .nested(
                "pii",
                Schema::builder().field("id_number", &[Operation::Create]),
            )
            .build();
        let input = obj(json!({ "source": null, "pii": null }));
        let result = cast(&input, &schema, Operation::Update, &["source", "pii"]);
        assert!(result.is_empty());
    }

    #[test]
    fn nullable_composite_cleared_on_update() {
        let input = obj(json!({ "address": null }));
        let result = cast(&input, &customer::SCHEMA, Operation::Update, &["address"]);
        assert_eq!(Value::Object(result), json!({ "address": null }));
    }
}

// === Declared Schemas ===

mod declared {
    use super::*;

    #[test]
    fn json_declaration_casts_like_builder() {
        let declared = Schema::from_json(&json!({
            "bank_account": ["create"],
            "card": ["create"],
            "customer": ["create"],
            "pii": { "id_number": ["create"] }
        }))
        .unwrap();
        assert_eq!(&declared, &*token::SCHEMA);

        let input = obj(json!({ "pii": { "id_number": "000000000", "dob": "1990" } }));
        assert_eq!(
            cast(&input, &declared, Operation::Create, &[]),
            cast(&input, &token::SCHEMA, Operation::Create, &[])
        );
    }
}

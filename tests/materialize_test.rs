//! Integration tests for response materialization.

use serde_json::{json, Value};
use stripe_cast::{materialize, Card, Object, Resource, ResourceKind, Token};

fn token_payload() -> Value {
    json!({
        "id": "tok_1",
        "object": "token",
        "card": {
            "id": "card_1",
            "object": "card",
            "brand": "Visa",
            "exp_month": 8,
            "exp_year": 2030,
            "last4": "4242",
            "metadata": {}
        },
        "client_ip": null,
        "created": 1462905355,
        "livemode": false,
        "type": "card",
        "used": false
    })
}

// === Typed Resources ===

mod typed {
    use super::*;

    #[test]
    fn token_with_nested_card() {
        let object = materialize(&token_payload());
        let resource = object.into_resource().unwrap();
        let token = Token::try_from(resource).unwrap();

        assert_eq!(token.id.as_str(), Some("tok_1"));
        assert_eq!(token.object.as_str(), Some("token"));
        assert_eq!(token.type_.as_str(), Some("card"));
        assert_eq!(token.used.as_bool(), Some(false));
        assert_eq!(token.created.as_i64(), Some(1462905355));
        assert!(token.client_ip.is_null());

        let card = Card::try_from(token.card.into_resource().unwrap()).unwrap();
        assert_eq!(card.id.as_str(), Some("card_1"));
        assert_eq!(card.last4.as_str(), Some("4242"));
        assert_eq!(card.exp_year.as_i64(), Some(2030));
        assert!(card.metadata.as_map().unwrap().is_empty());
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let object = materialize(&json!({
            "id": "re_1",
            "object": "refund",
            "amount": 500,
            "brand_new_field": "x"
        }));
        let refund = object.as_resource().unwrap();
        assert_eq!(refund.kind(), ResourceKind::Refund);
        assert!(refund.get("brand_new_field").is_none());
        assert!(!refund.to_value().as_object().unwrap().contains_key("brand_new_field"));
    }

    #[test]
    fn missing_attributes_are_null() {
        let object = materialize(&json!({ "object": "customer", "id": "cus_1" }));
        let customer = object.as_resource().unwrap();
        assert_eq!(customer.get("email"), Some(&Object::Null));
        assert_eq!(customer.get("sources"), Some(&Object::Null));
    }

    #[test]
    fn every_declared_attribute_is_present() {
        for kind in ResourceKind::ALL {
            let raw = json!({ "object": kind.discriminator() });
            let resource = kind.build(raw.as_object().unwrap());
            for attr in kind.attributes() {
                assert!(resource.get(attr).is_some(), "{} lacks {}", kind.discriminator(), attr);
            }
            let wire = resource.to_value();
            assert_eq!(wire.as_object().unwrap().len(), kind.attributes().len());
        }
    }

    #[test]
    fn list_data_is_materialized() {
        let object = materialize(&json!({
            "object": "list",
            "url": "/v1/customers",
            "has_more": true,
            "data": [
                { "object": "customer", "id": "cus_1" },
                { "object": "customer", "id": "cus_2" }
            ]
        }));
        let list = object.as_resource().unwrap();
        assert_eq!(list.kind(), ResourceKind::List);
        assert_eq!(list.get("has_more").and_then(Object::as_bool), Some(true));

        let data = list.get("data").and_then(Object::as_list).unwrap();
        let ids: Vec<_> = data
            .iter()
            .map(|c| c.as_resource().unwrap().get("id").and_then(Object::as_str).unwrap())
            .collect();
        assert_eq!(ids, vec!["cus_1", "cus_2"]);
    }
}

// === Structural Fallback ===

mod fallback {
    use super::*;

    #[test]
    fn unknown_discriminator_keeps_every_key() {
        let object = materialize(&json!({
            "object": "widget",
            "id": "wid_1",
            "card": { "object": "card", "id": "card_1" }
        }));
        let map = object.as_map().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["object"].as_str(), Some("widget"));
        assert_eq!(map["card"].as_resource().unwrap().kind(), ResourceKind::Card);
    }

    #[test]
    fn anonymous_container_types_nested_resources() {
        let object = materialize(&json!({
            "results": [{ "object": "charge", "id": "ch_1" }, 3],
            "meta": { "deep": { "object": "refund", "id": "re_1" } }
        }));
        let map = object.as_map().unwrap();
        let results = map["results"].as_list().unwrap();
        assert_eq!(results[0].as_resource().unwrap().kind(), ResourceKind::Charge);
        assert_eq!(results[1].as_i64(), Some(3));

        let deep = &map["meta"].as_map().unwrap()["deep"];
        assert_eq!(deep.as_resource().unwrap().kind(), ResourceKind::Refund);
    }

    #[test]
    fn sequences_preserve_length_and_order() {
        let raw = json!([
            { "object": "card", "id": "card_1" },
            "x",
            { "object": "widget" },
            [],
            null
        ]);
        let items = materialize(&raw);
        let items = items.as_list().unwrap();
        assert_eq!(items.len(), 5);
        assert!(items[0].as_resource().is_some());
        assert_eq!(items[1].as_str(), Some("x"));
        assert!(items[2].as_map().is_some());
        assert_eq!(items[3], Object::List(vec![]));
        assert!(items[4].is_null());
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(materialize(&json!([])), Object::List(vec![]));
    }
}

// === Idempotence ===

mod idempotence {
    use super::*;

    #[test]
    fn rematerializing_wire_form_is_identity() {
        let once = materialize(&token_payload());
        let twice = materialize(&once.to_value());
        assert_eq!(once, twice);
    }

    #[test]
    fn rematerializing_mixed_tree_is_identity() {
        let raw = json!({
            "object": "widget",
            "items": [token_payload(), { "object": "file", "id": "file_1", "type": "pdf" }],
            "count": 2
        });
        let once = materialize(&raw);
        assert_eq!(materialize(&once.to_value()), once);
    }

    #[test]
    fn serialized_resource_matches_wire_form() {
        let object = materialize(&token_payload());
        let Some(Resource::Token(token)) = object.as_resource() else {
            panic!("expected a token");
        };
        let serialized = serde_json::to_value(token).unwrap();
        assert_eq!(serialized["type"], json!("card"));
        assert_eq!(serialized, object.to_value());
    }
}

//! Integration tests for model-derived serializers

mod test_support;

use formwork_core::fields;
use formwork_core::{ModelSchema, ModelSerializer, Object, Serializer, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_generated_fields_follow_schema_order() {
    let def = ModelSerializer::builder(&test_support::note_schema()).build().unwrap();
    assert_eq!(def.name(), "NoteSerializer");
    assert_eq!(def.field_names(), ["id", "title", "body", "rank", "status", "pinned"]);
}

#[test]
fn test_only_restricts_and_orders() {
    let def = ModelSerializer::builder(&test_support::note_schema())
        .only(&["status", "title"])
        .build()
        .unwrap();
    assert_eq!(def.field_names(), ["status", "title"]);
}

#[test]
fn test_declared_fields_override_generated() {
    let def = ModelSerializer::builder(&test_support::note_schema())
        .only(&["title", "body"])
        .field("body", fields::text().write_only())
        .field("summary", fields::method(|note, _| {
            let title = note.attribute("title").map(Value::to_text).unwrap_or_default();
            Ok(Value::from(title.to_uppercase()))
        }))
        .build()
        .unwrap();
    assert_eq!(def.field_names(), ["title", "body", "summary"]);
    assert!(def.field("body").unwrap().write_only());

    let note = Object::new("Note").with("title", "hello").with("body", "secret");
    assert_eq!(
        Serializer::new(&def).serialize(&note.into()).unwrap().to_json(),
        json!({"title": "hello", "summary": "HELLO"})
    );
}

#[test]
fn test_model_validation_rules() {
    let def = ModelSerializer::builder(&test_support::note_schema()).build().unwrap();
    let serializer = Serializer::new(&def);

    let validated = serializer
        .validate(json!({"id": 99, "title": "Hello", "status": "p", "pinned": "false"}))
        .unwrap();
    assert_eq!(
        validated.to_json(),
        json!({"title": "Hello", "rank": 1, "status": "p", "pinned": false})
    );

    let errors = test_support::validation_errors(serializer.validate(json!({
        "title": "a title that is far too long",
        "rank": -1,
        "status": "x",
        "pinned": true
    })));
    assert_eq!(
        errors,
        json!({
            "title": "Ensure this field has no more than 20 characters.",
            "rank": "Ensure this value is greater than or equal to 0.",
            "status": "`x` is not a valid choice."
        })
    );
}

#[test]
fn test_model_create_uses_model_name() {
    let def = ModelSerializer::builder(&test_support::note_schema()).build().unwrap();
    let mut serializer = Serializer::new(&def).data(json!({"title": "Hi", "status": "d", "pinned": true}));
    assert!(serializer.is_valid().unwrap());
    let note = serializer.save().unwrap();
    assert_eq!(note.type_name(), "Note");
    assert_eq!(note.attribute("rank"), Some(&Value::Int(1)));
}

#[test]
fn test_schema_from_json() {
    let schema: ModelSchema = serde_json::from_value(json!({
        "name": "Tag",
        "fields": [
            {"name": "id", "type": "AutoField", "primary_key": true},
            {"name": "label", "type": "CharField", "max_length": 10, "blank": true},
            {"name": "created", "type": "DateTimeField", "editable": false}
        ]
    }))
    .unwrap();
    let def = ModelSerializer::builder(&schema).build().unwrap();
    let serializer = Serializer::new(&def);

    assert_eq!(serializer.validate(json!({})).unwrap().to_json(), json!({}));
    assert_eq!(
        serializer.validate(json!({"label": ""})).unwrap().to_json(),
        json!({"label": ""})
    );
}

//! Tests for the serializer pipeline
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

#[cfg(test)]
mod tests {
    use super::super::{ListSerializer, Serializer, SerializerDef, NON_FIELD_ERRORS};
    use crate::fields::{self, Choices};
    use crate::form::MultiDict;
    use crate::value::{Object, Value, BASIC_OBJECT};
    use crate::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, OnceLock};

    fn errors_of(result: crate::Result<Value>) -> serde_json::Value {
        match result {
            Err(Error::Validation(err)) => err.to_json(),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    fn nested_def() -> &'static Arc<SerializerDef> {
        static DEF: OnceLock<Arc<SerializerDef>> = OnceLock::new();
        DEF.get_or_init(|| {
            let inner = SerializerDef::builder("Inner")
                .field("one", fields::integer())
                .field("two", fields::integer())
                .build()
                .expect("inner serializer");
            SerializerDef::builder("Outer")
                .field("nested", inner.as_field())
                .build()
                .expect("outer serializer")
        })
    }

    #[test]
    fn test_required_field_omitted() {
        let def = SerializerDef::builder("Single")
            .field("integer", fields::integer())
            .build()
            .unwrap();
        let result = Serializer::new(&def).validate(json!({}));
        assert_eq!(errors_of(result), json!({"integer": "This field is required."}));
    }

    #[test]
    fn test_errors_are_collected_for_every_field() {
        let def = SerializerDef::builder("Many")
            .field("a", fields::integer())
            .field("b", fields::text())
            .field("c", fields::boolean())
            .field("d", fields::integer())
            .build()
            .unwrap();
        let result = Serializer::new(&def).validate(json!({"a": "x", "b": "", "c": "foo", "d": 4}));
        assert_eq!(
            errors_of(result),
            json!({
                "a": "A valid integer is required.",
                "b": "This field may not be blank.",
                "c": "`foo` is not a valid boolean."
            })
        );
    }

    #[test]
    fn test_default_and_read_only() {
        let def = SerializerDef::builder("Defaults")
            .field("integer", fields::integer().default(123))
            .field("id", fields::integer().read_only())
            .build()
            .unwrap();
        let serializer = Serializer::new(&def);
        assert_eq!(serializer.validate(json!({})).unwrap().to_json(), json!({"integer": 123}));
        assert_eq!(
            serializer.validate(json!({"id": 9, "integer": "4"})).unwrap().to_json(),
            json!({"integer": 4})
        );
    }

    #[test]
    fn test_write_only_excluded_from_output() {
        let def = SerializerDef::builder("Account")
            .field("username", fields::text())
            .field("password", fields::text().write_only())
            .build()
            .unwrap();
        let serializer = Serializer::new(&def);
        let account = Object::new("Account").with("username", "ada").with("password", "hunter2");
        assert_eq!(
            serializer.serialize(&account.into()).unwrap().to_json(),
            json!({"username": "ada"})
        );
        assert_eq!(
            serializer
                .validate(json!({"username": "ada", "password": "hunter2"}))
                .unwrap()
                .to_json(),
            json!({"username": "ada", "password": "hunter2"})
        );
    }

    #[test]
    fn test_dotted_source() {
        let def = SerializerDef::builder("User")
            .field("email", fields::text().source("profile.email"))
            .build()
            .unwrap();
        let serializer = Serializer::new(&def);

        let validated = serializer.validate(json!({"email": "a@b.c"})).unwrap();
        assert_eq!(validated.to_json(), json!({"profile": {"email": "a@b.c"}}));

        let user = Object::new("User").with("profile", Object::new("Profile").with("email", "x@y.z"));
        assert_eq!(
            serializer.serialize(&user.into()).unwrap().to_json(),
            json!({"email": "x@y.z"})
        );
    }

    #[test]
    fn test_missing_attribute_is_not_a_validation_error() {
        let def = SerializerDef::builder("User")
            .field("email", fields::text())
            .build()
            .unwrap();
        let err = Serializer::new(&def)
            .serialize(&Object::new("User").into())
            .unwrap_err();
        assert!(err.is_programmer_error());
    }

    #[test]
    fn test_nested_validate_and_serialize() {
        let serializer = Serializer::new(nested_def());
        let validated = serializer
            .validate(json!({"nested": {"one": "1", "two": "2"}}))
            .unwrap();
        assert_eq!(validated.to_json(), json!({"nested": {"one": 1, "two": 2}}));

        let instance = Object::new("Outer").with("nested", Object::new("Inner").with("one", 1).with("two", 2));
        assert_eq!(
            serializer.serialize(&instance.into()).unwrap().to_json(),
            json!({"nested": {"one": 1, "two": 2}})
        );
    }

    #[test]
    fn test_nested_errors_are_nested() {
        let result = Serializer::new(nested_def()).validate(json!({"nested": {"one": "x"}}));
        assert_eq!(
            errors_of(result),
            json!({"nested": {"one": "A valid integer is required.", "two": "This field is required."}})
        );

        let result = Serializer::new(nested_def()).validate(json!({"nested": 3}));
        assert_eq!(
            errors_of(result),
            json!({"nested": "Invalid data. Expected a dictionary, but got `int`."})
        );
    }

    #[test]
    fn test_nested_partial_propagates() {
        let serializer = Serializer::new(nested_def()).partial(true);
        let validated = serializer.validate(json!({"nested": {"one": "1"}})).unwrap();
        assert_eq!(validated.to_json(), json!({"nested": {"one": 1}}));
        assert_eq!(serializer.validate(json!({})).unwrap().to_json(), json!({}));
    }

    #[test]
    fn test_partial_is_per_instance() {
        let partial = Serializer::new(nested_def()).partial(true);
        let strict = Serializer::new(nested_def());
        assert!(partial.validate(json!({})).is_ok());
        assert!(strict.validate(json!({})).is_err());
        assert!(nested_def().field("nested").unwrap().required());
    }

    #[test]
    fn test_wildcard_nested_flattens() {
        let n1 = SerializerDef::builder("N1")
            .field("a", fields::integer())
            .field("b", fields::integer())
            .build()
            .unwrap();
        let n2 = SerializerDef::builder("N2")
            .field("c", fields::integer())
            .field("d", fields::integer())
            .build()
            .unwrap();
        let def = SerializerDef::builder("Flat")
            .field("n1", n1.as_field().source("*"))
            .field("n2", n2.as_field().source("*"))
            .build()
            .unwrap();
        let serializer = Serializer::new(&def);

        let validated = serializer
            .validate(json!({"n1": {"a": 1, "b": 2}, "n2": {"c": 3, "d": 4}}))
            .unwrap();
        assert_eq!(validated.to_json(), json!({"a": 1, "b": 2, "c": 3, "d": 4}));

        let instance = Object::new("Flat").with("a", 1).with("b", 2).with("c", 3).with("d", 4);
        assert_eq!(
            serializer.serialize(&instance.into()).unwrap().to_json(),
            json!({"n1": {"a": 1, "b": 2}, "n2": {"c": 3, "d": 4}})
        );
    }

    #[test]
    fn test_not_a_dict_at_top_level() {
        let result = Serializer::new(nested_def()).validate(json!([1, 2]));
        let mut expected = serde_json::Map::new();
        expected.insert(
            NON_FIELD_ERRORS.to_string(),
            json!("Invalid data. Expected a dictionary, but got `list`."),
        );
        assert_eq!(errors_of(result), serde_json::Value::Object(expected));
    }

    #[test]
    fn test_create_and_update() {
        let def = SerializerDef::builder("Note")
            .field("title", fields::text())
            .field("rank", fields::integer())
            .build()
            .unwrap();
        let serializer = Serializer::new(&def);

        let note = serializer.create(json!({"title": "hello", "rank": "2"})).unwrap();
        let mut note = note;
        assert_eq!(note.type_name(), BASIC_OBJECT);
        assert_eq!(note.attribute("rank"), Some(&Value::Int(2)));

        Serializer::new(&def)
            .partial(true)
            .update(&mut note, json!({"rank": 5}))
            .unwrap();
        assert_eq!(note.attribute("rank"), Some(&Value::Int(5)));
        assert_eq!(note.attribute("title"), Some(&Value::from("hello")));
    }

    #[test]
    fn test_create_hook() {
        let def = SerializerDef::builder("Tagged")
            .field("name", fields::text())
            .create_with(|validated| Ok(Value::Object(Object::new("Tag").with("label", validated["name"].clone()))))
            .build()
            .unwrap();
        let tag = Serializer::new(&def).create(json!({"name": "rust"})).unwrap();
        assert_eq!(tag.type_name(), "Tag");
        assert_eq!(tag.attribute("label"), Some(&Value::from("rust")));
    }

    #[test]
    fn test_create_as_typed() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Note {
            title: String,
            rank: i64,
        }

        let def = SerializerDef::builder("Note")
            .field("title", fields::text())
            .field("rank", fields::integer())
            .build()
            .unwrap();
        let note: Note = Serializer::new(&def)
            .create_as(json!({"title": "hello", "rank": "2"}))
            .unwrap();
        assert_eq!(note, Note { title: "hello".into(), rank: 2 });
    }

    #[test]
    fn test_is_valid_workflow() {
        let def = SerializerDef::builder("Note")
            .field("title", fields::text())
            .build()
            .unwrap();

        let mut serializer = Serializer::new(&def);
        assert!(serializer.is_valid().unwrap_err().is_programmer_error());

        let mut serializer = Serializer::new(&def).data(json!({}));
        assert!(!serializer.is_valid().unwrap());
        assert_eq!(
            serializer.errors().unwrap().to_json(),
            json!({"title": "This field is required."})
        );
        assert!(serializer.save().is_err());

        let mut serializer = Serializer::new(&def).data(json!({"title": "hi"}));
        assert!(serializer.is_valid().unwrap());
        assert!(serializer.errors().is_none());
        assert_eq!(serializer.validated_data().unwrap().to_json(), json!({"title": "hi"}));
        let saved = serializer.save().unwrap();
        assert_eq!(saved.attribute("title"), Some(&Value::from("hi")));
        assert_eq!(serializer.to_data().unwrap().to_json(), json!({"title": "hi"}));
    }

    #[test]
    fn test_save_updates_held_instance() {
        let def = SerializerDef::builder("Note")
            .field("title", fields::text())
            .build()
            .unwrap();
        let existing = Object::new("Note").with("title", "old").with("id", 1);
        let mut serializer = Serializer::new(&def).instance(existing).data(json!({"title": "new"}));
        assert!(serializer.is_valid().unwrap());
        let saved = serializer.save().unwrap();
        assert_eq!(saved.type_name(), "Note");
        assert_eq!(saved.attribute("title"), Some(&Value::from("new")));
        assert_eq!(saved.attribute("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_failed_save_keeps_held_instance() {
        let def = SerializerDef::builder("Note")
            .field("title", fields::text())
            .build()
            .unwrap();
        let mut serializer = Serializer::new(&def).instance(7).data(json!({"title": "new"}));
        assert!(serializer.is_valid().unwrap());

        let err = serializer.save().unwrap_err();
        assert!(matches!(err, Error::NativeType { .. }), "{}", err);
        assert_eq!(serializer.get_instance(), Some(&Value::Int(7)));
    }

    #[test]
    fn test_initial_data_without_instance() {
        let serializer = Serializer::new(nested_def());
        assert_eq!(
            serializer.to_data().unwrap().to_json(),
            json!({"nested": {"one": null, "two": null}})
        );
    }

    #[test]
    fn test_method_field_context() {
        let def = SerializerDef::builder("Greeting")
            .field("name", fields::text())
            .field(
                "greeting",
                fields::method(|instance, binding| {
                    let greeting = binding
                        .root()
                        .get("greeting")
                        .map(Value::to_text)
                        .unwrap_or_else(|| "Hello".to_string());
                    let name = instance.attribute("name").map(Value::to_text).unwrap_or_default();
                    Ok(Value::from(format!("{}, {}!", greeting, name)))
                }),
            )
            .build()
            .unwrap();

        let person = Value::from(Object::new("Person").with("name", "Ada"));
        let serializer = Serializer::new(&def).context("greeting", "Hi");
        assert_eq!(
            serializer.serialize(&person).unwrap().to_json(),
            json!({"name": "Ada", "greeting": "Hi, Ada!"})
        );
        assert_eq!(
            serializer.validate(json!({"name": "Ada", "greeting": "ignored"})).unwrap().to_json(),
            json!({"name": "Ada"})
        );
    }

    #[test]
    fn test_list_field_inside_serializer() {
        let def = SerializerDef::builder("Scores")
            .field("scores", ListSerializer::of(fields::integer()))
            .build()
            .unwrap();
        let serializer = Serializer::new(&def);
        assert_eq!(
            serializer.validate(json!({"scores": ["1", 2]})).unwrap().to_json(),
            json!({"scores": [1, 2]})
        );
        assert_eq!(
            errors_of(serializer.validate(json!({"scores": ["1", "x", "y"]}))),
            json!({"scores": {"1": "A valid integer is required.", "2": "A valid integer is required."}})
        );
        assert_eq!(
            errors_of(serializer.validate(json!({"scores": 1}))),
            json!({"scores": "Expected a list of items but got type `int`"})
        );
    }

    #[test]
    fn test_form_input_through_serializer() {
        let def = SerializerDef::builder("Signup")
            .field("age", fields::integer())
            .field("subscribed", fields::boolean())
            .field("tags", fields::multiple_choice(Choices::values(["a", "b", "c"])))
            .field("nested", Arc::clone(nested_def()).as_field())
            .build()
            .unwrap();

        let form = MultiDict::from_urlencoded("age=3&tags=a&tags=c&tags=a&nested.nested.one=1&nested.nested.two=2");
        let validated = Serializer::new(&def).validate(form).unwrap();
        assert_eq!(
            validated.to_json(),
            json!({
                "age": 3,
                "subscribed": false,
                "tags": ["a", "c"],
                "nested": {"nested": {"one": 1, "two": 2}}
            })
        );
    }

    #[test]
    fn test_list_serializer_validate() {
        let list = ListSerializer::new(fields::integer()).unwrap();
        assert_eq!(list.validate(json!(["123", "456"])).unwrap().to_json(), json!([123, 456]));

        let form = MultiDict::new().with("[0]", "123").with("[1]", "456");
        assert_eq!(list.validate(form).unwrap().to_json(), json!([123, 456]));
        assert_eq!(list.validate(MultiDict::new()).unwrap().to_json(), json!([]));
    }

    #[test]
    fn test_list_serializer_errors() {
        let list = ListSerializer::new(fields::integer()).unwrap();
        assert_eq!(
            errors_of(list.validate(json!(["1", "a", 3, "b"]))),
            json!({"1": "A valid integer is required.", "3": "A valid integer is required."})
        );
        assert_eq!(
            errors_of(list.validate(json!(1))),
            json!("Expected a list of items but got type `int`")
        );
    }

    #[test]
    fn test_list_of_serializers() {
        let list = ListSerializer::new(Arc::clone(nested_def()).as_field()).unwrap();
        let validated = list
            .validate(json!([{"nested": {"one": 1, "two": 2}}, {"nested": {"one": "3", "two": "4"}}]))
            .unwrap();
        assert_eq!(
            validated.to_json(),
            json!([{"nested": {"one": 1, "two": 2}}, {"nested": {"one": 3, "two": 4}}])
        );

        assert_eq!(
            errors_of(list.validate(json!([{"nested": {"one": 1, "two": 2}}, {}]))),
            json!({"1": {"nested": "This field is required."}})
        );

        let created = list.create(json!([{"nested": {"one": 1, "two": 2}}])).unwrap();
        let first = &created.as_list().unwrap()[0];
        assert_eq!(first.type_name(), BASIC_OBJECT);
    }

    #[test]
    fn test_list_of_lists() {
        let list = ListSerializer::new(ListSerializer::of(fields::integer())).unwrap();
        assert_eq!(
            list.validate(json!([["1", 2], [], ["3"]])).unwrap().to_json(),
            json!([[1, 2], [], [3]])
        );
        assert_eq!(
            list.serialize(&Value::from(json!([[1], [2, 3]]))).unwrap().to_json(),
            json!([[1], [2, 3]])
        );
        assert_eq!(
            errors_of(list.validate(json!([["1"], ["x"]]))),
            json!({"1": {"0": "A valid integer is required."}})
        );
    }

    #[test]
    fn test_list_serializer_null_and_non_sequence() {
        let list = ListSerializer::new(fields::integer()).unwrap();
        assert_eq!(list.serialize(&Value::Null).unwrap(), Value::Null);
        assert!(list.serialize(&Value::Int(1)).unwrap_err().is_programmer_error());
    }
}

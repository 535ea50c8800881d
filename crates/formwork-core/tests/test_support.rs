//! Shared test support utilities for integration tests

#![allow(dead_code)]

use formwork_core::fields::{self, Choices};
use formwork_core::{
    Error, ModelField, ModelFieldKind, ModelSchema, Object, Result, SerializerDef, Value,
};
use serde_json::json;
use std::sync::Arc;

/// Serializer for a user's contact profile
pub fn profile_def() -> Arc<SerializerDef> {
    SerializerDef::builder("Profile")
        .field("email", fields::text())
        .field("phone", fields::text().required(false))
        .build()
        .expect("profile serializer")
}

/// Serializer for an account with a nested profile and tags
pub fn account_def() -> Arc<SerializerDef> {
    SerializerDef::builder("Account")
        .field("id", fields::integer().read_only())
        .field("username", fields::text())
        .field("password", fields::text().write_only())
        .field("age", fields::integer().required(false))
        .field("subscribed", fields::boolean())
        .field(
            "tags",
            fields::multiple_choice(Choices::values(["rust", "python", "go"])).required(false),
        )
        .field("profile", profile_def().as_field())
        .build()
        .expect("account serializer")
}

/// A stored account instance
pub fn stored_account() -> Value {
    Object::new("Account")
        .with("id", 7)
        .with("username", "ada")
        .with("password", "hunter2")
        .with("age", 36)
        .with("subscribed", true)
        .with("tags", Value::List(vec!["rust".into()]))
        .with(
            "profile",
            Object::new("Profile").with("email", "ada@example.com").with("phone", Value::Null),
        )
        .into()
}

/// Valid JSON input for [`account_def`]
pub fn account_input() -> serde_json::Value {
    json!({
        "username": "ada",
        "password": "hunter2",
        "age": "36",
        "subscribed": "true",
        "tags": ["rust", "go"],
        "profile": {"email": "ada@example.com"}
    })
}

/// Model metadata for a blog note
pub fn note_schema() -> ModelSchema {
    let mut title = ModelField::new("title", ModelFieldKind::CharField);
    title.max_length = Some(20);

    let mut body = ModelField::new("body", ModelFieldKind::TextField);
    body.blank = true;

    let mut rank = ModelField::new("rank", ModelFieldKind::PositiveIntegerField);
    rank.default = Some(Value::Int(1));

    let mut status = ModelField::new("status", ModelFieldKind::CharField);
    status.choices = vec![("d".into(), "Draft".to_string()), ("p".into(), "Published".to_string())];

    ModelSchema {
        name: "Note".to_string(),
        fields: vec![
            ModelField::new("id", ModelFieldKind::AutoField),
            title,
            body,
            rank,
            status,
            ModelField::new("pinned", ModelFieldKind::BooleanField),
        ],
    }
}

/// Unwrap the validation errors of a failed call as JSON
pub fn validation_errors(result: Result<Value>) -> serde_json::Value {
    match result {
        Err(Error::Validation(err)) => err.to_json(),
        Err(other) => panic!("expected validation errors, got programmer error: {}", other),
        Ok(value) => panic!("expected validation errors, got {}", value),
    }
}

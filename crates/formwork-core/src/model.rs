//! Serializers derived from model metadata
//!
//! A [`ModelSchema`] describes a native type the way an ORM would: named
//! fields with a storage kind, nullability, defaults, choices and so on.
//! [`field_for`] maps one model field to a field declaration and
//! [`ModelSerializer`] assembles a whole serializer from a schema, with
//! explicitly declared fields overriding or extending the generated ones.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::fields::{self, Choices, FieldBuilder, IntegerField, TextField};
use crate::serializer::SerializerDef;
use crate::value::{Object, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage kind of a model field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFieldKind {
    AutoField,
    IntegerField,
    PositiveIntegerField,
    SmallIntegerField,
    PositiveSmallIntegerField,
    CharField,
    TextField,
    CommaSeparatedIntegerField,
    BooleanField,
    NullBooleanField,
    #[serde(other)]
    Other,
}

fn default_editable() -> bool {
    true
}

/// Metadata of one model field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModelFieldKind,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub blank: bool,
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<(Value, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl ModelField {
    pub fn new(name: impl Into<String>, kind: ModelFieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            null: false,
            blank: false,
            editable: true,
            primary_key: false,
            default: None,
            max_length: None,
            choices: Vec::new(),
            verbose_name: None,
            help_text: None,
        }
    }
}

/// Field metadata of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub fields: Vec<ModelField>,
}

impl ModelSchema {
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Field declaration for a model field
pub fn field_for(model_field: &ModelField) -> FieldBuilder {
    let kind = model_field.kind;

    let mut builder = if !model_field.choices.is_empty() {
        fields::choice(Choices::new(model_field.choices.iter().cloned()))
    } else {
        match kind {
            ModelFieldKind::AutoField | ModelFieldKind::IntegerField | ModelFieldKind::SmallIntegerField => {
                fields::integer()
            }
            ModelFieldKind::PositiveIntegerField | ModelFieldKind::PositiveSmallIntegerField => {
                fields::scalar(IntegerField::new().min_value(0))
            }
            ModelFieldKind::CharField | ModelFieldKind::CommaSeparatedIntegerField | ModelFieldKind::TextField => {
                let mut text = TextField::new();
                if model_field.blank {
                    text = text.allow_blank();
                }
                if let Some(max_length) = model_field.max_length {
                    if kind != ModelFieldKind::TextField {
                        text = text.max_length(max_length);
                    }
                }
                fields::scalar(text)
            }
            ModelFieldKind::BooleanField | ModelFieldKind::NullBooleanField => fields::boolean(),
            ModelFieldKind::Other => fields::any(),
        }
    };

    if kind == ModelFieldKind::TextField {
        builder = builder.style("type", "textarea");
    }

    if kind == ModelFieldKind::AutoField || !model_field.editable {
        builder = builder.read_only();
    } else {
        if model_field.null || model_field.blank {
            builder = builder.required(false);
        }
        if let Some(default) = &model_field.default {
            builder = builder.default(default.clone());
        }
    }

    if let Some(verbose_name) = &model_field.verbose_name {
        builder = builder.label(verbose_name.clone());
    }
    if let Some(help_text) = &model_field.help_text {
        builder = builder.help_text(help_text.clone());
    }
    builder
}

/// Serializer generated from a [`ModelSchema`]
#[derive(Debug, Clone, Copy)]
pub struct ModelSerializer;

impl ModelSerializer {
    pub fn builder(schema: &ModelSchema) -> ModelSerializerBuilder {
        ModelSerializerBuilder {
            schema: schema.clone(),
            only: None,
            declared: Vec::new(),
        }
    }
}

/// Declaration of a model serializer
pub struct ModelSerializerBuilder {
    schema: ModelSchema,
    only: Option<Vec<String>>,
    declared: Vec<(String, FieldBuilder)>,
}

impl ModelSerializerBuilder {
    /// Restrict the generated fields to `names`, in that order
    pub fn only<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.only = Some(names.iter().map(|name| name.as_ref().to_string()).collect());
        self
    }

    /// Declare a field explicitly, overriding a generated one of the same name
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldBuilder>) -> Self {
        self.declared.push((name.into(), field.into()));
        self
    }

    pub fn build(self) -> Result<Arc<SerializerDef>> {
        let model_fields: Vec<&ModelField> = match &self.only {
            Some(names) => names
                .iter()
                .map(|name| {
                    self.schema.field(name).ok_or_else(|| {
                        Error::configuration(format!(
                            "Field `{}` does not exist on model `{}`",
                            name, self.schema.name
                        ))
                    })
                })
                .collect::<Result<_>>()?,
            None => self.schema.fields.iter().collect(),
        };

        let generated = model_fields
            .into_iter()
            .fold(SerializerDef::builder(format!("{}Fields", self.schema.name)), |builder, model_field| {
                builder.field(model_field.name.clone(), field_for(model_field))
            })
            .build()?;

        let model_name = self.schema.name.clone();
        self.declared
            .into_iter()
            .fold(
                SerializerDef::builder(format!("{}Serializer", self.schema.name)).extends(&generated),
                |builder, (name, field)| builder.field(name, field),
            )
            .create_with(move |validated| {
                let mut object = Object::new(model_name.clone());
                for (name, value) in validated {
                    object.set(name, value);
                }
                Ok(Value::Object(object))
            })
            .build()
    }
}

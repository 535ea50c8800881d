//! Field definitions and the typed fields
//!
//! A field is declared once with a [`FieldBuilder`], frozen into a shared
//! [`FieldDef`], and instantiated per serializer as a [`Field`] that carries
//! its binding. The type-specific part of a field (how primitive input is
//! coerced into a native value and back) lives behind the [`FieldType`]
//! trait, which is also the seam for custom fields.
//!
//! The module is organized into focused submodules:
//! - `options`: `FieldBuilder`, `FieldDef` and construction invariants
//! - `bound`: per-instance `Field`, binding, validation and serialization
//! - `boolean`, `text`, `integer`, `choice`, `method`: the typed fields
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod boolean;
pub mod bound;
pub mod choice;
pub mod integer;
pub mod method;
pub mod options;
pub mod text;


pub use boolean::BooleanField;
pub use bound::{Binding, Field, RootContext};
pub use choice::{ChoiceField, Choices, MultipleChoiceField};
pub use integer::IntegerField;
pub use method::MethodFn;
pub use options::{FieldBuilder, FieldDef, FieldKind};
pub use text::TextField;

use crate::error::ValidationError;
use crate::value::Value;
use crate::{Error, Result};
use std::fmt;

/// A `(key, template)` message table
pub type Messages = &'static [(&'static str, &'static str)];

/// Messages every field understands
pub const BASE_MESSAGES: Messages = &[("required", "This field is required.")];

/// Messages of a serializer used as a field
pub const SERIALIZER_MESSAGES: Messages = &[(
    "not_a_dict",
    "Invalid data. Expected a dictionary, but got `{input_type}`.",
)];

/// Messages of a list field
pub const LIST_MESSAGES: Messages = &[("not_a_list", "Expected a list of items but got type `{input_type}`")];

/// The type-specific behaviour of a scalar field
pub trait FieldType: fmt::Debug + Send + Sync {
    /// Name reported in programmer errors and used for template selection
    fn type_name(&self) -> &'static str;

    /// Failure keys this field may raise, on top of [`BASE_MESSAGES`]
    fn error_messages(&self) -> Messages {
        &[]
    }

    /// Coerce a supplied primitive value into its native form
    fn to_native(&self, data: &Value) -> Result<Value>;

    /// Render a native value back into its primitive form
    fn to_primitive(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    /// Whether HTML form input supplies every value of a repeated key
    fn reads_list_from_form(&self) -> bool {
        false
    }

    /// Value standing in for a key missing from HTML form input
    fn absent_form_value(&self) -> Option<Value> {
        None
    }

    /// Construction-time checks on the field's own options
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Build the validation error for `key`
    fn fail(&self, key: &str, params: &[(&str, String)]) -> Error {
        fail(self.type_name(), self.error_messages(), key, params)
    }
}

/// Resolve `key` against a field's message table
///
/// Unknown keys mean the field definition itself is broken and surface as
/// [`Error::UnknownErrorKey`], never as a validation error.
pub fn fail(field_type: &str, messages: Messages, key: &str, params: &[(&str, String)]) -> Error {
    let template = messages
        .iter()
        .chain(BASE_MESSAGES.iter())
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, template)| *template);

    match template {
        Some(template) => ValidationError::new(key, interpolate(template, params)).into(),
        None => Error::UnknownErrorKey {
            field_type: field_type.to_string(),
            key: key.to_string(),
        },
    }
}

/// Fill `{name}` placeholders in one pass; substituted text is never rescanned
fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        message.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let param = after.find('}').and_then(|end| {
            let name = &after[..end];
            params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| (value, end))
        });
        match param {
            Some((value, end)) => {
                message.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                message.push('{');
                rest = after;
            }
        }
    }
    message.push_str(rest);
    message
}

/// `input` and `input_type` message parameters for a rejected value
pub(crate) fn input_params(data: &Value) -> Vec<(&'static str, String)> {
    vec![
        ("input", data.to_text()),
        ("input_type", data.type_name().to_string()),
    ]
}

/// Turn a field name into a label: `first_name` becomes `First name`
pub fn humanize(field_name: &str) -> String {
    let spaced = field_name.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A field accepting any value unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyField;

impl AnyField {
    pub const TYPE_NAME: &'static str = "Field";
}

impl FieldType for AnyField {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn to_native(&self, data: &Value) -> Result<Value> {
        Ok(data.clone())
    }
}

impl From<AnyField> for FieldBuilder {
    fn from(field: AnyField) -> Self {
        FieldBuilder::new(field)
    }
}

/// Field declared with a custom [`FieldType`]
pub fn scalar(field_type: impl FieldType + 'static) -> FieldBuilder {
    FieldBuilder::new(field_type)
}

/// Passthrough field
pub fn any() -> FieldBuilder {
    FieldBuilder::new(AnyField)
}

/// Boolean field with checkbox semantics for form input
pub fn boolean() -> FieldBuilder {
    FieldBuilder::new(BooleanField)
}

/// Text field rejecting blank strings
pub fn text() -> FieldBuilder {
    FieldBuilder::new(TextField::new())
}

/// Base-10 integer field
pub fn integer() -> FieldBuilder {
    FieldBuilder::new(IntegerField::new())
}

/// Single-choice field
pub fn choice(choices: Choices) -> FieldBuilder {
    FieldBuilder::new(ChoiceField::new(choices))
}

/// Multi-choice field producing a set
pub fn multiple_choice(choices: Choices) -> FieldBuilder {
    FieldBuilder::new(MultipleChoiceField::new(choices))
}

/// Computed, read-only field serialized by `callback`
pub fn method<F>(callback: F) -> FieldBuilder
where
    F: Fn(&Value, &Binding) -> Result<Value> + Send + Sync + 'static,
{
    method::field(callback)
}

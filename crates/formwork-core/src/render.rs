//! Template selection for HTML form rendering
//!
//! Formwork does not render markup itself. It decides which template each
//! field should be rendered with, keyed by the field type and its `type`
//! style hint, and hands a template engine the `(template, key, value)`
//! sequence to render.

use crate::fields::{BooleanField, ChoiceField, Field, FieldKind, IntegerField, MultipleChoiceField, TextField};
use crate::value::{Map, Value};
use serde::Serialize;

pub const READONLY_TEMPLATE: &str = "readonly.html";
pub const CHECKBOX_TEMPLATE: &str = "checkbox.html";
pub const INPUT_TEMPLATE: &str = "input.html";
pub const TEXTAREA_TEMPLATE: &str = "textarea.html";
pub const SELECT_TEMPLATE: &str = "select.html";
pub const SELECT_RADIO_TEMPLATE: &str = "select_radio.html";
pub const SELECT_MULTIPLE_TEMPLATE: &str = "select_multiple.html";
pub const SELECT_CHECKBOX_TEMPLATE: &str = "select_checkbox.html";

/// Template used to render `field`
///
/// Read-only fields always get the non-editable template, whatever their type.
pub fn template_name(field: &Field) -> &'static str {
    let def = field.def();
    if def.read_only() {
        return READONLY_TEMPLATE;
    }
    let style = def.style("type");

    let FieldKind::Scalar(field_type) = def.kind() else {
        return INPUT_TEMPLATE;
    };
    match field_type.type_name() {
        BooleanField::TYPE_NAME => CHECKBOX_TEMPLATE,
        TextField::TYPE_NAME if style == Some("textarea") => TEXTAREA_TEMPLATE,
        TextField::TYPE_NAME | IntegerField::TYPE_NAME => INPUT_TEMPLATE,
        ChoiceField::TYPE_NAME if style == Some("radio") => SELECT_RADIO_TEMPLATE,
        ChoiceField::TYPE_NAME => SELECT_TEMPLATE,
        MultipleChoiceField::TYPE_NAME if style == Some("checkbox") => SELECT_CHECKBOX_TEMPLATE,
        MultipleChoiceField::TYPE_NAME => SELECT_MULTIPLE_TEMPLATE,
        _ => INPUT_TEMPLATE,
    }
}

/// One serialized key with the field that produced it
#[derive(Debug, Clone)]
pub struct FieldItem<'a> {
    pub key: String,
    pub value: Value,
    pub field: &'a Field,
}

/// Serialized output that remembers which field produced each key
#[derive(Debug, Clone, Default)]
pub struct FieldItems<'a> {
    items: Vec<FieldItem<'a>>,
}

impl<'a> FieldItems<'a> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, key: String, value: Value, field: &'a Field) {
        self.items.push(FieldItem { key, value, field });
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldItem<'a>> {
        self.items.iter()
    }

    pub fn get(&self, key: &str) -> Option<&FieldItem<'a>> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The plain serialized mapping
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.items
                .iter()
                .map(|item| (item.key.clone(), item.value.clone()))
                .collect::<Map>(),
        )
    }
}

/// One template invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderStep {
    pub template: &'static str,
    pub key: String,
    pub label: Option<String>,
    pub value: Value,
}

/// The template invocations a form renderer performs, in field order
pub fn plan(items: &FieldItems<'_>) -> Vec<RenderStep> {
    items
        .iter()
        .map(|item| RenderStep {
            template: template_name(item.field),
            key: item.key.clone(),
            label: item.field.label().map(str::to_string),
            value: item.value.clone(),
        })
        .collect()
}

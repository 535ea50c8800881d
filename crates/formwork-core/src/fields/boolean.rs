use super::{input_params, FieldBuilder, FieldType, Messages};
use crate::value::Value;
use crate::Result;

const TRUE_VALUES: &[&str] = &["true", "t", "True", "1"];
const FALSE_VALUES: &[&str] = &["false", "f", "False", "0"];

/// Boolean field
///
/// An unchecked HTML checkbox is simply absent from the submitted form, so a
/// missing key in form input reads as `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanField;

impl BooleanField {
    pub const TYPE_NAME: &'static str = "BooleanField";

    const MESSAGES: Messages = &[("invalid_value", "`{input}` is not a valid boolean.")];
}

impl FieldType for BooleanField {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn error_messages(&self) -> Messages {
        Self::MESSAGES
    }

    fn to_native(&self, data: &Value) -> Result<Value> {
        let parsed = match data {
            Value::Bool(b) => Some(*b),
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            Value::Float(f) if *f == 1.0 => Some(true),
            Value::Float(f) if *f == 0.0 => Some(false),
            Value::String(s) if TRUE_VALUES.contains(&s.as_str()) => Some(true),
            Value::String(s) if FALSE_VALUES.contains(&s.as_str()) => Some(false),
            _ => None,
        };
        parsed
            .map(Value::Bool)
            .ok_or_else(|| self.fail("invalid_value", &input_params(data)))
    }

    fn absent_form_value(&self) -> Option<Value> {
        Some(Value::Bool(false))
    }
}

impl From<BooleanField> for FieldBuilder {
    fn from(field: BooleanField) -> Self {
        FieldBuilder::new(field)
    }
}

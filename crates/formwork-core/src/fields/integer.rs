use super::{FieldBuilder, FieldType, Messages};
use crate::value::Value;
use crate::Result;

/// Longest string the integer field will attempt to parse
const MAX_STRING_LENGTH: usize = 1000;

/// Base-10 integer field with optional bounds
#[derive(Debug, Clone, Default)]
pub struct IntegerField {
    min_value: Option<i64>,
    max_value: Option<i64>,
}

impl IntegerField {
    pub const TYPE_NAME: &'static str = "IntegerField";

    const MESSAGES: Messages = &[
        ("invalid_integer", "A valid integer is required."),
        ("max_value", "Ensure this value is less than or equal to {max_value}."),
        ("min_value", "Ensure this value is greater than or equal to {min_value}."),
        ("max_string_length", "String value too large."),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_value(mut self, min_value: i64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn max_value(mut self, max_value: i64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    fn parse(&self, data: &Value) -> Result<i64> {
        match data {
            Value::Int(i) => Ok(*i),
            // integral floats pass so already-native numbers validate to themselves
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(*f as i64)
            }
            Value::String(s) if s.len() > MAX_STRING_LENGTH => Err(self.fail("max_string_length", &[])),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.fail("invalid_integer", &[])),
            _ => Err(self.fail("invalid_integer", &[])),
        }
    }
}

impl FieldType for IntegerField {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn error_messages(&self) -> Messages {
        Self::MESSAGES
    }

    fn to_native(&self, data: &Value) -> Result<Value> {
        let value = self.parse(data)?;
        if let Some(min_value) = self.min_value {
            if value < min_value {
                return Err(self.fail("min_value", &[("min_value", min_value.to_string())]));
            }
        }
        if let Some(max_value) = self.max_value {
            if value > max_value {
                return Err(self.fail("max_value", &[("max_value", max_value.to_string())]));
            }
        }
        Ok(Value::Int(value))
    }
}

impl From<IntegerField> for FieldBuilder {
    fn from(field: IntegerField) -> Self {
        FieldBuilder::new(field)
    }
}

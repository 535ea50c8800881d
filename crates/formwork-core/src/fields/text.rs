use super::{FieldBuilder, FieldType, Messages};
use crate::value::Value;
use crate::Result;

/// Text field: any scalar input is coerced to its string form
#[derive(Debug, Clone, Default)]
pub struct TextField {
    allow_blank: bool,
    max_length: Option<usize>,
    trim_whitespace: bool,
}

impl TextField {
    pub const TYPE_NAME: &'static str = "TextField";

    const MESSAGES: Messages = &[
        ("blank", "This field may not be blank."),
        ("max_length", "Ensure this field has no more than {max_length} characters."),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the empty string
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Strip leading and trailing whitespace before validating
    pub fn trim_whitespace(mut self) -> Self {
        self.trim_whitespace = true;
        self
    }
}

impl FieldType for TextField {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn error_messages(&self) -> Messages {
        Self::MESSAGES
    }

    fn to_native(&self, data: &Value) -> Result<Value> {
        // null carries no text and is held to the blank rule
        let text = match data {
            Value::Null => String::new(),
            other => other.to_text(),
        };
        let text = if self.trim_whitespace {
            text.trim().to_string()
        } else {
            text
        };

        if text.is_empty() && !self.allow_blank {
            return Err(self.fail("blank", &[]));
        }
        if let Some(max_length) = self.max_length {
            if text.chars().count() > max_length {
                return Err(self.fail("max_length", &[("max_length", max_length.to_string())]));
            }
        }
        Ok(Value::String(text))
    }
}

impl From<TextField> for FieldBuilder {
    fn from(field: TextField) -> Self {
        FieldBuilder::new(field)
    }
}

//! Single and multiple choice fields
//!
//! Choices keep their native values (which need not be strings) alongside
//! a lookup from each value's string form back to the value, so string
//! encoded input such as `"1"` matches the integer choice `1`.

use super::{input_params, FieldBuilder, FieldType, Messages};
use crate::value::Value;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Ordered set of allowed values with display labels
#[derive(Debug, Clone, Default)]
pub struct Choices {
    pairs: Vec<(Value, String)>,
    by_text: IndexMap<String, Value>,
}

impl Choices {
    /// Choices from `(value, label)` pairs
    pub fn new<V, L>(pairs: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<Value>,
        L: Into<String>,
    {
        let mut choices = Self::default();
        for (value, label) in pairs {
            let value = value.into();
            choices.by_text.entry(value.to_text()).or_insert_with(|| value.clone());
            choices.pairs.push((value, label.into()));
        }
        choices
    }

    /// Choices whose labels are their own string forms
    pub fn values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(|value| {
            let value = value.into();
            let label = value.to_text();
            (value, label)
        }))
    }

    /// The native value whose string form is `text`
    pub fn lookup(&self, text: &str) -> Option<&Value> {
        self.by_text.get(text)
    }

    pub fn pairs(&self) -> &[(Value, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::configuration("A choice field requires at least one choice"));
        }
        Ok(())
    }
}

/// Single choice field
#[derive(Debug, Clone)]
pub struct ChoiceField {
    choices: Choices,
}

impl ChoiceField {
    pub const TYPE_NAME: &'static str = "ChoiceField";

    const MESSAGES: Messages = &[("invalid_choice", "`{input}` is not a valid choice.")];

    pub fn new(choices: Choices) -> Self {
        Self { choices }
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }
}

impl FieldType for ChoiceField {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn error_messages(&self) -> Messages {
        Self::MESSAGES
    }

    fn to_native(&self, data: &Value) -> Result<Value> {
        self.choices
            .lookup(&data.to_text())
            .cloned()
            .ok_or_else(|| self.fail("invalid_choice", &input_params(data)))
    }

    fn check(&self) -> Result<()> {
        self.choices.check()
    }
}

/// Multiple choice field; validates to a set, so duplicates collapse
#[derive(Debug, Clone)]
pub struct MultipleChoiceField {
    choices: Choices,
}

impl MultipleChoiceField {
    pub const TYPE_NAME: &'static str = "MultipleChoiceField";

    const MESSAGES: Messages = &[
        ("invalid_choice", "`{input}` is not a valid choice."),
        ("not_a_list", "Expected a list of items but got type `{input_type}`"),
    ];

    pub fn new(choices: Choices) -> Self {
        Self { choices }
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }
}

impl FieldType for MultipleChoiceField {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn error_messages(&self) -> Messages {
        Self::MESSAGES
    }

    fn to_native(&self, data: &Value) -> Result<Value> {
        let items: Vec<&Value> = match data {
            Value::List(items) => items.iter().collect(),
            Value::Set(items) => items.iter().collect(),
            other => return Err(self.fail("not_a_list", &input_params(other))),
        };

        let mut selected = BTreeSet::new();
        for item in items {
            let value = self
                .choices
                .lookup(&item.to_text())
                .ok_or_else(|| self.fail("invalid_choice", &input_params(item)))?;
            selected.insert(value.clone());
        }
        Ok(Value::Set(selected))
    }

    fn to_primitive(&self, value: &Value) -> Result<Value> {
        Ok(match value {
            Value::Set(items) => Value::List(items.iter().cloned().collect()),
            other => other.clone(),
        })
    }

    fn reads_list_from_form(&self) -> bool {
        true
    }

    fn check(&self) -> Result<()> {
        self.choices.check()
    }
}

impl From<ChoiceField> for FieldBuilder {
    fn from(field: ChoiceField) -> Self {
        FieldBuilder::new(field)
    }
}

impl From<MultipleChoiceField> for FieldBuilder {
    fn from(field: MultipleChoiceField) -> Self {
        FieldBuilder::new(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> Choices {
        Choices::new([(1, "Bad"), (2, "Fine"), (3, "Great")])
    }

    #[test]
    fn test_string_input_matches_typed_choice() {
        let field = ChoiceField::new(ratings());
        assert_eq!(field.to_native(&Value::from("1")).unwrap(), Value::Int(1));
        assert_eq!(field.to_native(&Value::Int(3)).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_invalid_choice() {
        let field = ChoiceField::new(Choices::values(["good", "bad"]));
        let err = field.to_native(&Value::from("awful")).unwrap_err();
        assert_eq!(err.to_string(), "`awful` is not a valid choice.");
        assert!(ChoiceField::new(ratings()).to_native(&Value::Int(5)).is_err());
        assert!(ChoiceField::new(ratings()).to_native(&Value::from("abc")).is_err());
    }

    #[test]
    fn test_empty_choices_rejected_at_build() {
        let err = crate::fields::choice(Choices::values(Vec::<Value>::new()))
            .build()
            .unwrap_err();
        assert!(err.is_programmer_error());
    }

    #[test]
    fn test_multiple_choice_collapses_duplicates() {
        let field = MultipleChoiceField::new(ratings());
        let input = Value::List(vec![Value::from("2"), Value::Int(1), Value::from("2")]);
        let native = field.to_native(&input).unwrap();
        let expected: BTreeSet<Value> = [Value::Int(1), Value::Int(2)].into_iter().collect();
        assert_eq!(native, Value::Set(expected));
        assert_eq!(
            field.to_primitive(&native).unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_multiple_choice_requires_list() {
        let field = MultipleChoiceField::new(ratings());
        let err = field.to_native(&Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "Expected a list of items but got type `int`");
        let err = field.to_native(&Value::from("1")).unwrap_err();
        assert_eq!(err.to_string(), "Expected a list of items but got type `str`");
    }
}

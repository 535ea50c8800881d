//! Input containers and the HTML form-encoding adapter
//!
//! Validation reads input through the [`Container`] trait. Containers that
//! also implement [`MultiValueLookup`] (HTML form submissions) get the form
//! treatment: repeated keys, unchecked checkboxes, and nested or list values
//! flattened into `name.key` and `name[0]` style keys, which
//! [`parse_html_dict`] and [`parse_html_list`] fold back into structure.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::value::{Map, Value};
use crate::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// A primitive container a serializer can read field values out of
pub trait Container: fmt::Debug {
    /// Single value stored under `key`
    fn get(&self, key: &str) -> Option<Value>;

    /// The whole container as a value
    fn to_value(&self) -> Value;

    /// Type name used in error messages
    fn type_name(&self) -> &str;

    /// Multi-valued view of this container, when it has one
    fn as_multi_value(&self) -> Option<&dyn MultiValueLookup> {
        None
    }
}

/// Multi-valued retrieval, the capability that marks HTML form input
pub trait MultiValueLookup {
    /// Every value stored under `key`, in submission order
    fn get_list(&self, key: &str) -> Vec<Value>;

    /// Every `(key, value)` pair, repeated keys included
    fn multi_items(&self) -> Vec<(String, Value)>;

    fn contains_key(&self, key: &str) -> bool {
        !self.get_list(key).is_empty()
    }
}

impl Container for Value {
    fn get(&self, key: &str) -> Option<Value> {
        self.attribute(key).cloned()
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn type_name(&self) -> &str {
        Value::type_name(self)
    }
}

/// Ordered mapping in which a key may carry several values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiDict {
    items: Vec<(String, Value)>,
}

impl MultiDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &str) -> Self {
        url::form_urlencoded::parse(body.trim().as_bytes())
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.push((key.into(), value.into()));
    }

    /// Builder-style [`MultiDict::append`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.append(key, value);
        self
    }

    /// Distinct keys in first-seen order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (key, _) in &self.items {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.items.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(String, Value)> for MultiDict {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Container for MultiDict {
    fn get(&self, key: &str) -> Option<Value> {
        self.items
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
    }

    /// Keys with one value map to it, repeated keys map to a list
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        for key in self.keys() {
            let mut values = self.get_list(key);
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::List(values)
            };
            map.insert(key.to_string(), value);
        }
        Value::Map(map)
    }

    fn type_name(&self) -> &str {
        "MultiDict"
    }

    fn as_multi_value(&self) -> Option<&dyn MultiValueLookup> {
        Some(self)
    }
}

impl MultiValueLookup for MultiDict {
    fn get_list(&self, key: &str) -> Vec<Value> {
        self.items
            .iter()
            .filter(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn multi_items(&self) -> Vec<(String, Value)> {
        self.items.clone()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.items.iter().any(|(candidate, _)| candidate == key)
    }
}

/// Input handed to validation
#[derive(Debug)]
pub enum Input {
    /// Plain primitive data, e.g. decoded JSON
    Value(Value),
    /// Any other container, possibly multi-valued
    Container(Box<dyn Container>),
    /// A sequence reconstructed from form input
    List(Vec<Input>),
}

impl Input {
    /// Keyed view of this input, if it is a mapping-like container
    pub fn as_container(&self) -> Option<&dyn Container> {
        match self {
            Input::Value(value @ (Value::Map(_) | Value::Object(_))) => Some(value),
            Input::Container(container) => Some(&**container),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Input::Value(value) => value.type_name(),
            Input::Container(container) => container.type_name(),
            Input::List(_) => "list",
        }
    }

    /// Collapse into a plain value
    pub fn into_value(self) -> Value {
        match self {
            Input::Value(value) => value,
            Input::Container(container) => container.to_value(),
            Input::List(items) => Value::List(items.into_iter().map(Input::into_value).collect()),
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

impl From<serde_json::Value> for Input {
    fn from(value: serde_json::Value) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<MultiDict> for Input {
    fn from(form: MultiDict) -> Self {
        Input::Container(Box::new(form))
    }
}

impl From<Vec<Input>> for Input {
    fn from(items: Vec<Input>) -> Self {
        Input::List(items)
    }
}

enum Slot {
    Value(Value),
    Form(MultiDict),
}

fn prefixed(prefix: &str, suffix: &str) -> Result<Regex> {
    let pattern = format!("^{}{}$", regex::escape(prefix), suffix);
    Regex::new(&pattern).map_err(|e| Error::configuration(format!("Invalid form prefix `{}`: {}", prefix, e)))
}

/// Reconstruct a list out of `prefix[<index>]<rest>` keys
///
/// Entries are grouped by index and emitted in ascending index order. Bare
/// `prefix[i]` keys give the element itself; keys with a remainder build a
/// sub-form per index (`[0].name` and `[0]name` are equivalent). Indices
/// need not be contiguous: missing positions are dropped, not padded.
pub fn parse_html_list(form: &dyn MultiValueLookup, prefix: &str) -> Result<Vec<Input>> {
    let pattern = prefixed(prefix, r"\[([0-9]+)\](.*)")?;
    let mut slots: BTreeMap<usize, Slot> = BTreeMap::new();

    for (key, value) in form.multi_items() {
        let Some(captures) = pattern.captures(&key) else {
            continue;
        };
        let Ok(index) = captures[1].parse::<usize>() else {
            log::debug!("Ignoring form key `{}`: index out of range", key);
            continue;
        };
        let rest = &captures[2];
        let rest = rest.strip_prefix('.').unwrap_or(rest);

        match slots.get_mut(&index) {
            None if rest.is_empty() => {
                slots.insert(index, Slot::Value(value));
            }
            None => {
                slots.insert(index, Slot::Form(MultiDict::new().with(rest, value)));
            }
            Some(Slot::Form(sub)) if !rest.is_empty() => sub.append(rest, value),
            Some(_) => {
                log::debug!("Ignoring form key `{}`: index {} already holds a value", key, index);
            }
        }
    }

    let contiguous = slots.keys().enumerate().all(|(position, index)| position == *index);
    if !contiguous {
        log::debug!(
            "Compacting non-contiguous list indices under `{}`: {:?}",
            prefix,
            slots.keys().collect::<Vec<_>>()
        );
    }

    Ok(slots
        .into_values()
        .map(|slot| match slot {
            Slot::Value(value) => Input::Value(value),
            Slot::Form(sub) => Input::Container(Box::new(sub)),
        })
        .collect())
}

/// Collect the `prefix.<rest>` keys of a form into a sub-form keyed by `<rest>`
pub fn parse_html_dict(form: &dyn MultiValueLookup, prefix: &str) -> Result<MultiDict> {
    let pattern = prefixed(prefix, r"\.(.+)")?;
    Ok(form
        .multi_items()
        .into_iter()
        .filter_map(|(key, value)| {
            pattern
                .captures(&key)
                .map(|captures| (captures[1].to_string(), value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(inputs: Vec<Input>) -> Vec<serde_json::Value> {
        inputs.into_iter().map(|input| input.into_value().to_json()).collect()
    }

    #[test]
    fn test_urlencoded_keeps_repeated_keys() {
        let form = MultiDict::from_urlencoded("color=red&color=blue&name=Ada+L%C3%B3pez");
        assert_eq!(form.get_list("color"), vec![Value::from("red"), Value::from("blue")]);
        assert_eq!(form.get("color"), Some(Value::from("red")));
        assert_eq!(form.get("name"), Some(Value::from("Ada López")));
        assert_eq!(form.keys(), vec!["color", "name"]);
    }

    #[test]
    fn test_parse_list_of_primitives() {
        let form = MultiDict::new().with("[0]", "abc").with("[1]", "def").with("[2]", "hij");
        let items = parse_html_list(&form, "").unwrap();
        assert_eq!(values(items), vec![json!("abc"), json!("def"), json!("hij")]);
    }

    #[test]
    fn test_parse_list_of_dicts() {
        let form = MultiDict::new()
            .with("[0]foo", "abc")
            .with("[0]bar", "def")
            .with("[1].foo", "hij")
            .with("[1].bar", "klm");
        let items = parse_html_list(&form, "").unwrap();
        assert_eq!(
            values(items),
            vec![json!({"foo": "abc", "bar": "def"}), json!({"foo": "hij", "bar": "klm"})]
        );
    }

    #[test]
    fn test_parse_list_with_prefix_and_gap() {
        let form = MultiDict::new()
            .with("rows[2]", "c")
            .with("rows[0]", "a")
            .with("other[1]", "x")
            .with("rows[0]", "ignored");
        let items = parse_html_list(&form, "rows").unwrap();
        assert_eq!(values(items), vec![json!("a"), json!("c")]);
    }

    #[test]
    fn test_parse_list_prefix_is_literal() {
        let form = MultiDict::new().with("a.b[0]", "1").with("axb[0]", "2");
        let items = parse_html_list(&form, "a.b").unwrap();
        assert_eq!(values(items), vec![json!("1")]);
    }

    #[test]
    fn test_parse_dict() {
        let form = MultiDict::new()
            .with("profile.username", "example")
            .with("profile.email", "example@example.com")
            .with("profiles", "nope");
        let sub = parse_html_dict(&form, "profile").unwrap();
        assert_eq!(
            sub.to_value().to_json(),
            json!({"username": "example", "email": "example@example.com"})
        );
    }

    #[test]
    fn test_input_container_view() {
        let input = Input::from(json!({"a": 1}));
        assert_eq!(input.as_container().and_then(|c| c.get("a")), Some(Value::Int(1)));
        assert!(Input::from(json!([1, 2])).as_container().is_none());

        let form = Input::from(MultiDict::new().with("a", "1"));
        let container = form.as_container().unwrap();
        assert!(container.as_multi_value().is_some());
        assert_eq!(form.type_name(), "MultiDict");
    }
}

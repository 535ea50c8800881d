//! Source path expressions
//!
//! A field's source says where it reads from a native object and where its
//! validated value lands in the output mapping: either the wildcard `*`
//! (the whole container) or a dotted chain such as `profile.email`.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::value::{Map, Value};
use crate::{Error, Result};
use std::fmt;

/// Wildcard source marker
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Operate on the whole container
    Wildcard,
    /// Dot-separated attribute/key chain, resolved left to right
    Path(Vec<String>),
}

impl Source {
    /// Parse a source expression
    pub fn parse(expr: &str) -> Result<Self> {
        if expr == WILDCARD {
            return Ok(Source::Wildcard);
        }
        let segments: Vec<String> = expr.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(Error::configuration(format!(
                "Invalid source `{}`: path segments may not be empty",
                expr
            )));
        }
        Ok(Source::Path(segments))
    }

    /// Source naming a single attribute
    pub fn attribute(name: &str) -> Self {
        Source::Path(vec![name.to_string()])
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Source::Wildcard)
    }

    pub fn segments(&self) -> &[String] {
        match self {
            Source::Wildcard => &[],
            Source::Path(segments) => segments,
        }
    }

    /// Read this source off a native object or mapping
    ///
    /// A `null` met part way down a dotted path resolves to `null`, so an
    /// unset relation serializes as `null` rather than failing.
    pub fn read(&self, instance: &Value) -> Result<Value> {
        let segments = match self {
            Source::Wildcard => return Ok(instance.clone()),
            Source::Path(segments) => segments,
        };

        let mut current = instance;
        for segment in segments {
            if current.is_null() {
                return Ok(Value::Null);
            }
            current = current.attribute(segment).ok_or_else(|| Error::Attribute {
                type_name: current.type_name().to_string(),
                attribute: segment.clone(),
            })?;
        }
        Ok(current.clone())
    }

    /// Write a validated value into an output mapping
    pub fn write(&self, target: &mut Map, value: Value) -> Result<()> {
        let segments = match self {
            Source::Wildcard => {
                return match value {
                    Value::Map(map) => {
                        target.extend(map);
                        Ok(())
                    }
                    Value::Object(object) => {
                        target.extend(object.into_attributes());
                        Ok(())
                    }
                    other => Err(Error::configuration(format!(
                        "A wildcard source can only merge a mapping, got `{}`",
                        other.type_name()
                    ))),
                };
            }
            Source::Path(segments) => segments,
        };

        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::configuration("Source path is empty"));
        };

        let mut current = target;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Map(Map::new()));
            current = match slot {
                Value::Map(map) => map,
                other => {
                    return Err(Error::configuration(format!(
                        "Cannot write through `{}`: it already holds a `{}`",
                        segment,
                        other.type_name()
                    )))
                }
            };
        }
        current.insert(last.clone(), value);
        Ok(())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Wildcard => write!(f, "{}", WILDCARD),
            Source::Path(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}

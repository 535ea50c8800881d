//! Field declaration: `FieldBuilder` and the frozen `FieldDef`
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use super::method::{MethodFn, TYPE_NAME as METHOD_TYPE_NAME};
use super::FieldType;
use crate::serializer::list::TYPE_NAME as LIST_TYPE_NAME;
use crate::serializer::SerializerDef;
use crate::source::{Source, WILDCARD};
use crate::value::Value;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// What a field is, independent of its policy flags
#[derive(Clone)]
pub enum FieldKind {
    /// Typed scalar conversion
    Scalar(Arc<dyn FieldType>),
    /// Computed, read-only value
    Method(MethodFn),
    /// A serializer used as a field
    Nested(Arc<SerializerDef>),
    /// Homogeneous list of one child field
    List(Arc<FieldDef>),
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(field_type) => f.debug_tuple("Scalar").field(field_type).finish(),
            FieldKind::Method(_) => f.write_str("Method"),
            FieldKind::Nested(def) => f.debug_tuple("Nested").field(&def.name()).finish(),
            FieldKind::List(child) => f.debug_tuple("List").field(child).finish(),
        }
    }
}

#[derive(Clone)]
pub(crate) enum KindDecl {
    Scalar(Arc<dyn FieldType>),
    Method(MethodFn),
    Nested(Arc<SerializerDef>),
    List(Box<FieldBuilder>),
}

/// Chainable field declaration
///
/// `required` is left unresolved until [`FieldBuilder::build`], where it
/// defaults to "no default given and not read-only".
#[derive(Clone)]
pub struct FieldBuilder {
    kind: KindDecl,
    read_only: bool,
    write_only: bool,
    required: Option<bool>,
    default: Option<Value>,
    initial: Option<Value>,
    source: Option<String>,
    label: Option<String>,
    help_text: Option<String>,
    style: IndexMap<String, String>,
}

impl FieldBuilder {
    /// Declare a scalar field of the given type
    pub fn new(field_type: impl FieldType + 'static) -> Self {
        Self::from_kind(KindDecl::Scalar(Arc::new(field_type)))
    }

    pub(crate) fn from_kind(kind: KindDecl) -> Self {
        Self {
            kind,
            read_only: false,
            write_only: false,
            required: None,
            default: None,
            initial: None,
            source: None,
            label: None,
            help_text: None,
            style: IndexMap::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Value used when the input omits this field
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value shown for this field when there is no instance to serialize
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Where to read from and write to: `"*"` or a dotted path
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Presentation hint, e.g. `style("type", "textarea")`
    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    /// Freeze the declaration, enforcing the option invariants
    pub fn build(self) -> Result<Arc<FieldDef>> {
        let mut read_only = self.read_only;
        let mut source = self.source;

        let kind = match self.kind {
            KindDecl::Scalar(field_type) => {
                field_type.check()?;
                FieldKind::Scalar(field_type)
            }
            KindDecl::Method(callback) => {
                read_only = true;
                source = Some(WILDCARD.to_string());
                FieldKind::Method(callback)
            }
            KindDecl::Nested(def) => FieldKind::Nested(def),
            KindDecl::List(child) => FieldKind::List(child.build()?),
        };

        let required = self
            .required
            .unwrap_or(self.default.is_none() && !read_only);

        if read_only && self.write_only {
            return Err(Error::configuration("May not set both `read_only` and `write_only`"));
        }
        if read_only && required {
            return Err(Error::configuration("May not set both `read_only` and `required`"));
        }
        if read_only && self.default.is_some() {
            return Err(Error::configuration("May not set both `read_only` and `default`"));
        }
        if required && self.default.is_some() {
            return Err(Error::configuration("May not set both `required` and `default`"));
        }

        let source = source.as_deref().map(Source::parse).transpose()?;

        Ok(Arc::new(FieldDef {
            kind,
            read_only,
            write_only: self.write_only,
            required,
            default: self.default,
            initial: self.initial,
            source,
            label: self.label,
            help_text: self.help_text,
            style: self.style,
        }))
    }
}

impl fmt::Debug for FieldBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBuilder")
            .field("read_only", &self.read_only)
            .field("write_only", &self.write_only)
            .field("required", &self.required)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Immutable, shared field definition
#[derive(Debug)]
pub struct FieldDef {
    kind: FieldKind,
    read_only: bool,
    write_only: bool,
    required: bool,
    default: Option<Value>,
    initial: Option<Value>,
    source: Option<Source>,
    label: Option<String>,
    help_text: Option<String>,
    style: IndexMap<String, String>,
}

impl FieldDef {
    /// Definition of a top-level serializer or list, which is never bound
    /// to a parent and so carries no policy of its own
    pub(crate) fn root(kind: FieldKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            read_only: false,
            write_only: false,
            required: true,
            default: None,
            initial: None,
            source: None,
            label: None,
            help_text: None,
            style: IndexMap::new(),
        })
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn type_name(&self) -> &str {
        match &self.kind {
            FieldKind::Scalar(field_type) => field_type.type_name(),
            FieldKind::Method(_) => METHOD_TYPE_NAME,
            FieldKind::Nested(def) => def.name(),
            FieldKind::List(_) => LIST_TYPE_NAME,
        }
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn write_only(&self) -> bool {
        self.write_only
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn initial(&self) -> Option<&Value> {
        self.initial.as_ref()
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        self.style.get(key).map(String::as_str)
    }

    pub fn styles(&self) -> &IndexMap<String, String> {
        &self.style
    }
}

//! Homogeneous list serializer
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::fields::options::KindDecl;
use crate::fields::{Field, FieldBuilder, FieldDef, FieldKind, RootContext};
use crate::form::Input;
use crate::value::{Map, Value};
use crate::Result;
use std::sync::Arc;

pub const TYPE_NAME: &str = "ListSerializer";

/// Applies one child field or serializer to every element of a sequence
#[derive(Debug, Clone)]
pub struct ListSerializer {
    root: Field,
    partial: bool,
    context: Map,
}

impl ListSerializer {
    /// Top-level list serializer over `child`
    pub fn new(child: impl Into<FieldBuilder>) -> Result<Self> {
        let child = child.into().build()?;
        let mut serializer = Self {
            root: Field::new(FieldDef::root(FieldKind::List(child))),
            partial: false,
            context: Map::new(),
        };
        serializer.rebind();
        Ok(serializer)
    }

    /// List field for use inside a serializer declaration
    pub fn of(child: impl Into<FieldBuilder>) -> FieldBuilder {
        FieldBuilder::from_kind(KindDecl::List(Box::new(child.into())))
    }

    /// Validate every element as optional
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self.rebind();
        self
    }

    /// Caller context visible to method fields of the child
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self.rebind();
        self
    }

    fn rebind(&mut self) {
        let root = Arc::new(
            RootContext::new(TYPE_NAME)
                .with_partial(self.partial)
                .with_context(self.context.clone()),
        );
        self.root.bind("", TYPE_NAME, &root);
    }

    /// Element field
    pub fn child(&self) -> Option<&Field> {
        self.root.child()
    }

    /// Validate a sequence element-wise
    ///
    /// Element failures are reported together, keyed by position. Input that
    /// is not a sequence, or a form that holds no `[i]` keys, fails with
    /// `not_a_list` or yields an empty list respectively.
    pub fn validate(&self, input: impl Into<Input>) -> Result<Value> {
        let validated = self.root.validate(Some(input.into()))?;
        Ok(validated.unwrap_or_else(|| Value::List(Vec::new())))
    }

    /// Serialize a sequence element-wise; `null` stays `null`
    pub fn serialize(&self, instance: &Value) -> Result<Value> {
        self.root.serialize(instance).map(Option::unwrap_or_default)
    }

    /// Validate, then map the child's `create` over the elements
    pub fn create(&self, input: impl Into<Input>) -> Result<Value> {
        let validated = self.validate(input)?;
        self.root.create(validated)
    }
}

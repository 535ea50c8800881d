//! Serializer type definitions and declaration ordering
//!
//! A [`SerializerDef`] is the frozen, shareable field registry of one
//! serializer type. It is assembled once by a [`SerializerDefBuilder`]
//! (typically inside a `OnceLock`) and then shared by every instance.
//!
//! Ordering rules: inherited fields come first, in the order the bases were
//! listed; the type's own fields follow in declaration order. Redeclaring an
//! inherited name replaces the definition but keeps the inherited position.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use crate::fields::options::KindDecl;
use crate::fields::{FieldBuilder, FieldDef};
use crate::value::{Map, Value};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Hook building a native object from validated data
pub type CreateFn = Arc<dyn Fn(Map) -> Result<Value> + Send + Sync>;

/// Hook applying validated data to an existing native object
pub type UpdateFn = Arc<dyn Fn(&mut Value, Map) -> Result<()> + Send + Sync>;

/// Immutable field registry of one serializer type
pub struct SerializerDef {
    name: String,
    fields: IndexMap<String, Arc<FieldDef>>,
    create: Option<CreateFn>,
    update: Option<UpdateFn>,
}

impl SerializerDef {
    pub fn builder(name: impl Into<String>) -> SerializerDefBuilder {
        SerializerDefBuilder {
            name: name.into(),
            bases: Vec::new(),
            declared: Vec::new(),
            counter: 0,
            create: None,
            update: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective fields in their final order
    pub fn fields(&self) -> &IndexMap<String, Arc<FieldDef>> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn create_hook(&self) -> Option<&CreateFn> {
        self.create.as_ref()
    }

    pub fn update_hook(&self) -> Option<&UpdateFn> {
        self.update.as_ref()
    }

    /// Use this serializer as a nested field of another
    pub fn as_field(self: Arc<Self>) -> FieldBuilder {
        FieldBuilder::from_kind(KindDecl::Nested(self))
    }
}

impl fmt::Debug for SerializerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerDef")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .field("create", &self.create.is_some())
            .field("update", &self.update.is_some())
            .finish()
    }
}

struct Declared {
    order: usize,
    name: String,
    field: FieldBuilder,
}

/// Explicit registration step for one serializer type
pub struct SerializerDefBuilder {
    name: String,
    bases: Vec<Arc<SerializerDef>>,
    declared: Vec<Declared>,
    counter: usize,
    create: Option<CreateFn>,
    update: Option<UpdateFn>,
}

impl SerializerDefBuilder {
    /// Inherit the fields and hooks of `base`; repeatable, in base order
    pub fn extends(mut self, base: &Arc<SerializerDef>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldBuilder>) -> Self {
        self.declared.push(Declared {
            order: self.counter,
            name: name.into(),
            field: field.into(),
        });
        self.counter += 1;
        self
    }

    pub fn create_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(Map) -> Result<Value> + Send + Sync + 'static,
    {
        self.create = Some(Arc::new(hook));
        self
    }

    pub fn update_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Value, Map) -> Result<()> + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(hook));
        self
    }

    /// Freeze the registry
    pub fn build(mut self) -> Result<Arc<SerializerDef>> {
        self.declared.sort_by_key(|declared| declared.order);

        let mut seen = HashSet::new();
        for declared in &self.declared {
            if !seen.insert(declared.name.as_str()) {
                return Err(Error::configuration(format!(
                    "Field `{}` is declared more than once on `{}`",
                    declared.name, self.name
                )));
            }
        }

        let mut fields: IndexMap<String, Arc<FieldDef>> = IndexMap::new();
        for base in &self.bases {
            for (name, def) in base.fields() {
                fields.insert(name.clone(), Arc::clone(def));
            }
        }
        for declared in self.declared {
            let def = declared.field.build().map_err(|e| e.for_field(&declared.name))?;
            fields.insert(declared.name, def);
        }

        let create = self
            .create
            .or_else(|| self.bases.iter().find_map(|base| base.create.clone()));
        let update = self
            .update
            .or_else(|| self.bases.iter().find_map(|base| base.update.clone()));

        log::debug!(
            "Registered serializer `{}` with fields {:?}",
            self.name,
            fields.keys().collect::<Vec<_>>()
        );

        Ok(Arc::new(SerializerDef {
            name: self.name,
            fields,
            create,
            update,
        }))
    }
}

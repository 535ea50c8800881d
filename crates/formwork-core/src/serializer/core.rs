//! Top-level serializer and the validate / save workflow
//!
//! A [`Serializer`] instantiates the fields of a [`SerializerDef`], binds
//! them to a fresh [`RootContext`], and exposes both the direct calls
//! (`validate`, `serialize`, `create`, `update`) and the stateful workflow
//! built on them (`is_valid`, `errors`, `validated_data`, `save`, `to_data`).
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use super::registry::SerializerDef;
use crate::error::{ErrorDetail, ValidationError};
use crate::fields::bound::{
    bind_all, create_object, initial_fields, instantiate, run_fields, serialize_fields, update_object,
};
use crate::fields::{fail, Field, RootContext, SERIALIZER_MESSAGES};
use crate::form::Input;
use crate::render::FieldItems;
use crate::value::{Map, Value};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Key under which errors not tied to a single field are reported
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// A serializer instance
#[derive(Debug)]
pub struct Serializer {
    def: Arc<SerializerDef>,
    fields: IndexMap<String, Field>,
    partial: bool,
    context: Map,
    instance: Option<Value>,
    data: Option<Input>,
    validated: Option<Value>,
    errors: Option<ValidationError>,
}

impl Serializer {
    pub fn new(def: &Arc<SerializerDef>) -> Self {
        let mut serializer = Self {
            def: Arc::clone(def),
            fields: instantiate(def.fields()),
            partial: false,
            context: Map::new(),
            instance: None,
            data: None,
            validated: None,
            errors: None,
        };
        serializer.rebind();
        serializer
    }

    /// Treat every field as optional
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self.rebind();
        self
    }

    /// Add a caller context entry, readable from method fields
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self.rebind();
        self
    }

    /// Instance to serialize, or to update on `save()`
    pub fn instance(mut self, instance: impl Into<Value>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Input for the `is_valid()` workflow
    pub fn data(mut self, input: impl Into<Input>) -> Self {
        self.data = Some(input.into());
        self.validated = None;
        self.errors = None;
        self
    }

    fn rebind(&mut self) {
        let root = Arc::new(
            RootContext::new(self.def.name())
                .with_partial(self.partial)
                .with_context(self.context.clone()),
        );
        bind_all(&mut self.fields, self.def.name(), &root);
    }

    pub fn def(&self) -> &Arc<SerializerDef> {
        &self.def
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Per-instance field, for adjusting one serializer without touching its type
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn get_instance(&self) -> Option<&Value> {
        self.instance.as_ref()
    }

    /// Validate primitive input into a mapping of native values
    pub fn validate(&self, input: impl Into<Input>) -> Result<Value> {
        self.validate_input(&input.into())
    }

    fn validate_input(&self, input: &Input) -> Result<Value> {
        let container = input.as_container().ok_or_else(|| self.not_a_dict(input))?;
        run_fields(&self.fields, container).map(Value::Map)
    }

    fn not_a_dict(&self, input: &Input) -> Error {
        let params = [("input_type", input.type_name().to_string())];
        match fail(self.name(), SERIALIZER_MESSAGES, "not_a_dict", &params) {
            Error::Validation(err) => {
                let mut errors = IndexMap::new();
                errors.insert(NON_FIELD_ERRORS.to_string(), err.into_detail());
                ValidationError::fields(errors).into()
            }
            other => other,
        }
    }

    /// Serialize a native instance into a primitive mapping
    pub fn serialize(&self, instance: &Value) -> Result<Value> {
        serialize_fields(&self.fields, instance).map(Value::Map)
    }

    /// Validate input and build a native object from it
    pub fn create(&self, input: impl Into<Input>) -> Result<Value> {
        let validated = self.validate(input)?;
        create_object(&self.def, validated)
    }

    /// Validate input and apply it to an existing instance
    pub fn update(&self, instance: &mut Value, input: impl Into<Input>) -> Result<()> {
        let validated = self.validate(input)?;
        update_object(&self.def, instance, validated)
    }

    /// Validate input straight into a typed value
    pub fn create_as<T: DeserializeOwned>(&self, input: impl Into<Input>) -> Result<T> {
        self.validate(input)?.deserialize_into()
    }

    /// Run validation over the held data, recording the outcome
    ///
    /// Returns `Ok(false)` for invalid input; programmer errors are returned
    /// as `Err` and never recorded as validation errors.
    pub fn is_valid(&mut self) -> Result<bool> {
        let input = self.data.as_ref().ok_or_else(|| {
            Error::configuration("Cannot call `is_valid()` as no `data` was passed when instantiating the serializer")
        })?;

        match self.validate_input(input) {
            Ok(validated) => {
                self.validated = Some(validated);
                self.errors = None;
                Ok(true)
            }
            Err(Error::Validation(err)) => {
                log::debug!("`{}` rejected input with {} error(s)", self.name(), err.detail().count());
                self.validated = None;
                self.errors = Some(err);
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    /// Errors recorded by the last `is_valid()`
    pub fn errors(&self) -> Option<&ValidationError> {
        self.errors.as_ref()
    }

    /// Errors as a `{field: message}` mapping, empty when valid
    pub fn error_detail(&self) -> ErrorDetail {
        self.errors
            .as_ref()
            .map(|err| err.detail().clone())
            .unwrap_or_else(|| ErrorDetail::Fields(IndexMap::new()))
    }

    /// Data validated by the last successful `is_valid()`
    pub fn validated_data(&self) -> Option<&Value> {
        self.validated.as_ref()
    }

    /// Update the held instance, or create one, from the validated data
    pub fn save(&mut self) -> Result<Value> {
        if self.errors.is_some() {
            return Err(Error::configuration("You cannot call `save()` on a serializer with invalid data"));
        }
        let validated = self.validated.clone().ok_or_else(|| {
            Error::configuration("You must call `is_valid()` before calling `save()`")
        })?;

        // The held instance only changes once the update succeeds
        let instance = match &self.instance {
            Some(held) => {
                let mut instance = held.clone();
                update_object(&self.def, &mut instance, validated)?;
                instance
            }
            None => create_object(&self.def, validated)?,
        };
        self.instance = Some(instance.clone());
        Ok(instance)
    }

    /// Primitive representation of the held instance, or the initial
    /// representation when there is none
    pub fn to_data(&self) -> Result<Value> {
        match &self.instance {
            Some(instance) => self.serialize(instance),
            None => Ok(Value::Map(initial_fields(&self.fields))),
        }
    }

    /// Serialized output paired with the field that produced each key
    pub fn field_items(&self, instance: &Value) -> Result<FieldItems<'_>> {
        let mut items = FieldItems::new();
        for (name, field) in &self.fields {
            if field.write_only() {
                continue;
            }
            let native = field.get_attribute(instance)?;
            if let Some(primitive) = field.serialize(&native)? {
                items.push(name.clone(), primitive, field);
            }
        }
        Ok(items)
    }
}

//! Per-instance fields and their binding
//!
//! A [`Field`] wraps a shared [`FieldDef`] with the state that belongs to
//! one serializer instance: the binding (name, parent, root context), the
//! resolved source and label, the runtime `required` flag, and the
//! instantiated children of nested and list fields. Definitions are never
//! mutated, so partial mode or rebinding on one instance cannot leak into
//! another.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use super::method::MethodFn;
use super::options::{FieldDef, FieldKind};
use super::{fail, humanize, FieldType, LIST_MESSAGES, SERIALIZER_MESSAGES};
use crate::error::ValidationError;
use crate::form::{parse_html_dict, parse_html_list, Container, Input, MultiValueLookup};
use crate::serializer::SerializerDef;
use crate::source::Source;
use crate::value::{Map, Object, Value};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Context shared by every field bound under one top-level serializer
#[derive(Debug, Clone, Default)]
pub struct RootContext {
    serializer: String,
    partial: bool,
    context: Map,
}

impl RootContext {
    pub fn new(serializer: impl Into<String>) -> Self {
        Self {
            serializer: serializer.into(),
            ..Self::default()
        }
    }

    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    pub fn with_context(mut self, context: Map) -> Self {
        self.context = context;
        self
    }

    /// Name of the top-level serializer
    pub fn serializer(&self) -> &str {
        &self.serializer
    }

    /// Whether every field is optional for this pass
    pub fn partial(&self) -> bool {
        self.partial
    }

    /// Caller-supplied context
    pub fn context(&self) -> &Map {
        &self.context
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

/// Where a field sits: its name, its owning serializer and the root context
#[derive(Debug, Clone)]
pub struct Binding {
    field_name: String,
    parent: String,
    root: Arc<RootContext>,
}

impl Binding {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn root(&self) -> &RootContext {
        &self.root
    }
}

#[derive(Clone)]
enum Node {
    Scalar(Arc<dyn FieldType>),
    Method(MethodFn),
    Nested {
        serializer: Arc<SerializerDef>,
        fields: IndexMap<String, Field>,
    },
    List(Box<Field>),
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(field_type) => f.debug_tuple("Scalar").field(field_type).finish(),
            Node::Method(_) => f.write_str("Method"),
            Node::Nested { fields, .. } => f.debug_tuple("Nested").field(fields).finish(),
            Node::List(child) => f.debug_tuple("List").field(child).finish(),
        }
    }
}

/// A field instance owned by one serializer
#[derive(Debug, Clone)]
pub struct Field {
    def: Arc<FieldDef>,
    binding: Option<Binding>,
    required: bool,
    source: Option<Source>,
    label: Option<String>,
    required_override: Option<bool>,
    label_override: Option<String>,
    node: Node,
}

impl Field {
    /// Instantiate a definition, children included, in the unbound state
    pub fn new(def: Arc<FieldDef>) -> Self {
        let node = match def.kind() {
            FieldKind::Scalar(field_type) => Node::Scalar(Arc::clone(field_type)),
            FieldKind::Method(callback) => Node::Method(Arc::clone(callback)),
            FieldKind::Nested(serializer) => Node::Nested {
                serializer: Arc::clone(serializer),
                fields: instantiate(serializer.fields()),
            },
            FieldKind::List(child) => Node::List(Box::new(Field::new(Arc::clone(child)))),
        };
        Self {
            binding: None,
            required: def.required(),
            source: def.source().cloned(),
            label: def.label().map(str::to_string),
            required_override: None,
            label_override: None,
            node,
            def,
        }
    }

    /// Attach this field, and recursively its children, to a serializer
    ///
    /// Everything set here is recomputed from the definition, so binding
    /// again (for example after switching to partial mode) is safe.
    pub fn bind(&mut self, field_name: &str, parent: &str, root: &Arc<RootContext>) {
        self.source = Some(match self.def.source() {
            Some(source) => source.clone(),
            None if field_name.is_empty() => Source::Wildcard,
            None => Source::attribute(field_name),
        });
        self.label = self
            .label_override
            .clone()
            .or_else(|| self.def.label().map(str::to_string))
            .or_else(|| (!field_name.is_empty()).then(|| humanize(field_name)));
        self.required = self.required_override.unwrap_or(self.def.required()) && !root.partial();
        self.binding = Some(Binding {
            field_name: field_name.to_string(),
            parent: parent.to_string(),
            root: Arc::clone(root),
        });

        let owner = self.def.type_name().to_string();
        match &mut self.node {
            Node::Nested { fields, .. } => bind_all(fields, &owner, root),
            Node::List(child) => child.bind(field_name, &owner, root),
            Node::Scalar(_) | Node::Method(_) => {}
        }
    }

    pub fn def(&self) -> &FieldDef {
        &self.def
    }

    pub fn type_name(&self) -> &str {
        self.def.type_name()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding(&self) -> Result<&Binding> {
        self.binding.as_ref().ok_or_else(|| self.unbound("binding"))
    }

    pub fn field_name(&self) -> Result<&str> {
        self.binding
            .as_ref()
            .map(Binding::field_name)
            .ok_or_else(|| self.unbound("field_name"))
    }

    pub fn parent(&self) -> Result<&str> {
        self.binding
            .as_ref()
            .map(Binding::parent)
            .ok_or_else(|| self.unbound("parent"))
    }

    pub fn root(&self) -> Result<&RootContext> {
        self.binding
            .as_ref()
            .map(Binding::root)
            .ok_or_else(|| self.unbound("root"))
    }

    pub fn source(&self) -> Result<&Source> {
        self.source.as_ref().ok_or_else(|| self.unbound("source"))
    }

    /// Runtime `required`, which partial mode switches off
    pub fn required(&self) -> bool {
        self.required
    }

    /// Override `required` for this instance only
    ///
    /// The override survives rebinding; partial mode still switches it off.
    pub fn set_required(&mut self, required: bool) -> Result<()> {
        if required && (self.def.read_only() || self.def.default().is_some()) {
            return Err(Error::configuration(
                "`required` cannot be set on a read-only field or one with a default",
            ));
        }
        self.required_override = Some(required);
        let partial = self.binding.as_ref().is_some_and(|binding| binding.root.partial());
        self.required = required && !partial;
        Ok(())
    }

    /// Override the label for this instance only
    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.label = Some(label.clone());
        self.label_override = Some(label);
    }

    pub fn read_only(&self) -> bool {
        self.def.read_only()
    }

    pub fn write_only(&self) -> bool {
        self.def.write_only()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Children of a nested serializer field
    pub fn fields(&self) -> Option<&IndexMap<String, Field>> {
        match &self.node {
            Node::Nested { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().and_then(|fields| fields.get(name))
    }

    /// Element field of a list field
    pub fn child(&self) -> Option<&Field> {
        match &self.node {
            Node::List(child) => Some(child),
            _ => None,
        }
    }

    fn unbound(&self, attribute: &'static str) -> Error {
        Error::UnboundField {
            field_type: self.type_name().to_string(),
            attribute,
        }
    }

    fn fail(&self, key: &str, params: &[(&str, String)]) -> Error {
        match &self.node {
            Node::Scalar(field_type) => field_type.fail(key, params),
            Node::Nested { .. } => fail(self.type_name(), SERIALIZER_MESSAGES, key, params),
            Node::List(_) => fail(self.type_name(), LIST_MESSAGES, key, params),
            Node::Method(_) => fail(self.type_name(), &[], key, params),
        }
    }

    /// Read this field's slice of the input; `None` means nothing was supplied
    pub fn get_value(&self, data: &dyn Container) -> Result<Option<Input>> {
        let field_name = self.field_name()?;
        match data.as_multi_value() {
            Some(form) => self.form_value(form, field_name),
            None => Ok(data.get(field_name).map(Input::Value)),
        }
    }

    fn form_value(&self, form: &dyn MultiValueLookup, field_name: &str) -> Result<Option<Input>> {
        let partial = self.root()?.partial();
        match &self.node {
            Node::Scalar(field_type) if field_type.reads_list_from_form() => {
                if form.contains_key(field_name) {
                    Ok(Some(Input::Value(Value::List(form.get_list(field_name)))))
                } else if partial {
                    Ok(None)
                } else {
                    Ok(Some(Input::Value(Value::List(Vec::new()))))
                }
            }
            Node::Scalar(field_type) => match form.get_list(field_name).into_iter().next() {
                Some(value) => Ok(Some(Input::Value(value))),
                None if partial => Ok(None),
                None => Ok(field_type.absent_form_value().map(Input::Value)),
            },
            Node::Method(_) => Ok(None),
            Node::Nested { .. } => {
                let sub = parse_html_dict(form, field_name)?;
                Ok((!sub.is_empty()).then(|| Input::from(sub)))
            }
            Node::List(_) => {
                let values = form.get_list(field_name);
                if !values.is_empty() {
                    return Ok(Some(Input::List(values.into_iter().map(Input::Value).collect())));
                }
                let items = parse_html_list(form, field_name)?;
                Ok((!items.is_empty()).then(|| Input::List(items)))
            }
        }
    }

    /// Validate supplied input into a native value
    ///
    /// Returns `Ok(None)` when the field contributes nothing: read-only
    /// fields, and optional fields without input or default.
    pub fn validate(&self, data: Option<Input>) -> Result<Option<Value>> {
        if self.def.read_only() {
            return Ok(None);
        }
        let data = match data {
            Some(data) => data,
            None if self.required => return Err(self.fail("required", &[])),
            None => return Ok(self.def.default().cloned()),
        };

        match &self.node {
            Node::Scalar(field_type) => field_type.to_native(&data.into_value()).map(Some),
            Node::Method(_) => Ok(None),
            Node::Nested { fields, .. } => {
                let container = data.as_container().ok_or_else(|| {
                    self.fail("not_a_dict", &[("input_type", data.type_name().to_string())])
                })?;
                run_fields(fields, container).map(|map| Some(Value::Map(map)))
            }
            Node::List(child) => {
                let items = self.list_items(data)?;
                validate_items(child, items).map(Some)
            }
        }
    }

    fn list_items(&self, data: Input) -> Result<Vec<Input>> {
        let not_a_list = |type_name: &str| self.fail("not_a_list", &[("input_type", type_name.to_string())]);
        match data {
            Input::List(items) => Ok(items),
            Input::Value(Value::List(items)) => Ok(items.into_iter().map(Input::Value).collect()),
            Input::Value(Value::Set(items)) => Ok(items.into_iter().map(Input::Value).collect()),
            Input::Value(other) => Err(not_a_list(other.type_name())),
            Input::Container(container) => match container.as_multi_value() {
                Some(form) => parse_html_list(form, ""),
                None => Err(not_a_list(container.type_name())),
            },
        }
    }

    /// Write a validated value into the output mapping at this field's source
    pub fn set_value(&self, target: &mut Map, value: Value) -> Result<()> {
        self.source()?.write(target, value)
    }

    /// Read this field's native value off an instance
    pub fn get_attribute(&self, instance: &Value) -> Result<Value> {
        self.source()?.read(instance)
    }

    /// Serialize a native value; `None` means the field is omitted
    pub fn serialize(&self, value: &Value) -> Result<Option<Value>> {
        if self.def.write_only() {
            return Ok(None);
        }
        match &self.node {
            Node::Scalar(field_type) => field_type.to_primitive(value).map(Some),
            Node::Method(callback) => callback(value, self.binding()?).map(Some),
            Node::Nested { .. } if value.is_null() => Ok(Some(Value::Null)),
            Node::Nested { fields, .. } => serialize_fields(fields, value).map(|map| Some(Value::Map(map))),
            Node::List(child) => serialize_items(child, value).map(Some),
        }
    }

    /// What this field shows when there is no instance
    pub fn initial_value(&self) -> Value {
        match &self.node {
            Node::Nested { fields, .. } => Value::Map(initial_fields(fields)),
            Node::List(_) => Value::List(Vec::new()),
            Node::Scalar(_) | Node::Method(_) => self.def.initial().cloned().unwrap_or(Value::Null),
        }
    }

    /// Build native objects out of validated data
    pub fn create(&self, validated: Value) -> Result<Value> {
        match &self.node {
            Node::Nested { serializer, .. } => create_object(serializer, validated),
            Node::List(child) => match validated {
                Value::List(items) => items
                    .into_iter()
                    .map(|item| child.create(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List),
                other => Err(Error::NativeType {
                    expected: "list",
                    found: other.type_name().to_string(),
                }),
            },
            Node::Scalar(_) | Node::Method(_) => Ok(validated),
        }
    }

    /// Apply validated data to an existing native object
    pub fn update(&self, instance: &mut Value, validated: Value) -> Result<()> {
        match &self.node {
            Node::Nested { serializer, .. } => update_object(serializer, instance, validated),
            _ => {
                *instance = validated;
                Ok(())
            }
        }
    }
}

/// Instantiate a serializer's field definitions, unbound
pub(crate) fn instantiate(defs: &IndexMap<String, Arc<FieldDef>>) -> IndexMap<String, Field> {
    defs.iter()
        .map(|(name, def)| (name.clone(), Field::new(Arc::clone(def))))
        .collect()
}

pub(crate) fn bind_all(fields: &mut IndexMap<String, Field>, parent: &str, root: &Arc<RootContext>) {
    for (name, field) in fields.iter_mut() {
        field.bind(name, parent, root);
    }
    log::trace!("Bound {} fields under `{}` (partial: {})", fields.len(), parent, root.partial());
}

/// Validate every writable field, collecting per-field errors
///
/// All fields are processed even after a failure so the caller gets the
/// complete `{field: message}` report in one pass. Programmer errors abort
/// immediately.
pub(crate) fn run_fields(fields: &IndexMap<String, Field>, data: &dyn Container) -> Result<Map> {
    let mut validated = Map::new();
    let mut errors = IndexMap::new();

    for (name, field) in fields {
        if field.read_only() {
            continue;
        }
        let value = field.get_value(data)?;
        log::trace!("Validating field `{}` (supplied: {})", name, value.is_some());
        match field.validate(value) {
            Ok(Some(native)) => field.set_value(&mut validated, native)?,
            Ok(None) => {}
            Err(Error::Validation(err)) => {
                errors.insert(name.clone(), err.into_detail());
            }
            Err(other) => return Err(other),
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::fields(errors).into());
    }
    Ok(validated)
}

/// Validate every element through the same child field, errors keyed by position
pub(crate) fn validate_items(child: &Field, items: Vec<Input>) -> Result<Value> {
    let mut validated = Vec::with_capacity(items.len());
    let mut errors = BTreeMap::new();

    for (index, item) in items.into_iter().enumerate() {
        match child.validate(Some(item)) {
            Ok(Some(native)) => validated.push(native),
            Ok(None) => {}
            Err(Error::Validation(err)) => {
                errors.insert(index, err.into_detail());
            }
            Err(other) => return Err(other),
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::items(errors).into());
    }
    Ok(Value::List(validated))
}

pub(crate) fn serialize_fields(fields: &IndexMap<String, Field>, instance: &Value) -> Result<Map> {
    let mut output = Map::new();
    for (name, field) in fields {
        if field.write_only() {
            continue;
        }
        let native = field.get_attribute(instance)?;
        if let Some(primitive) = field.serialize(&native)? {
            output.insert(name.clone(), primitive);
        }
    }
    Ok(output)
}

pub(crate) fn serialize_items(child: &Field, value: &Value) -> Result<Value> {
    let items: Vec<&Value> = match value {
        Value::Null => return Ok(Value::Null),
        Value::List(items) => items.iter().collect(),
        Value::Set(items) => items.iter().collect(),
        other => {
            return Err(Error::NativeType {
                expected: "list",
                found: other.type_name().to_string(),
            })
        }
    };

    items
        .into_iter()
        .filter_map(|item| child.serialize(item).transpose())
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

pub(crate) fn initial_fields(fields: &IndexMap<String, Field>) -> Map {
    fields
        .iter()
        .filter(|(_, field)| !field.read_only())
        .map(|(name, field)| (name.clone(), field.initial_value()))
        .collect()
}

fn into_map(validated: Value) -> Result<Map> {
    match validated {
        Value::Map(map) => Ok(map),
        other => Err(Error::NativeType {
            expected: "dict",
            found: other.type_name().to_string(),
        }),
    }
}

/// `create()` for a serializer: its hook, or a `BasicObject`
pub(crate) fn create_object(serializer: &SerializerDef, validated: Value) -> Result<Value> {
    let map = into_map(validated)?;
    match serializer.create_hook() {
        Some(hook) => hook(map),
        None => Ok(Value::Object(Object::basic(map))),
    }
}

/// `update()` for a serializer: its hook, or attribute assignment
pub(crate) fn update_object(serializer: &SerializerDef, instance: &mut Value, validated: Value) -> Result<()> {
    let map = into_map(validated)?;
    if let Some(hook) = serializer.update_hook() {
        return hook(instance, map);
    }
    match instance {
        Value::Object(object) => {
            for (name, value) in map {
                object.set(name, value);
            }
            Ok(())
        }
        Value::Map(target) => {
            target.extend(map);
            Ok(())
        }
        other => Err(Error::NativeType {
            expected: "object",
            found: other.type_name().to_string(),
        }),
    }
}

//! Computed fields
//!
//! A method field is serialized by a callback injected at declaration time.
//! The callback receives the whole instance and the field's binding, so it
//! can read the field name and the caller context of the root serializer.

use super::bound::Binding;
use super::options::{FieldBuilder, KindDecl};
use crate::value::Value;
use crate::Result;
use std::sync::Arc;

pub const TYPE_NAME: &str = "SerializerMethodField";

/// Callback computing a method field's output
pub type MethodFn = Arc<dyn Fn(&Value, &Binding) -> Result<Value> + Send + Sync>;

pub(crate) fn field<F>(callback: F) -> FieldBuilder
where
    F: Fn(&Value, &Binding) -> Result<Value> + Send + Sync + 'static,
{
    FieldBuilder::from_kind(KindDecl::Method(Arc::new(callback)))
}

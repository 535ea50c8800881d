//! Serializers: composite fields over an ordered registry of child fields
//!
//! The serializer system is organized into focused modules:
//! - `registry`: `SerializerDef` and declaration ordering
//! - `core`: the top-level `Serializer` and its validate/save workflow
//! - `list`: `ListSerializer` for homogeneous sequences
//! - `tests`: behaviour of the whole pipeline
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

pub mod core;
pub mod list;
pub mod registry;
pub mod tests;

pub use self::core::{Serializer, NON_FIELD_ERRORS};
pub use self::list::ListSerializer;
pub use self::registry::{CreateFn, SerializerDef, SerializerDefBuilder, UpdateFn};

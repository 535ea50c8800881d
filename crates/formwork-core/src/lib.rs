//! Formwork Core - declarative conversion between primitive and native data
//!
//! This crate converts "primitive" data (JSON documents, HTML form
//! submissions) into validated "native" data and back, driven by
//! declaratively defined serializers.
//!
//! # Main Components
//!
//! - **Values**: [`Value`], the dynamic representation of primitive and native data
//! - **Error Handling**: validation errors kept apart from programmer errors, using `thiserror`
//! - **Fields**: typed fields, their declaration options and per-instance binding
//! - **Serializers**: ordered field registries, nested serializers and list serializers
//! - **Form Input**: reconstruction of nested and list values from flat HTML forms
//! - **Model Adapter**: serializers generated from model field metadata
//! - **Rendering**: template selection for form renderers
//!
//! # Example
//!
//! ```
//! use formwork_core::{fields, Serializer, SerializerDef};
//! use serde_json::json;
//!
//! fn example() -> formwork_core::Result<()> {
//!     let account = SerializerDef::builder("Account")
//!         .field("username", fields::text())
//!         .field("age", fields::integer().required(false))
//!         .build()?;
//!
//!     let serializer = Serializer::new(&account);
//!     let validated = serializer.validate(json!({"username": "ada", "age": "36"}))?;
//!     assert_eq!(validated.to_json(), json!({"username": "ada", "age": 36}));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod fields;
pub mod form;
pub mod model;
pub mod render;
pub mod serializer;
pub mod source;
pub mod value;

mod proptest_strategies;

// Re-export main types for convenience
pub use error::{Error, ErrorDetail, Result, ValidationError};
pub use fields::{
    Binding, BooleanField, ChoiceField, Choices, Field, FieldBuilder, FieldDef, FieldKind, FieldType,
    IntegerField, MultipleChoiceField, RootContext, TextField,
};
pub use form::{parse_html_dict, parse_html_list, Container, Input, MultiDict, MultiValueLookup};
pub use model::{field_for, ModelField, ModelFieldKind, ModelSchema, ModelSerializer};
pub use render::{template_name, FieldItems};
pub use serializer::{ListSerializer, Serializer, SerializerDef, SerializerDefBuilder, NON_FIELD_ERRORS};
pub use source::Source;
pub use value::{Map, Object, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

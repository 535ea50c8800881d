//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand:
//! - `validate`: validate a document or form body against a model schema
//! - `serialize`: render a native object as primitive data
//! - `fields`: list the fields a model schema resolves to
//! - `completions`: generate shell completions

pub mod completions;
pub mod fields;
pub mod serialize;
pub mod utils;
pub mod validate;

pub use completions::handle_completions;
pub use fields::handle_fields;
pub use serialize::handle_serialize;
pub use validate::handle_validate;

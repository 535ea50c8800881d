//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! primitive values, field names and flat form submissions.

#![cfg(test)]

use crate::form::MultiDict;
use crate::value::{Map, Value};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

/// Strategy for generating field names
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Strategy for generating dotted source paths
pub fn source_path_strategy() -> impl Strategy<Value = Vec<String>> {
    vec(field_name_strategy(), 1..4)
}

/// Strategy for generating primitive values with controlled depth
pub fn primitive_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9 ]{0,30}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        16, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..5).prop_map(Value::List),
                btree_map(field_name_strategy(), inner, 0..5)
                    .prop_map(|entries| Value::Map(entries.into_iter().collect::<Map>())),
            ]
        },
    )
}

/// Strategy for generating integer literals as a form would submit them
pub fn integer_text_strategy() -> impl Strategy<Value = (i64, String)> {
    (any::<i64>(), 0usize..3).prop_map(|(n, padding)| (n, format!("{:width$}", n, width = padding)))
}

/// Strategy for generating flat form submissions
pub fn multidict_strategy() -> impl Strategy<Value = MultiDict> {
    vec((field_name_strategy(), "[a-zA-Z0-9]{0,10}"), 0..8)
        .prop_map(|pairs| pairs.into_iter().map(|(key, value)| (key, Value::String(value))).collect())
}

//! # Create-time validation
//!
//! Create payloads are untyped JSON. Any wrong-shaped field yields the same
//! single rejection. [`validate`] checks the shape; [`parse_candidate`] turns
//! a passing candidate into an [`Animal`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::Animal;

/// Message returned to clients for any rejected candidate.
pub const NOT_PROPERLY_FORMATTED: &str = "The animal is not properly formatted.";

/// A create payload did not have the shape of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("The animal is not properly formatted.")]
pub struct ValidationError;

/// Whether `candidate` has every required field with the right JSON type.
///
/// `name`, `species` and `diet` must be strings (empty is fine) and
/// `personalityTraits` must be an array of strings (empty is fine). The `id`
/// field is not inspected.
pub fn validate(candidate: &Value) -> bool {
    let Some(fields) = candidate.as_object() else {
        return false;
    };
    has_string(fields, "name")
        && has_string(fields, "species")
        && has_string(fields, "diet")
        && fields
            .get("personalityTraits")
            .and_then(Value::as_array)
            .is_some_and(|traits| traits.iter().all(Value::is_string))
}

fn has_string(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).is_some_and(Value::is_string)
}

/// Validate `candidate` and convert it to an [`Animal`].
///
/// A missing or non-string `id` becomes an empty id. Keys outside the record
/// shape are dropped.
pub fn parse_candidate(candidate: &Value) -> Result<Animal, ValidationError> {
    if !validate(candidate) {
        return Err(ValidationError);
    }

    let text = |key: &str| {
        candidate
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let personality_traits = candidate
        .get("personalityTraits")
        .and_then(Value::as_array)
        .map(|traits| {
            traits
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Animal {
        id: text("id"),
        name: text("name"),
        species: text("species"),
        diet: text("diet"),
        personality_traits,
    })
}

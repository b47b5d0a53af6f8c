//! Schema rules for a single manifest document.
//!
//! `validate_manifest` is a pure function from a document (plus its declared
//! id) to a list of error strings; an empty list means the document is
//! valid. Checks are layered: the presence of `id`/`name`/`type` gates every
//! deeper structural check, but within a layer all errors are collected
//! rather than stopping at the first.

use crate::manifest::types::{Category, ModelType};
use serde_json::Value;
use std::str::FromStr;

/// Required top-level fields every manifest must carry.
const REQUIRED_FIELDS: [&str; 3] = ["id", "name", "type"];

/// Per-variant required fields.
const VARIANT_FIELDS: [&str; 5] = ["id", "file", "url", "sha256", "size"];

/// Single-file record required fields.
const FILE_FIELDS: [&str; 3] = ["url", "sha256", "size"];

fn valid_types() -> String {
    ModelType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn valid_categories() -> String {
    Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

/// Validate a single manifest document. Returns the list of errors.
///
/// `declared_id` is the identifier derived from the manifest's storage key
/// (the file stem); the document's `id` field must match it exactly.
pub fn validate_manifest(manifest: &Value, declared_id: &str) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if manifest.get(field).is_none() {
            errors.push(format!("Missing required field: {}", field));
        }
    }

    // Deeper checks assume the required fields exist.
    if !errors.is_empty() {
        return errors;
    }

    let id_value = &manifest["id"];
    if id_value.as_str() != Some(declared_id) {
        // Echo the offending value even when it is not a string.
        let shown = match id_value.as_str() {
            Some(s) => s.to_string(),
            None => id_value.to_string(),
        };
        errors.push(format!(
            "ID '{}' does not match filename '{}'",
            shown, declared_id
        ));
    }

    let type_str = manifest["type"].as_str().unwrap_or_default();
    let model_type = ModelType::from_str(type_str).ok();
    if model_type.is_none() {
        errors.push(format!(
            "Invalid type '{}'. Must be one of: {}",
            type_str,
            valid_types()
        ));
    }

    if let Some(category) = manifest.get("category") {
        let category_str = category.as_str().unwrap_or_default();
        if Category::from_str(category_str).is_err() {
            errors.push(format!(
                "Invalid category '{}'. Must be one of: {}",
                category_str,
                valid_categories()
            ));
        }
    }

    let is_recipe = model_type == Some(ModelType::Recipe);

    let variants = manifest
        .get("variants")
        .and_then(Value::as_array)
        .filter(|v| !v.is_empty());
    let file = manifest.get("file").filter(|f| !f.is_null());

    if is_recipe {
        // Recipes reference other models instead of carrying files.
        match manifest.get("recipe") {
            None => errors.push("Recipe type must have a 'recipe' config section".to_string()),
            Some(recipe) => {
                if recipe.get("base_model").is_none() {
                    errors.push("Recipe 'recipe' section must have 'base_model'".to_string());
                }
            }
        }
    } else if variants.is_none() && file.is_none() {
        errors.push("Must have either 'variants' (non-empty) or 'file'".to_string());
    }

    if let Some(variants) = variants {
        for (i, variant) in variants.iter().enumerate() {
            for field in VARIANT_FIELDS {
                if variant.get(field).is_none() {
                    errors.push(format!("Variant {} missing required field: {}", i, field));
                }
            }
            if let Some(size) = variant.get("size") {
                if !is_integer(size) {
                    errors.push(format!("Variant {} 'size' must be an integer (bytes)", i));
                }
            }
        }
    }

    if let Some(file) = file {
        for field in FILE_FIELDS {
            if file.get(field).is_none() {
                errors.push(format!("File missing required field: {}", field));
            }
        }
        if let Some(size) = file.get("size") {
            if !is_integer(size) {
                errors.push("File 'size' must be an integer (bytes)".to_string());
            }
        }
    }

    // preview_images stays unvalidated: optional until the web UI requires it.

    errors
}

//! Manifest document loading.
//!
//! Manifests are author-written YAML. They are deliberately loaded into a
//! `serde_json::Value` tree rather than a typed struct: schema problems must
//! come back as collected diagnostics (one list per document), not as a hard
//! deserialization failure on the first missing field, and fields the schema
//! does not know about must survive into the index verbatim.

use crate::error::{RegistryError, Result};
use serde_json::Value;
use std::path::Path;

/// Derive the declared manifest id from its storage path (the file stem).
pub fn manifest_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Load a manifest file into a JSON value tree.
///
/// Fails on unreadable files, YAML syntax errors, empty documents, and
/// documents whose top level is not a mapping.
pub fn load_manifest(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(RegistryError::ManifestNotFound(path.to_path_buf()));
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| RegistryError::io_with_path(e, path))?;

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|e| RegistryError::Yaml {
            message: format!("Failed to parse {}: {}", path.display(), e),
            source: Some(e),
        })?;

    if yaml.is_null() {
        return Err(RegistryError::Yaml {
            message: format!("Empty manifest file: {}", path.display()),
            source: None,
        });
    }

    // Re-serialize through serde_json to get a Value we can validate and
    // later emit into the index. Non-string mapping keys fail here.
    let value = serde_json::to_value(&yaml).map_err(|e| RegistryError::Json {
        message: format!("Manifest {} is not JSON-representable: {}", path.display(), e),
        source: Some(e),
    })?;

    if !value.is_object() {
        return Err(RegistryError::Yaml {
            message: format!("Manifest {} is not a mapping", path.display()),
            source: None,
        });
    }

    Ok(value)
}

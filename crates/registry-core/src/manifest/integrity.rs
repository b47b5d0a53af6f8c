//! Integrity audit for unresolved placeholder hashes.
//!
//! Authors may register a file before its sha256 is known by writing a
//! `VERIFY_`-prefixed placeholder. The audit surfaces those; whether a
//! placeholder is a warning or a rejection is the index builder's policy
//! decision, not this module's.

use crate::config::RegistryConfig;
use serde_json::Value;

fn is_placeholder(sha256: &Value) -> bool {
    sha256
        .as_str()
        .is_some_and(|s| s.starts_with(RegistryConfig::PLACEHOLDER_PREFIX))
}

/// Scan a manifest for placeholder hashes. Returns one warning per match.
pub fn placeholder_warnings(manifest: &Value) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(variants) = manifest.get("variants").and_then(Value::as_array) {
        for variant in variants {
            if let Some(sha256) = variant.get("sha256").filter(|s| is_placeholder(s)) {
                let id = variant.get("id").and_then(Value::as_str).unwrap_or("?");
                warnings.push(format!(
                    "Variant '{}' has placeholder hash: {}",
                    id,
                    sha256.as_str().unwrap_or_default()
                ));
            }
        }
    }

    if let Some(file) = manifest.get("file").filter(|f| !f.is_null()) {
        if let Some(sha256) = file.get("sha256").filter(|s| is_placeholder(s)) {
            warnings.push(format!(
                "File has placeholder hash: {}",
                sha256.as_str().unwrap_or_default()
            ));
        }
    }

    warnings
}

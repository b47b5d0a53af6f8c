//! Hash verification by full download.
//!
//! Streams each referenced artifact through a SHA-256 digest without keeping
//! it on disk, then compares against the manifest's recorded hash. For
//! placeholder hashes the computed value is reported as the replacement.

use crate::config::{NetworkConfig, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::report::default_client;
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// One downloadable artifact referenced by a manifest.
#[derive(Debug, Clone)]
pub struct FileToVerify {
    /// "Variant: fp16" or "File".
    pub label: String,
    pub url: String,
    pub filename: String,
    /// Recorded sha256, possibly a placeholder.
    pub expected: String,
    /// Recorded size in bytes, when present.
    pub size: Option<u64>,
}

impl FileToVerify {
    /// Whether the recorded hash is an unresolved placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.expected.starts_with(RegistryConfig::PLACEHOLDER_PREFIX)
    }
}

/// Outcome of verifying one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Computed hash matches the recorded one.
    Match { computed: String },
    /// Computed hash differs from the recorded one.
    Mismatch { expected: String, computed: String },
    /// The recorded hash was a placeholder; `computed` is its replacement.
    PlaceholderResolved { computed: String },
}

/// List the artifacts a manifest references, optionally filtered to one
/// variant id. Variants take precedence over a single-file record.
pub fn files_to_verify(
    manifest: &Value,
    fallback_name: &str,
    variant_filter: Option<&str>,
) -> Vec<FileToVerify> {
    let mut files = Vec::new();

    let variants = manifest
        .get("variants")
        .and_then(Value::as_array)
        .filter(|v| !v.is_empty());

    if let Some(variants) = variants {
        for variant in variants.iter().filter(|v| v.is_object()) {
            let id = variant.get("id").and_then(Value::as_str).unwrap_or("?");
            if variant_filter.is_some_and(|f| f != id) {
                continue;
            }
            files.push(FileToVerify {
                label: format!("Variant: {}", id),
                url: variant
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                filename: variant
                    .get("file")
                    .and_then(Value::as_str)
                    .unwrap_or(id)
                    .to_string(),
                expected: variant
                    .get("sha256")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                size: variant.get("size").and_then(Value::as_u64),
            });
        }
    } else if let Some(file) = manifest.get("file").filter(|f| f.is_object()) {
        files.push(FileToVerify {
            label: "File".to_string(),
            url: file
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            filename: file
                .get("file")
                .and_then(Value::as_str)
                .unwrap_or(fallback_name)
                .to_string(),
            expected: file
                .get("sha256")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            size: file.get("size").and_then(Value::as_u64),
        });
    }

    files
}

/// Download a URL and compute the SHA-256 of its body as lowercase hex.
pub async fn compute_remote_sha256(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RegistryError::DownloadFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(RegistryError::DownloadFailed {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }

    let mut hasher = Sha256::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| RegistryError::DownloadFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        hasher.update(&chunk);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify one artifact: download, hash, and compare against the record.
pub async fn verify_file(client: &Client, entry: &FileToVerify) -> Result<VerifyOutcome> {
    let computed = compute_remote_sha256(client, &entry.url).await?;

    if entry.is_placeholder() {
        return Ok(VerifyOutcome::PlaceholderResolved { computed });
    }

    let expected = entry.expected.to_lowercase();
    if computed == expected {
        Ok(VerifyOutcome::Match { computed })
    } else {
        Ok(VerifyOutcome::Mismatch { expected, computed })
    }
}

/// Build the HTTP client used for artifact downloads (long timeout).
pub fn download_client() -> Result<Client> {
    default_client(NetworkConfig::DOWNLOAD_TIMEOUT)
}

//! SHA-256 resolution from HuggingFace without downloading.
//!
//! For LFS-backed files HuggingFace exposes the content hash in the
//! `x-linked-etag` header of a HEAD response, so placeholder hashes can be
//! filled in with one metadata request per file instead of a full download.
//! The placeholder rewrite is textual on purpose: manifests are hand-written
//! YAML and a parse/re-serialize cycle would destroy author formatting.

use crate::config::{NetworkConfig, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::report::no_redirect_client;
use reqwest::{Client, Method};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Resolves sha256 hashes from HuggingFace response headers.
pub struct HashResolver {
    client: Client,
}

/// One placeholder processed by [`HashResolver::fill_placeholder_hashes`].
#[derive(Debug, Clone)]
pub struct FetchRecord {
    /// "variant fp16" or "file".
    pub label: String,
    pub url: String,
    /// The resolved hash, when one was obtained.
    pub resolved: Option<String>,
    /// The lookup failure, when the request itself failed.
    pub error: Option<String>,
}

/// Outcome of a placeholder-filling pass over one manifest.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Placeholders found in the document.
    pub found: usize,
    /// Placeholders successfully resolved (and rewritten unless dry-run).
    pub updated: usize,
    pub records: Vec<FetchRecord>,
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

impl HashResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: no_redirect_client(NetworkConfig::REQUEST_TIMEOUT)?,
        })
    }

    /// Resolve the sha256 for a HuggingFace URL via a HEAD request.
    ///
    /// Returns `None` for non-HuggingFace URLs, gated repositories (401/403),
    /// and responses without a usable etag. Redirect responses are inspected
    /// directly: the `x-linked-etag` lives on the 302, not its target.
    pub async fn resolve(&self, url: &str) -> Result<Option<String>> {
        if !url.contains(NetworkConfig::HF_HOST) {
            debug!("Skipping non-HuggingFace URL: {}", url);
            return Ok(None);
        }

        let response = self
            .client
            .request(Method::HEAD, url)
            .send()
            .await
            .map_err(|e| RegistryError::Network {
                message: format!("HEAD request failed for {}: {}", url, e),
                cause: Some(e.to_string()),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!("Gated repository, authentication required ({}): {}", status, url);
            return Ok(None);
        }

        let headers = response.headers();
        let etag = headers
            .get("x-linked-etag")
            .or_else(|| headers.get("etag"))
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());

        Ok(etag)
    }

    /// Fill `VERIFY_` placeholders in one manifest file.
    ///
    /// Looks up each placeholder's URL, rewrites the placeholder text in the
    /// document when a 64-char hex hash comes back, and writes the file back
    /// unless `dry_run` is set. A failed lookup (DNS, timeout) is recorded on
    /// that entry's [`FetchRecord`] and the pass continues; hashes resolved
    /// for the other entries are still written.
    pub async fn fill_placeholder_hashes(&self, path: &Path, dry_run: bool) -> Result<FetchReport> {
        let mut contents =
            std::fs::read_to_string(path).map_err(|e| RegistryError::io_with_path(e, path))?;

        if !contents.contains(RegistryConfig::PLACEHOLDER_PREFIX) {
            return Ok(FetchReport::default());
        }

        let manifest: Value = serde_json::to_value(
            serde_yaml::from_str::<serde_yaml::Value>(&contents).map_err(|e| {
                RegistryError::Yaml {
                    message: format!("Failed to parse {}: {}", path.display(), e),
                    source: Some(e),
                }
            })?,
        )?;

        let entries = placeholder_entries(&manifest);
        let mut report = FetchReport {
            found: entries.len(),
            ..FetchReport::default()
        };

        for (placeholder, url, label) in entries {
            let (resolved, error) = match self.resolve(&url).await {
                Ok(hash) => (hash.filter(|h| is_sha256_hex(h)), None),
                Err(e) => {
                    warn!("Hash lookup failed for {}: {}", url, e);
                    (None, Some(e.to_string()))
                }
            };

            if let Some(ref hash) = resolved {
                contents = contents
                    .replace(&format!("\"{}\"", placeholder), &format!("\"{}\"", hash))
                    .replace(&format!("'{}'", placeholder), &format!("\"{}\"", hash))
                    .replace(
                        &format!("sha256: {}", placeholder),
                        &format!("sha256: \"{}\"", hash),
                    );
                report.updated += 1;
            }

            report.records.push(FetchRecord {
                label,
                url,
                resolved,
                error,
            });

            tokio::time::sleep(NetworkConfig::HF_REQUEST_PAUSE).await;
        }

        if !dry_run && report.updated > 0 {
            std::fs::write(path, contents).map_err(|e| RegistryError::io_with_path(e, path))?;
            debug!("Rewrote {} placeholder(s) in {}", report.updated, path.display());
        }

        Ok(report)
    }
}

/// Collect `(placeholder, url, label)` triples from a manifest document.
/// Variants take precedence over a single-file record, matching the
/// artifact-listing rules used by hash verification.
fn placeholder_entries(manifest: &Value) -> Vec<(String, String, String)> {
    let mut entries = Vec::new();

    let is_placeholder = |v: &Value| {
        v.get("sha256")
            .and_then(Value::as_str)
            .is_some_and(|s| s.starts_with(RegistryConfig::PLACEHOLDER_PREFIX))
    };

    let variants = manifest
        .get("variants")
        .and_then(Value::as_array)
        .filter(|v| !v.is_empty());

    if let Some(variants) = variants {
        for variant in variants.iter().filter(|v| v.is_object()) {
            if is_placeholder(variant) {
                entries.push((
                    variant["sha256"].as_str().unwrap_or_default().to_string(),
                    variant
                        .get("url")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    format!(
                        "variant {}",
                        variant.get("id").and_then(Value::as_str).unwrap_or("?")
                    ),
                ));
            }
        }
    } else if let Some(file) = manifest.get("file").filter(|f| f.is_object()) {
        if is_placeholder(file) {
            entries.push((
                file["sha256"].as_str().unwrap_or_default().to_string(),
                file.get("url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                "file".to_string(),
            ));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(&"ab".repeat(32)));
        assert!(!is_sha256_hex("abc"));
        assert!(!is_sha256_hex(&"zz".repeat(32)));
        // Weak etags and multipart etags must not be mistaken for hashes.
        assert!(!is_sha256_hex("W/\"abc\""));
    }

    #[test]
    fn test_placeholder_entries_variants_only() {
        let manifest = json!({
            "variants": [
                {"id": "fp16", "url": "u1", "sha256": "VERIFY_a"},
                {"id": "fp8", "url": "u2", "sha256": "ab".repeat(32)},
            ],
            "file": {"url": "u3", "sha256": "VERIFY_ignored"},
        });
        let entries = placeholder_entries(&manifest);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "VERIFY_a");
        assert_eq!(entries[0].2, "variant fp16");
    }

    #[test]
    fn test_placeholder_entries_file_fallback() {
        let manifest = json!({
            "file": {"url": "u", "sha256": "VERIFY_f"},
        });
        let entries = placeholder_entries(&manifest);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].2, "file");
    }

    #[tokio::test]
    async fn test_fill_placeholders_survives_unreachable_host() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("m.yaml");
        std::fs::write(
            &path,
            concat!(
                "id: m\n",
                "variants:\n",
                "  - id: a\n",
                "    url: https://huggingface.co.invalid/org/repo/resolve/main/a.bin\n",
                "    sha256: VERIFY_a\n",
                "  - id: b\n",
                "    url: https://example.com/b.bin\n",
                "    sha256: VERIFY_b\n",
            ),
        )
        .unwrap();

        let resolver = HashResolver::new().unwrap();
        // The first URL cannot resolve; the pass must still record both
        // entries instead of bailing out on the request error.
        let report = resolver.fill_placeholder_hashes(&path, true).await.unwrap();
        assert_eq!(report.found, 2);
        assert_eq!(report.updated, 0);
        assert_eq!(report.records.len(), 2);
        assert!(report.records[0].error.is_some());
        assert!(report.records[0].resolved.is_none());
        // Non-HuggingFace URLs are skipped, not failed.
        assert!(report.records[1].error.is_none());
        assert!(report.records[1].resolved.is_none());
    }
}

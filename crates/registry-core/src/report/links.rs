//! Link-rot checking for manifest download and homepage URLs.
//!
//! HEAD each URL (falling back to GET where HEAD is refused) and report any
//! that are unreachable. 2xx and 3xx both count as alive: many hosts serve
//! large artifacts from behind redirects.

use crate::config::{NetworkConfig, PathsConfig};
use crate::error::Result;
use crate::manifest::{load_manifest, manifest_stem};
use crate::report::default_client;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

/// What a URL is used for in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    Homepage,
    Download,
}

impl UrlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlKind::Homepage => "homepage",
            UrlKind::Download => "download",
        }
    }
}

/// One URL extracted from a manifest, labeled by owner.
#[derive(Debug, Clone, Serialize)]
pub struct UrlEntry {
    /// Manifest id, or `id:variant` for variant downloads.
    pub manifest: String,
    pub url: String,
    pub kind: UrlKind,
}

/// A URL that failed the liveness check.
#[derive(Debug, Clone, Serialize)]
pub struct BrokenLink {
    pub manifest: String,
    pub url: String,
    pub kind: UrlKind,
    /// HTTP status, or 0 for transport-level failures.
    pub status: u16,
    pub reason: String,
}

/// Aggregated link-rot report, serializable to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub total: usize,
    pub ok: usize,
    pub broken: Vec<BrokenLink>,
}

/// Extract homepage and download URLs from one manifest document.
pub fn collect_urls(manifest: &Value, fallback_id: &str) -> Vec<UrlEntry> {
    let mut urls = Vec::new();
    let manifest_id = manifest
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or(fallback_id);

    if let Some(homepage) = manifest.get("homepage").and_then(Value::as_str) {
        urls.push(UrlEntry {
            manifest: manifest_id.to_string(),
            url: homepage.to_string(),
            kind: UrlKind::Homepage,
        });
    }

    if let Some(file) = manifest.get("file").filter(|f| f.is_object()) {
        if let Some(url) = file.get("url").and_then(Value::as_str) {
            urls.push(UrlEntry {
                manifest: manifest_id.to_string(),
                url: url.to_string(),
                kind: UrlKind::Download,
            });
        }
    }

    if let Some(variants) = manifest.get("variants").and_then(Value::as_array) {
        for variant in variants.iter().filter(|v| v.is_object()) {
            // Legacy manifests nested the URL under a variant file record.
            let url = variant
                .get("url")
                .and_then(Value::as_str)
                .or_else(|| {
                    variant
                        .get("file")
                        .filter(|f| f.is_object())
                        .and_then(|f| f.get("url"))
                        .and_then(Value::as_str)
                });
            if let Some(url) = url {
                let vid = variant.get("id").and_then(Value::as_str).unwrap_or("?");
                urls.push(UrlEntry {
                    manifest: format!("{}:{}", manifest_id, vid),
                    url: url.to_string(),
                    kind: UrlKind::Download,
                });
            }
        }
    }

    urls
}

/// Collect every URL from every manifest under `<corpus_root>/manifests/`,
/// in lexicographic file order.
pub fn collect_corpus_urls(corpus_root: &Path) -> Result<Vec<UrlEntry>> {
    let manifests_dir = corpus_root.join(PathsConfig::MANIFESTS_DIR_NAME);
    if !manifests_dir.is_dir() {
        return Err(crate::error::RegistryError::CorpusNotFound(manifests_dir));
    }
    let mut all_urls = Vec::new();

    for entry in WalkDir::new(&manifests_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_manifest = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == PathsConfig::MANIFEST_EXTENSION);
        if !is_manifest {
            continue;
        }
        let manifest = load_manifest(path)?;
        all_urls.extend(collect_urls(&manifest, &manifest_stem(path)));
    }

    Ok(all_urls)
}

/// HEAD a URL and return `(status, reason)`.
///
/// Transport failures map to status 0 with a reason string so the caller can
/// treat them uniformly with HTTP failures. Never returns an error.
pub async fn check_url(client: &Client, url: &str) -> (u16, String) {
    let head = client.request(Method::HEAD, url).send().await;

    let response = match head {
        // Some servers refuse HEAD outright; retry as GET and drop the body.
        Ok(resp) if resp.status() == StatusCode::METHOD_NOT_ALLOWED => {
            match client.get(url).send().await {
                Ok(resp) => resp,
                Err(e) => return transport_failure(e),
            }
        }
        Ok(resp) => resp,
        Err(e) => return transport_failure(e),
    };

    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("").to_string();
    (status.as_u16(), reason)
}

fn transport_failure(err: reqwest::Error) -> (u16, String) {
    if err.is_timeout() {
        (0, "timeout".to_string())
    } else if err.is_connect() {
        (0, format!("connection error: {}", err))
    } else {
        (0, err.to_string())
    }
}

/// Whether a status from [`check_url`] counts as alive.
pub fn is_ok_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Check every URL in the corpus and build a [`LinkReport`].
///
/// `progress` is called once per URL with the probe outcome, in corpus
/// order, so callers can stream per-URL output.
pub async fn check_links<F>(corpus_root: &Path, mut progress: F) -> Result<LinkReport>
where
    F: FnMut(&UrlEntry, u16, &str),
{
    let client = default_client(NetworkConfig::REQUEST_TIMEOUT)?;
    let entries = collect_corpus_urls(corpus_root)?;

    let mut ok = 0;
    let mut broken = Vec::new();
    for entry in &entries {
        let (status, reason) = check_url(&client, &entry.url).await;
        progress(entry, status, &reason);
        if is_ok_status(status) {
            ok += 1;
        } else {
            broken.push(BrokenLink {
                manifest: entry.manifest.clone(),
                url: entry.url.clone(),
                kind: entry.kind,
                status,
                reason,
            });
        }
    }

    Ok(LinkReport {
        total: entries.len(),
        ok,
        broken,
    })
}

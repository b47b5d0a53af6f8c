//! Index aggregation: walk the manifest corpus, validate, and emit the
//! consolidated `index.json`.
//!
//! The walk is deterministic (lexicographic groupings, lexicographic files)
//! and all-or-nothing: every document is processed so a single run surfaces
//! every problem, but one fatal diagnostic anywhere suppresses the index.
//! Diagnostics are threaded through the returned report rather than held in
//! ambient state, so validation stays independently testable.

use crate::config::{PathsConfig, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::index::normalize::coerce_float_literals;
use crate::manifest::{
    grouping_type, load_manifest, manifest_stem, placeholder_warnings, validate_manifest,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How serious a diagnostic is for the run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal for the run: no index is published.
    Error,
    /// Surfaced for visibility only.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("ERROR"),
            Severity::Warning => f.write_str("WARNING"),
        }
    }
}

/// One problem found during a build run, in discovery order.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The manifest file (or grouping directory) the problem belongs to.
    pub source: PathBuf,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn error(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity,
            self.source.display(),
            self.message
        )
    }
}

/// Build policy knobs.
///
/// `strict` escalates placeholder-hash warnings into rejections. Callers
/// decide where that signal comes from (a CLI flag, a CI environment marker);
/// the builder itself never sniffs the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub strict: bool,
}

/// The consolidated index document. Field order is the serialized key order.
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub version: u32,
    pub generated_at: String,
    pub total_count: usize,
    pub type_counts: BTreeMap<String, usize>,
    pub cloud_available_count: usize,
    pub schema_url: String,
    pub items: Vec<Value>,
}

/// Outcome of a build run: the index (when every document passed) plus the
/// full diagnostic list in discovery order.
#[derive(Debug)]
pub struct BuildReport {
    pub index: Option<Index>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// True when no fatal diagnostic was recorded and an index was produced.
    pub fn is_success(&self) -> bool {
        self.index.is_some()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Python-style truthiness for the optional `cloud_available` field.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// List the grouping directories under `manifests/`, lexicographically.
fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| RegistryError::io_with_path(e, dir))? {
        let entry = entry.map_err(|e| RegistryError::io_with_path(e, dir))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// List the manifest files in a grouping, lexicographically by storage key.
fn sorted_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| RegistryError::io_with_path(e, dir))? {
        let entry = entry.map_err(|e| RegistryError::io_with_path(e, dir))?;
        let path = entry.path();
        let is_manifest = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == PathsConfig::MANIFEST_EXTENSION);
        if is_manifest {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Build the index from every manifest under `<corpus_root>/manifests/`.
///
/// Per-document problems become diagnostics and never abort the walk; the
/// run-level verdict is decided only after all documents are processed. On
/// any fatal diagnostic the report carries no index.
pub fn build_index(corpus_root: &Path, options: &BuildOptions) -> Result<BuildReport> {
    let manifests_dir = corpus_root.join(PathsConfig::MANIFESTS_DIR_NAME);
    if !manifests_dir.is_dir() {
        return Err(RegistryError::CorpusNotFound(manifests_dir));
    }

    let mut diagnostics = Vec::new();
    let mut items: Vec<Value> = Vec::new();

    for grouping_dir in sorted_subdirs(&manifests_dir)? {
        let dir_name = grouping_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let Some(expected_type) = grouping_type(&dir_name) else {
            diagnostics.push(Diagnostic::warning(
                &grouping_dir,
                format!("Unknown directory: {}", dir_name),
            ));
            continue;
        };

        for manifest_path in sorted_manifests(&grouping_dir)? {
            debug!("Processing {}", manifest_path.display());
            let declared_id = manifest_stem(&manifest_path);

            let manifest = match load_manifest(&manifest_path) {
                Ok(m) => m,
                Err(e) => {
                    diagnostics.push(Diagnostic::error(&manifest_path, e.to_string()));
                    continue;
                }
            };

            let errors = validate_manifest(&manifest, &declared_id);
            if !errors.is_empty() {
                for error in errors {
                    diagnostics.push(Diagnostic::error(&manifest_path, error));
                }
                continue;
            }

            // Schema passed, so `type` is a known enum value; it must still
            // agree with the grouping the manifest was discovered under.
            let declared_type = manifest["type"].as_str().unwrap_or_default();
            if declared_type != expected_type.as_str() {
                diagnostics.push(Diagnostic::error(
                    &manifest_path,
                    format!(
                        "Type '{}' doesn't match directory '{}' (expected '{}')",
                        declared_type,
                        dir_name,
                        expected_type.as_str()
                    ),
                ));
                continue;
            }

            let hash_warnings = placeholder_warnings(&manifest);
            for warning in &hash_warnings {
                diagnostics.push(Diagnostic::warning(&manifest_path, warning.clone()));
            }
            if options.strict && !hash_warnings.is_empty() {
                diagnostics.push(Diagnostic::error(
                    &manifest_path,
                    "Placeholder hashes not allowed in strict mode. Run verify-hashes first.",
                ));
                continue;
            }

            items.push(manifest);
        }
    }

    let fatal = diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error);
    if fatal {
        return Ok(BuildReport {
            index: None,
            diagnostics,
        });
    }

    // Deterministic output: sort accepted items by id regardless of
    // discovery or validation order.
    items.sort_by(|a, b| {
        a["id"]
            .as_str()
            .unwrap_or_default()
            .cmp(b["id"].as_str().unwrap_or_default())
    });

    for item in &mut items {
        coerce_float_literals(item);
    }

    let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut cloud_available_count = 0;
    for item in &items {
        let type_name = item["type"].as_str().unwrap_or("unknown").to_string();
        *type_counts.entry(type_name).or_insert(0) += 1;
        if item.get("cloud_available").is_some_and(is_truthy) {
            cloud_available_count += 1;
        }
    }

    let index = Index {
        version: RegistryConfig::INDEX_VERSION,
        generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        total_count: items.len(),
        type_counts,
        cloud_available_count,
        schema_url: RegistryConfig::SCHEMA_URL.to_string(),
        items,
    };

    info!(
        "Built index with {} items ({} warnings)",
        index.total_count,
        diagnostics.len()
    );

    Ok(BuildReport {
        index: Some(index),
        diagnostics,
    })
}

/// Serialize the index to `path` atomically (temp file, then rename).
///
/// Output uses a 2-space indent and preserves non-ASCII characters literally
/// so the file diffs cleanly between runs.
pub fn write_index(index: &Index, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| RegistryError::io_with_path(e, parent))?;
        }
    }

    let serialized = serde_json::to_string_pretty(index).map_err(|e| RegistryError::Json {
        message: format!("Failed to serialize index: {}", e),
        source: Some(e),
    })?;

    let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
    fs::write(&temp_path, serialized.as_bytes())
        .map_err(|e| RegistryError::io_with_path(e, &temp_path))?;
    fs::rename(&temp_path, path).map_err(|e| RegistryError::io_with_path(e, path))?;

    debug!("Wrote index to {}", path.display());
    Ok(())
}

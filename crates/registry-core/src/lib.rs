//! Headless library for the mods.sh model registry.
//!
//! The registry is a corpus of hand-written YAML manifests, one per model
//! artifact, grouped by type under `manifests/`. This crate validates those
//! manifests against the registry schema and aggregates the valid ones into
//! the consolidated `index.json` consumed by downstream tooling, plus the
//! maintenance reports (link liveness, hash verification) that keep the
//! corpus honest.
//!
//! # Example
//!
//! ```rust,ignore
//! use mods_registry::{build_index, write_index, BuildOptions};
//!
//! let report = build_index(std::path::Path::new("."), &BuildOptions::default())?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! if let Some(index) = &report.index {
//!     write_index(index, std::path::Path::new("index.json"))?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod manifest;
pub mod report;

// Re-export commonly used types
pub use config::{NetworkConfig, PathsConfig, RegistryConfig};
pub use error::{RegistryError, Result};
pub use index::{
    build_index, coerce_float_literals, write_index, BuildOptions, BuildReport, Diagnostic, Index,
    Severity,
};
pub use manifest::{
    grouping_type, load_manifest, manifest_stem, placeholder_warnings, validate_manifest,
    Category, ModelType,
};
pub use report::{HashResolver, LinkReport};

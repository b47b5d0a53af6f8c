//! Manifest model: vocabulary, loading, schema rules, integrity audit.

pub mod integrity;
pub mod loader;
pub mod schema;
pub mod types;

pub use integrity::placeholder_warnings;
pub use loader::{load_manifest, manifest_stem};
pub use schema::validate_manifest;
pub use types::{grouping_type, Category, ModelType};

//! Centralized configuration for the mods registry.
//!
//! Constants for the index schema, integrity sentinels, network operations,
//! and well-known paths inside a registry checkout.

use std::time::Duration;

/// Registry-level configuration.
pub struct RegistryConfig;

impl RegistryConfig {
    /// Index document schema version.
    pub const INDEX_VERSION: u32 = 2;
    /// Published JSON schema for manifest documents.
    pub const SCHEMA_URL: &'static str =
        "https://registry.mods.sh/schemas/manifest.schema.json";
    /// Sentinel prefix marking a sha256 that has not been verified yet.
    pub const PLACEHOLDER_PREFIX: &'static str = "VERIFY_";
    pub const USER_AGENT: &'static str = "mods-registry/1.0";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
    /// Pause between HuggingFace metadata requests.
    pub const HF_REQUEST_PAUSE: Duration = Duration::from_millis(200);
    pub const HF_HOST: &'static str = "huggingface.co";
}

/// Shared directory and path configurations.
pub struct PathsConfig;

impl PathsConfig {
    pub const MANIFESTS_DIR_NAME: &'static str = "manifests";
    pub const INDEX_FILENAME: &'static str = "index.json";
    pub const MANIFEST_EXTENSION: &'static str = "yaml";
}

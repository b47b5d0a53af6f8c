//! Reporting and maintenance utilities layered on the manifest corpus.
//!
//! Everything here is network-bound tooling for registry maintainers: link
//! liveness, hash verification, placeholder resolution. None of it feeds the
//! index builder's accept/reject decision.

pub mod hf;
pub mod links;
pub mod verify;

pub use hf::{FetchRecord, FetchReport, HashResolver};
pub use links::{
    check_links, check_url, collect_corpus_urls, collect_urls, is_ok_status, BrokenLink,
    LinkReport, UrlEntry, UrlKind,
};
pub use verify::{
    compute_remote_sha256, download_client, files_to_verify, verify_file, FileToVerify,
    VerifyOutcome,
};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use reqwest::Client;
use std::time::Duration;

/// Build the shared HTTP client for report utilities.
pub(crate) fn default_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(RegistryConfig::USER_AGENT)
        .build()
        .map_err(|e| RegistryError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            cause: Some(e.to_string()),
        })
}

/// Client that reports redirect responses instead of following them.
///
/// HuggingFace serves LFS metadata headers on the redirect response itself.
pub(crate) fn no_redirect_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(RegistryConfig::USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| RegistryError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            cause: Some(e.to_string()),
        })
}

//! `verify-hashes` / `fetch-hashes`: integrity maintenance for manifests.

use mods_registry::report::{self, HashResolver, VerifyOutcome};
use mods_registry::{load_manifest, manifest_stem};
use std::path::{Path, PathBuf};

const GIB: f64 = (1024u64 * 1024 * 1024) as f64;

/// Download a manifest's files and verify their SHA256 hashes.
pub async fn verify(manifest_path: &Path, variant_filter: Option<&str>) -> anyhow::Result<i32> {
    let manifest = load_manifest(manifest_path)?;
    let stem = manifest_stem(manifest_path);

    let name = manifest["name"].as_str().unwrap_or(&stem);
    let id = manifest["id"].as_str().unwrap_or(&stem);
    println!("\nVerifying: {} ({})", name, id);
    if let Some(model_type) = manifest["type"].as_str() {
        println!("Type: {}", model_type);
    }

    let files = report::files_to_verify(&manifest, &stem, variant_filter);
    if files.is_empty() {
        println!("  No files to verify.");
        return Ok(0);
    }

    let client = report::download_client()?;
    let mut failures = 0;

    for entry in &files {
        println!("\n  [{}]", entry.label);
        if let Some(size) = entry.size {
            println!("  Size: {:.2} GB", size as f64 / GIB);
        }
        if entry.is_placeholder() {
            println!("  Expected hash: PLACEHOLDER ({})", entry.expected);
        } else {
            println!("  Expected hash: {}", entry.expected);
        }

        println!("  Downloading: {}", entry.filename);
        println!("  URL: {}", entry.url);

        match report::verify_file(&client, entry).await {
            Ok(VerifyOutcome::Match { computed }) => {
                println!("  Computed hash: {}", computed);
                println!("  Hash matches!");
            }
            Ok(VerifyOutcome::PlaceholderResolved { computed }) => {
                println!("  Computed hash: {}", computed);
                println!("  -> Replace placeholder with: {}", computed);
            }
            Ok(VerifyOutcome::Mismatch { expected, computed }) => {
                println!("  HASH MISMATCH!");
                println!("    Expected: {}", expected);
                println!("    Got:      {}", computed);
                failures += 1;
            }
            Err(e) => {
                println!("  ERROR: Download failed: {}", e);
                failures += 1;
            }
        }
    }

    Ok(if failures == 0 { 0 } else { 1 })
}

/// Resolve VERIFY_ placeholders from HuggingFace metadata headers.
pub async fn fetch(root: &Path, files: &[PathBuf], dry_run: bool) -> anyhow::Result<i32> {
    let files = if files.is_empty() {
        super::find_all_manifests(root)?
    } else {
        files.to_vec()
    };

    let mode = if dry_run { "DRY RUN" } else { "UPDATING" };
    println!("=== Fetching SHA256 hashes from HuggingFace ({}) ===", mode);

    let resolver = HashResolver::new()?;
    let mut total_found = 0;
    let mut total_updated = 0;

    for path in &files {
        // A bad file or URL must not stop the rest of the batch.
        let fetch_report = match resolver.fill_placeholder_hashes(path, dry_run).await {
            Ok(report) => report,
            Err(e) => {
                println!("\n  {} - ERROR: {}", path.display(), e);
                continue;
            }
        };
        if fetch_report.found == 0 {
            continue;
        }

        println!(
            "\n  {} - {} placeholder(s)",
            path.display(),
            fetch_report.found
        );
        for record in &fetch_report.records {
            match (&record.resolved, &record.error) {
                (Some(hash), _) => println!("    [{}] OK: {}", record.label, hash),
                (None, Some(err)) => println!("    [{}] FAILED: {}", record.label, err),
                (None, None) => {
                    println!("    [{}] FAILED: could not resolve hash", record.label)
                }
            }
        }

        total_found += fetch_report.found;
        total_updated += fetch_report.updated;
    }

    println!(
        "\n=== Done: {}/{} hashes resolved ===",
        total_updated, total_found
    );
    if dry_run && total_found > 0 {
        println!("Run without --dry-run to apply changes.");
    }

    Ok(0)
}

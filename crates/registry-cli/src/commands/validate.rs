//! `validate`: check manifests against the schema without building an index.

use mods_registry::{load_manifest, manifest_stem, placeholder_warnings, validate_manifest};
use std::path::{Path, PathBuf};

pub fn run(root: &Path, files: &[PathBuf]) -> anyhow::Result<i32> {
    let files = if files.is_empty() {
        super::find_all_manifests(root)?
    } else {
        files.to_vec()
    };

    if files.is_empty() {
        println!("No manifest files found.");
        return Ok(1);
    }

    println!("Validating {} manifest(s)...\n", files.len());

    let mut all_valid = true;
    for path in &files {
        println!("Validating: {}", path.display());

        let manifest = match load_manifest(path) {
            Ok(m) => m,
            Err(e) => {
                println!("  ERROR: {}", e);
                all_valid = false;
                continue;
            }
        };

        let errors = validate_manifest(&manifest, &manifest_stem(path));
        let warnings = placeholder_warnings(&manifest);

        if !errors.is_empty() {
            for error in &errors {
                println!("  ERROR: {}", error);
            }
            all_valid = false;
        } else if !warnings.is_empty() {
            for warning in &warnings {
                println!("  WARNING: {}", warning);
            }
            println!("  OK (with warnings)");
        } else {
            println!("  OK");
        }
    }

    println!(
        "\n{}",
        if all_valid {
            "All manifests valid!"
        } else {
            "Some manifests have errors."
        }
    );
    Ok(if all_valid { 0 } else { 1 })
}

//! `build`: aggregate the corpus into index.json.

use mods_registry::{build_index, write_index, BuildOptions, PathsConfig};
use std::path::Path;

pub fn run(root: &Path, output: Option<&Path>, strict: bool) -> anyhow::Result<i32> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(PathsConfig::INDEX_FILENAME));

    println!(
        "Building index from {}/",
        root.join(PathsConfig::MANIFESTS_DIR_NAME).display()
    );

    let report = build_index(root, &BuildOptions { strict })?;

    for diagnostic in &report.diagnostics {
        println!("  {}", diagnostic);
    }

    let Some(index) = &report.index else {
        println!("\nERROR: Validation failed. Fix errors above before building index.");
        return Ok(1);
    };

    write_index(index, &output)?;
    println!(
        "\nBuilt index with {} items -> {}",
        index.total_count,
        output.display()
    );
    if report.warning_count() > 0 {
        println!("WARNING: Some hashes are placeholders. Run verify-hashes to compute them.");
    }

    Ok(0)
}

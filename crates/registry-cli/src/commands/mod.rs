//! Subcommand implementations.
//!
//! Each module maps one CLI subcommand onto the core library and turns its
//! outcome into user-facing stdout lines plus an exit code.

pub mod build;
pub mod hashes;
pub mod links;
pub mod validate;

use mods_registry::PathsConfig;
use std::path::{Path, PathBuf};

/// Enumerate every manifest file in the corpus, grouped lexicographically.
///
/// Only files inside recognized grouping directories are returned, matching
/// the index builder's walk.
pub(crate) fn find_all_manifests(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let manifests_dir = root.join(PathsConfig::MANIFESTS_DIR_NAME);
    if !manifests_dir.is_dir() {
        anyhow::bail!("Manifests directory not found: {}", manifests_dir.display());
    }

    let mut groupings: Vec<PathBuf> = std::fs::read_dir(&manifests_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| mods_registry::grouping_type(n).is_some())
        })
        .collect();
    groupings.sort();

    let mut files = Vec::new();
    for grouping in groupings {
        let mut in_group: Vec<PathBuf> = std::fs::read_dir(&grouping)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .is_some_and(|ext| ext == PathsConfig::MANIFEST_EXTENSION)
            })
            .collect();
        in_group.sort();
        files.extend(in_group);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_all_manifests_skips_unknown_groupings() {
        let temp_dir = TempDir::new().unwrap();
        let manifests = temp_dir.path().join("manifests");
        std::fs::create_dir_all(manifests.join("vae")).unwrap();
        std::fs::create_dir_all(manifests.join("checkpoints")).unwrap();
        std::fs::create_dir_all(manifests.join("textures")).unwrap();
        std::fs::write(manifests.join("vae/b.yaml"), "id: b\n").unwrap();
        std::fs::write(manifests.join("checkpoints/a.yaml"), "id: a\n").unwrap();
        std::fs::write(manifests.join("checkpoints/notes.txt"), "skip\n").unwrap();
        std::fs::write(manifests.join("textures/t.yaml"), "id: t\n").unwrap();

        let files = find_all_manifests(temp_dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yaml"]);
    }

    #[test]
    fn test_find_all_manifests_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_all_manifests(temp_dir.path()).is_err());
    }
}

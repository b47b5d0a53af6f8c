//! Integration tests for corpus aggregation.
//!
//! These build real manifest corpora in a temp directory and check the
//! published-index guarantees: deterministic ordering, count identities,
//! all-or-nothing publication, and the strict-mode policy flip.

use mods_registry::{build_index, write_index, BuildOptions, RegistryConfig, Severity};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_manifest(root: &Path, grouping: &str, filename: &str, contents: &str) {
    let dir = root.join("manifests").join(grouping);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(filename), contents).unwrap();
}

/// A small healthy corpus: two checkpoints, a vae, and a recipe.
fn create_valid_corpus() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    write_manifest(
        root,
        "checkpoints",
        "flux-dev.yaml",
        concat!(
            "id: flux-dev\n",
            "name: Flux Dev\n",
            "type: checkpoint\n",
            "cloud_available: true\n",
            "variants:\n",
            "  - id: fp16\n",
            "    file: flux-dev-fp16.safetensors\n",
            "    url: https://example.com/flux-dev-fp16.safetensors\n",
            "    sha256: 1111111111111111111111111111111111111111111111111111111111111111\n",
            "    size: 23802932552\n",
            "  - id: fp8\n",
            "    file: flux-dev-fp8.safetensors\n",
            "    url: https://example.com/flux-dev-fp8.safetensors\n",
            "    sha256: 2222222222222222222222222222222222222222222222222222222222222222\n",
            "    size: 11901466276\n",
        ),
    );
    write_manifest(
        root,
        "checkpoints",
        "aurora.yaml",
        concat!(
            "id: aurora\n",
            "name: Aurora — photoréaliste\n",
            "type: checkpoint\n",
            "category: style\n",
            "file:\n",
            "  url: https://example.com/aurora.safetensors\n",
            "  sha256: 3333333333333333333333333333333333333333333333333333333333333333\n",
            "  size: 6938040682\n",
        ),
    );
    write_manifest(
        root,
        "vae",
        "flux-vae.yaml",
        concat!(
            "id: flux-vae\n",
            "name: Flux VAE\n",
            "type: vae\n",
            "cloud_available: true\n",
            "file:\n",
            "  url: https://example.com/flux-vae.safetensors\n",
            "  sha256: 4444444444444444444444444444444444444444444444444444444444444444\n",
            "  size: 334641162\n",
        ),
    );
    write_manifest(
        root,
        "recipes",
        "flux-turbo-mix.yaml",
        concat!(
            "id: flux-turbo-mix\n",
            "name: Flux Turbo Mix\n",
            "type: recipe\n",
            "recipe:\n",
            "  base_model: flux-dev\n",
            "  lora_strength: \"1e-1\"\n",
        ),
    );

    temp_dir
}

#[test]
fn test_valid_corpus_builds() {
    let corpus = create_valid_corpus();
    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();

    assert!(report.is_success());
    assert_eq!(report.error_count(), 0);

    let index = report.index.unwrap();
    assert_eq!(index.version, 2);
    assert_eq!(index.schema_url, RegistryConfig::SCHEMA_URL);
    assert_eq!(index.total_count, 4);
    assert_eq!(index.items.len(), 4);
}

#[test]
fn test_items_sorted_by_id_without_duplicates() {
    let corpus = create_valid_corpus();
    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();
    let index = report.index.unwrap();

    let ids: Vec<&str> = index
        .items
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["aurora", "flux-dev", "flux-turbo-mix", "flux-vae"]);

    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(deduped, ids);
}

#[test]
fn test_count_identities() {
    let corpus = create_valid_corpus();
    let index = build_index(corpus.path(), &BuildOptions::default())
        .unwrap()
        .index
        .unwrap();

    let type_sum: usize = index.type_counts.values().sum();
    assert_eq!(type_sum, index.total_count);
    assert_eq!(index.total_count, index.items.len());

    assert_eq!(index.type_counts["checkpoint"], 2);
    assert_eq!(index.type_counts["vae"], 1);
    assert_eq!(index.type_counts["recipe"], 1);
    assert_eq!(index.cloud_available_count, 2);
}

#[test]
fn test_generated_at_format() {
    let corpus = create_valid_corpus();
    let index = build_index(corpus.path(), &BuildOptions::default())
        .unwrap()
        .index
        .unwrap();

    // YYYY-MM-DDThh:mm:ssZ, second precision
    let ts = &index.generated_at;
    assert_eq!(ts.len(), 20);
    assert!(ts.ends_with('Z'));
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], "T");
    assert!(chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%SZ").is_ok());
}

#[test]
fn test_scientific_notation_coerced_in_items() {
    let corpus = create_valid_corpus();
    let index = build_index(corpus.path(), &BuildOptions::default())
        .unwrap()
        .index
        .unwrap();

    let recipe = index
        .items
        .iter()
        .find(|item| item["id"] == "flux-turbo-mix")
        .unwrap();
    assert_eq!(recipe["recipe"]["lora_strength"], serde_json::json!(0.1));
}

#[test]
fn test_rerun_identical_except_generated_at() {
    let corpus = create_valid_corpus();
    let first = build_index(corpus.path(), &BuildOptions::default())
        .unwrap()
        .index
        .unwrap();
    let second = build_index(corpus.path(), &BuildOptions::default())
        .unwrap()
        .index
        .unwrap();

    let mut a = serde_json::to_value(&first).unwrap();
    let mut b = serde_json::to_value(&second).unwrap();
    a["generated_at"] = serde_json::Value::Null;
    b["generated_at"] = serde_json::Value::Null;
    assert_eq!(a, b);
}

#[test]
fn test_one_broken_manifest_suppresses_index() {
    let corpus = create_valid_corpus();
    // Stored as bad-id.yaml but declares id: other, a structural error.
    write_manifest(
        corpus.path(),
        "loras",
        "bad-id.yaml",
        concat!(
            "id: other\n",
            "name: Bad\n",
            "type: lora\n",
            "file:\n",
            "  url: https://example.com/x.safetensors\n",
            "  sha256: 5555555555555555555555555555555555555555555555555555555555555555\n",
            "  size: 1\n",
        ),
    );

    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();
    assert!(!report.is_success());
    assert!(report.index.is_none());
    assert_eq!(report.error_count(), 1);
    assert!(report.diagnostics.iter().any(|d| {
        d.severity == Severity::Error && d.message == "ID 'other' does not match filename 'bad-id'"
    }));
}

#[test]
fn test_parse_failure_is_fatal_but_walk_continues() {
    let corpus = create_valid_corpus();
    write_manifest(corpus.path(), "checkpoints", "broken.yaml", "id: [unclosed\n");
    write_manifest(corpus.path(), "loras", "empty.yaml", "");

    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();
    assert!(!report.is_success());
    // Both problem files surfaced in one pass.
    assert_eq!(report.error_count(), 2);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Empty manifest")));
}

#[test]
fn test_recipe_missing_base_model() {
    let corpus = TempDir::new().unwrap();
    write_manifest(
        corpus.path(),
        "recipes",
        "mix.yaml",
        "id: mix\nname: Mix\ntype: recipe\nrecipe:\n  checkpoint: flux-dev\n",
    );

    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.error_count(), 1);
    assert_eq!(
        report.diagnostics[0].message,
        "Recipe 'recipe' section must have 'base_model'"
    );
}

#[test]
fn test_string_size_rejected() {
    let corpus = TempDir::new().unwrap();
    write_manifest(
        corpus.path(),
        "checkpoints",
        "m.yaml",
        concat!(
            "id: m\n",
            "name: M\n",
            "type: checkpoint\n",
            "variants:\n",
            "  - id: a\n",
            "    file: a.bin\n",
            "    url: https://example.com/a.bin\n",
            "    sha256: abc\n",
            "    size: \"1000\"\n",
        ),
    );

    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.error_count(), 1);
    assert_eq!(
        report.diagnostics[0].message,
        "Variant 0 'size' must be an integer (bytes)"
    );
}

#[test]
fn test_placeholder_hash_warns_by_default_rejects_in_strict() {
    let corpus = TempDir::new().unwrap();
    write_manifest(
        corpus.path(),
        "checkpoints",
        "pending.yaml",
        concat!(
            "id: pending\n",
            "name: Pending\n",
            "type: checkpoint\n",
            "file:\n",
            "  url: https://x/y.safetensors\n",
            "  sha256: VERIFY_abc\n",
            "  size: 100\n",
        ),
    );

    // Default mode: accepted with one warning.
    let report = build_index(corpus.path(), &BuildOptions::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.warning_count(), 1);
    assert!(report.diagnostics[0]
        .message
        .contains("File has placeholder hash: VERIFY_abc"));
    assert_eq!(report.index.unwrap().total_count, 1);

    // Strict mode: same corpus is rejected.
    let strict = build_index(corpus.path(), &BuildOptions { strict: true }).unwrap();
    assert!(!strict.is_success());
    assert!(strict.index.is_none());
    assert_eq!(strict.error_count(), 1);
    assert_eq!(strict.warning_count(), 1);
}

#[test]
fn test_index_json_round_trips_with_unicode() {
    let corpus = create_valid_corpus();
    let index = build_index(corpus.path(), &BuildOptions::default())
        .unwrap()
        .index
        .unwrap();

    let out = corpus.path().join("index.json");
    write_index(&index, &out).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("Aurora — photoréaliste"));

    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["version"], 2);
    assert_eq!(parsed["total_count"], 4);
    assert_eq!(parsed["items"][0]["id"], "aurora");
}

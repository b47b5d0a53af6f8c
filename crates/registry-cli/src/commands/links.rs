//! `check-links`: probe every manifest URL for link rot.

use mods_registry::report;
use std::path::Path;

pub async fn run(root: &Path, output: Option<&Path>) -> anyhow::Result<i32> {
    println!("Checking manifest URLs...");

    let link_report = report::check_links(root, |entry, status, reason| {
        let label = format!("[{}] {}", entry.kind.as_str(), entry.manifest);
        if report::is_ok_status(status) {
            println!("  ok {}", label);
        } else {
            println!("  BROKEN {} -> {} {}", label, status, reason);
        }
    })
    .await?;

    println!(
        "\nResults: {} OK, {} broken ({} checked)",
        link_report.ok,
        link_report.broken.len(),
        link_report.total
    );

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&link_report)?)?;
        println!("Report written to {}", path.display());
    }

    Ok(if link_report.broken.is_empty() { 0 } else { 1 })
}

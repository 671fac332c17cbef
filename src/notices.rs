use crate::license::LicenseCopy;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;

/// Write the consolidated attribution document. The only failure mode is
/// the underlying I/O error, which is propagated.
pub fn write_third_party_notices(
    path: &Path,
    results: &[LicenseCopy],
    warnings: &[String],
    licenses_dir_label: &str,
) -> Result<()> {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let document = render_notices(results, warnings, licenses_dir_label, &timestamp);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, document)
        .with_context(|| format!("Failed to write notices file {}", path.display()))
}

pub fn render_notices(
    results: &[LicenseCopy],
    warnings: &[String],
    licenses_dir_label: &str,
    timestamp: &str,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("THIRD PARTY NOTICES".to_string());
    lines.push(String::new());
    lines.push(format!("Generated: {}", timestamp));
    lines.push(format!("Output license directory: {}", licenses_dir_label));
    lines.push(String::new());
    lines.push("This product bundles third-party software components.".to_string());
    lines.push(
        "The following notices are provided for attribution and license compliance.".to_string(),
    );
    lines.push(String::new());

    let mut sorted: Vec<&LicenseCopy> = results.iter().collect();
    sorted.sort_by_key(|r| r.name.to_lowercase());

    for result in sorted {
        lines.push(format!("- {} {}", result.name, result.version));
        lines.push(format!("  Declared/Detected License: {}", result.license));
        if result.copied_files.is_empty() {
            lines.push("  Included license files: (NOT FOUND)".to_string());
        } else {
            lines.push("  Included license files:".to_string());
            for file in &result.copied_files {
                lines.push(format!("    - {}/{}", licenses_dir_label, file));
            }
        }
        lines.push(String::new());
    }

    if !warnings.is_empty() {
        lines.push("WARNINGS".to_string());
        for warning in warnings {
            lines.push(warning.clone());
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

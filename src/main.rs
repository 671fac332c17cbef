use anyhow::Result;
use clap::Parser;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

// Import from our library
use py_license_collector::catalog::{find_site_packages, normalize_name, read_distributions};
use py_license_collector::cli::{Cli, OutputFormat};
use py_license_collector::collector::collect_licenses;
use py_license_collector::config::{
    load_config, DEFAULT_EXCLUDES, DEFAULT_NOTICES, DEFAULT_OUTPUT_DIR,
};
use py_license_collector::license::create_report;
use py_license_collector::notices::write_third_party_notices;
use py_license_collector::output::format_text_summary;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from pyproject.toml; CLI arguments override config values
    let config = load_config()?;

    let output_dir = cli
        .output_dir
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let notices_path = cli
        .notices
        .or(config.notices)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTICES));
    let exclude_names = cli
        .exclude
        .or(config.exclude)
        .unwrap_or_else(|| DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect());
    let format = cli.format.unwrap_or(match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    // The only fatal error: no install root to scan
    let site_packages = find_site_packages(cli.path.as_deref())?;

    if cli.clean {
        // Deletion errors are deliberately ignored
        let _ = fs::remove_dir_all(&output_dir);
    }

    let mut exclude = HashSet::new();
    for name in &exclude_names {
        exclude.insert(name.to_lowercase());
        exclude.insert(normalize_name(name).to_lowercase());
    }

    let dists = read_distributions(&site_packages)?;
    let (results, warnings) = collect_licenses(&dists, &site_packages, &output_dir, &exclude)?;

    let licenses_dir_label = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "licenses".to_string());
    write_third_party_notices(&notices_path, &results, &warnings, &licenses_dir_label)?;

    let report = create_report(results, warnings);
    if !cli.quiet {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                print!("{}", format_text_summary(&report, &output_dir, &notices_path));
            }
        }
    }

    Ok(())
}

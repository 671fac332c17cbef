use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod infer;
pub mod locate;

pub use infer::infer_license;
pub use locate::locate_license_files;

/// One distribution's collection result: what license it declares and
/// which files made it into the output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseCopy {
    pub name: String,
    pub version: String,
    /// Inferred label, never empty ("UNKNOWN" when nothing usable exists).
    pub license: String,
    /// File names relative to the output directory, lexicographically
    /// sorted. Empty means no license file was found.
    pub copied_files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CollectionSummary {
    pub total_distributions: usize,
    pub with_files: usize,
    pub without_files: usize,
    pub license_counts: IndexMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CollectionReport {
    pub distributions: Vec<LicenseCopy>,
    pub summary: CollectionSummary,
    pub warnings: Vec<String>,
}

pub fn create_report(distributions: Vec<LicenseCopy>, warnings: Vec<String>) -> CollectionReport {
    let total_distributions = distributions.len();
    let with_files = distributions
        .iter()
        .filter(|d| !d.copied_files.is_empty())
        .count();
    let without_files = total_distributions - with_files;

    let mut counts = HashMap::new();
    for dist in &distributions {
        *counts.entry(dist.license.clone()).or_insert(0) += 1;
    }

    // Convert HashMap to Vec, sort by count (descending), then create IndexMap
    let mut counts_vec: Vec<(String, usize)> = counts.into_iter().collect();
    counts_vec.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let license_counts: IndexMap<String, usize> = counts_vec.into_iter().collect();

    CollectionReport {
        distributions,
        summary: CollectionSummary {
            total_distributions,
            with_files,
            without_files,
            license_counts,
        },
        warnings,
    }
}

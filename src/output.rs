use crate::license::CollectionReport;
use std::path::Path;

/// End-of-run console summary in text mode.
pub fn format_text_summary(
    report: &CollectionReport,
    output_dir: &Path,
    notices_path: &Path,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "[OK] Collected: {} distributions\n",
        report.summary.total_distributions
    ));
    output.push_str(&format!("[OK] Output: {}\n", display_path(output_dir)));
    output.push_str(&format!("[OK] Notices: {}\n", display_path(notices_path)));

    if report.summary.without_files > 0 {
        output.push_str(&format!(
            "[WARN] No license file found for {} distributions. See WARNINGS in notices.\n",
            report.summary.without_files
        ));
    }

    output
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

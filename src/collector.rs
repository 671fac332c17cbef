use crate::catalog::{normalize_name, Distribution};
use crate::license::{infer_license, locate_license_files, LicenseCopy};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const PYTHON_RUNTIME_NAME: &str = "Python";
pub const PYTHON_LICENSE_LABEL: &str = "Python Software Foundation License (PSF-2.0)";

/// Where CPython keeps its own license, relative to the installation prefix.
const RUNTIME_LICENSE_CANDIDATES: [&str; 3] = ["LICENSE.txt", "LICENSE", "LICENSE.rst"];

/// Copy every distribution's license files into `output_dir` and build one
/// result record per distribution, in case-insensitive name order.
///
/// Per-item failures never abort the run: a failed copy or a distribution
/// with no license files becomes a warning string, emitted in chronological
/// order. The Python runtime's own license is appended as a synthetic final
/// entry when it can be found.
pub fn collect_licenses(
    dists: &[Distribution],
    site_packages: &Path,
    output_dir: &Path,
    exclude: &HashSet<String>,
) -> Result<(Vec<LicenseCopy>, Vec<String>)> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mut sorted: Vec<&Distribution> = dists.iter().collect();
    sorted.sort_by_key(|d| d.name.to_lowercase());

    let mut results = Vec::new();
    let mut warnings = Vec::new();
    // Target names claimed this run, lowercased for case-insensitive filesystems
    let mut used: HashSet<String> = HashSet::new();

    for dist in sorted {
        if exclude.contains(&dist.name.to_lowercase())
            || exclude.contains(&normalize_name(&dist.name).to_lowercase())
        {
            continue;
        }

        let license = infer_license(&dist.metadata);
        let sources = locate_license_files(dist, site_packages);
        let prefix = normalize_name(&dist.name);

        let mut copied = Vec::new();
        for source in sources {
            let basename = match source.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            let target = unique_target_name(output_dir, &used, &format!("{}-{}", prefix, basename));
            match fs::copy(&source, output_dir.join(&target)) {
                Ok(_) => {
                    used.insert(target.to_lowercase());
                    copied.push(target);
                }
                Err(err) => warnings.push(format!(
                    "[WARN] copy failed: {} {} : {} : {}",
                    dist.name,
                    dist.version,
                    source.display(),
                    err
                )),
            }
        }

        if copied.is_empty() {
            warnings.push(format!(
                "[WARN] no license file found for: {} {}",
                dist.name, dist.version
            ));
        }
        copied.sort();

        results.push(LicenseCopy {
            name: dist.name.clone(),
            version: dist.version.clone(),
            license,
            copied_files: copied,
        });
    }

    match copy_runtime_license(site_packages, output_dir, &mut used) {
        Some((file, version)) => results.push(LicenseCopy {
            name: PYTHON_RUNTIME_NAME.to_string(),
            version,
            license: PYTHON_LICENSE_LABEL.to_string(),
            copied_files: vec![file],
        }),
        None => warnings.push("[WARN] Python runtime license not found".to_string()),
    }

    Ok((results, warnings))
}

/// Disambiguate a target file name against names claimed this run and
/// files already on disk: `_2`, `_3`, ... before the extension.
fn unique_target_name(output_dir: &Path, used: &HashSet<String>, candidate: &str) -> String {
    let mut name = candidate.to_string();
    let mut counter = 2;
    while used.contains(&name.to_lowercase()) || output_dir.join(&name).exists() {
        name = match candidate.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, counter, ext),
            _ => format!("{}_{}", candidate, counter),
        };
        counter += 1;
    }
    name
}

/// Best effort for the interpreter's own license. A venv's `pyvenv.cfg`
/// points at the founding installation via its `home` key; checking that
/// directory and its parent covers both the Unix (`<prefix>/bin`) and
/// Windows (`<prefix>`) layouts. Outside a venv the ancestors of
/// site-packages are the installation prefix candidates.
fn copy_runtime_license(
    site_packages: &Path,
    output_dir: &Path,
    used: &mut HashSet<String>,
) -> Option<(String, String)> {
    let mut prefixes: Vec<PathBuf> = Vec::new();
    let mut version: Option<String> = None;

    if let Some((home, cfg_version)) = read_pyvenv_cfg(site_packages) {
        if let Some(parent) = home.parent() {
            prefixes.push(parent.to_path_buf());
        }
        prefixes.insert(0, home);
        version = cfg_version;
    } else {
        prefixes.extend(site_packages.ancestors().skip(1).map(Path::to_path_buf));
    }

    let version = version
        .or_else(|| python_version_from_path(site_packages))
        .unwrap_or_else(|| "UNKNOWN".to_string());

    for prefix in &prefixes {
        for candidate in RUNTIME_LICENSE_CANDIDATES {
            let source = prefix.join(candidate);
            if !source.is_file() {
                continue;
            }
            let target = unique_target_name(
                output_dir,
                used,
                &format!("{}-{}", PYTHON_RUNTIME_NAME, candidate),
            );
            if fs::copy(&source, output_dir.join(&target)).is_ok() {
                used.insert(target.to_lowercase());
                return Some((target, version));
            }
        }
    }

    None
}

/// Walk up from site-packages to the venv root and read `pyvenv.cfg`.
/// Returns the `home` directory and, when present, the `version` /
/// `version_info` value.
fn read_pyvenv_cfg(site_packages: &Path) -> Option<(PathBuf, Option<String>)> {
    for ancestor in site_packages.ancestors().skip(1) {
        let cfg = ancestor.join("pyvenv.cfg");
        let Ok(content) = fs::read_to_string(&cfg) else {
            continue;
        };

        let mut home = None;
        let mut version = None;
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim().to_lowercase().as_str() {
                "home" => home = Some(PathBuf::from(value.trim())),
                "version" | "version_info" => version = Some(value.trim().to_string()),
                _ => {}
            }
        }
        return home.map(|h| (h, version));
    }
    None
}

/// `.../lib/python3.11/site-packages` carries the version in a path segment.
fn python_version_from_path(site_packages: &Path) -> Option<String> {
    site_packages.components().rev().find_map(|c| {
        let segment = c.as_os_str().to_string_lossy();
        segment
            .strip_prefix("python")
            .filter(|rest| rest.chars().next().map_or(false, |ch| ch.is_ascii_digit()))
            .map(str::to_string)
    })
}

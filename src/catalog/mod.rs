use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub mod metadata;

pub use metadata::DistMetadata;

/// One installed distribution, read from its metadata directory.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub name: String,
    /// `"UNKNOWN"` when neither the metadata nor the directory name says.
    pub version: String,
    pub metadata: DistMetadata,
    /// Installed-file manifest (paths relative to site-packages), when the
    /// distribution ships one (`RECORD` for dist-info, `SOURCES.txt` for
    /// egg-info). `None` routes the locator to its fallback search.
    pub manifest: Option<Vec<String>>,
}

/// Make a distribution name safe for use in file names: whitespace runs
/// become a single underscore, and so does every character outside
/// `[A-Za-z0-9._+-]`.
pub fn normalize_name(name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._+-]").unwrap());

    let collapsed = whitespace.replace_all(name.trim(), "_");
    unsafe_chars.replace_all(&collapsed, "_").into_owned()
}

/// Resolve the site-packages directory to scan.
///
/// An explicit path wins (accepted as the directory itself, a directory
/// containing `site-packages`, or a venv root); then the `VIRTUAL_ENV`
/// environment variable; then `./.venv`. Failure here is the run's only
/// fatal error.
pub fn find_site_packages(path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = path {
        if let Some(found) = site_packages_under(path) {
            return Ok(found);
        }
        // Trust the caller; an unreadable directory surfaces when scanned.
        return Ok(path.to_path_buf());
    }

    if let Ok(venv) = std::env::var("VIRTUAL_ENV") {
        if let Some(found) = site_packages_under(Path::new(&venv)) {
            return Ok(found);
        }
    }

    let current_dir = std::env::current_dir()?;
    if let Some(found) = site_packages_under(&current_dir.join(".venv")) {
        return Ok(found);
    }

    anyhow::bail!(
        "Could not find a site-packages directory. Activate a virtual environment or pass a path."
    )
}

/// Probe the known environment layouts below `root`.
fn site_packages_under(root: &Path) -> Option<PathBuf> {
    if root.file_name().map_or(false, |name| name == "site-packages") && root.is_dir() {
        return Some(root.to_path_buf());
    }

    let direct = root.join("site-packages");
    if direct.is_dir() {
        return Some(direct);
    }

    // Windows layout
    let windows = root.join("Lib").join("site-packages");
    if windows.is_dir() {
        return Some(windows);
    }

    // Unix layout: lib/pythonX.Y/site-packages
    let lib = root.join("lib");
    if let Ok(entries) = fs::read_dir(&lib) {
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with("python") {
                let candidate = entry.path().join("site-packages");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

/// Enumerate every distribution in `site_packages` by scanning its
/// `*.dist-info` and `*.egg-info` entries. Entries without a readable
/// metadata file are skipped; order is whatever the directory yields
/// (callers sort).
pub fn read_distributions(site_packages: &Path) -> Result<Vec<Distribution>> {
    let mut dists = Vec::new();

    let entries = fs::read_dir(site_packages).with_context(|| {
        format!(
            "Failed to scan site-packages at {}",
            site_packages.display()
        )
    })?;

    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let name_str = file_name.to_string_lossy();

        if name_str.ends_with(".dist-info") {
            if let Some(dist) = read_dist_info(&entry.path()) {
                dists.push(dist);
            }
        } else if name_str.ends_with(".egg-info") {
            if let Some(dist) = read_egg_info(&entry.path()) {
                dists.push(dist);
            }
        }
    }

    Ok(dists)
}

fn read_dist_info(dir: &Path) -> Option<Distribution> {
    let content = fs::read_to_string(dir.join("METADATA")).ok()?;
    let metadata = DistMetadata::parse(&content);
    let (dir_name, dir_version) = parse_dir_name_version(dir, ".dist-info");

    let name = metadata.get("Name").map(str::to_string).or(dir_name)?;
    let version = metadata
        .get("Version")
        .map(str::to_string)
        .or(dir_version)
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let manifest = fs::read_to_string(dir.join("RECORD"))
        .ok()
        .map(|record| metadata::parse_record_paths(&record));

    Some(Distribution {
        name,
        version,
        metadata,
        manifest,
    })
}

fn read_egg_info(path: &Path) -> Option<Distribution> {
    // Old installs ship `foo-1.0.egg-info` as a bare PKG-INFO file.
    let content = if path.is_dir() {
        fs::read_to_string(path.join("PKG-INFO")).ok()?
    } else {
        fs::read_to_string(path).ok()?
    };
    let metadata = DistMetadata::parse(&content);
    let (dir_name, dir_version) = parse_dir_name_version(path, ".egg-info");

    let name = metadata.get("Name").map(str::to_string).or(dir_name)?;
    let version = metadata
        .get("Version")
        .map(str::to_string)
        .or(dir_version)
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let manifest = if path.is_dir() {
        fs::read_to_string(path.join("SOURCES.txt"))
            .ok()
            .map(|sources| metadata::parse_sources_paths(&sources))
    } else {
        None
    };

    Some(Distribution {
        name,
        version,
        metadata,
        manifest,
    })
}

/// `requests-2.31.0.dist-info` → (`requests`, `2.31.0`). Split on the last
/// dash so dashed project names survive.
fn parse_dir_name_version(path: &Path, suffix: &str) -> (Option<String>, Option<String>) {
    let stem = match path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(suffix))
    {
        Some(stem) => stem,
        None => return (None, None),
    };

    match stem.rfind('-') {
        Some(idx) => (
            Some(stem[..idx].to_string()),
            Some(stem[idx + 1..].to_string()),
        ),
        None => (Some(stem.to_string()), None),
    }
}

use crate::catalog::{normalize_name, Distribution};
use glob::Pattern;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// LICENSE, COPYING or NOTICE, optionally followed by a separator and
/// arbitrary trailing text (`LICENSE-MIT`, `NOTICE.thirdparty`, ...).
pub fn is_license_basename(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)^(LICENSE|COPYING|NOTICE)([._-].*)?$").unwrap());
    re.is_match(name)
}

/// Find every on-disk file carrying a distribution's license text.
///
/// The manifest is authoritative when present; the fallback scans the
/// metadata directory itself for installs that ship no usable manifest.
/// Results are deduplicated by resolved path (case-insensitive) and this
/// never fails: total failure is an empty list, which the collector
/// reports as a warning.
pub fn locate_license_files(dist: &Distribution, site_packages: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    if let Some(manifest) = &dist.manifest {
        for entry in manifest {
            if !manifest_entry_qualifies(entry) {
                continue;
            }
            let path = site_packages.join(entry);
            if path.is_file() {
                push_unique(&mut found, &mut seen, path);
            }
        }
    }

    if found.is_empty() {
        if let Some(meta_dir) = find_metadata_dir(site_packages, &dist.name, &dist.version) {
            let walker = WalkDir::new(&meta_dir).sort_by_file_name();
            for entry in walker.into_iter().flatten() {
                if !entry.file_type().is_file() {
                    continue;
                }
                if fallback_entry_qualifies(entry.path(), &meta_dir) {
                    push_unique(&mut found, &mut seen, entry.path().to_path_buf());
                }
            }
        }
    }

    found
}

/// A manifest entry is interesting if its basename is a license basename
/// (wherever it sits, including directly inside the metadata directory),
/// or if it lives under a `licenses/` subdirectory of the metadata
/// directory (wheels place license files there without renaming them).
fn manifest_entry_qualifies(entry: &str) -> bool {
    let segments: Vec<&str> = entry.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
    let Some((basename, dirs)) = segments.split_last() else {
        return false;
    };

    if is_license_basename(basename) {
        return true;
    }
    dirs.windows(2)
        .any(|w| is_metadata_dir_name(w[0]) && w[1].eq_ignore_ascii_case("licenses"))
}

fn is_metadata_dir_name(name: &str) -> bool {
    static PATTERNS: OnceLock<[Pattern; 2]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            Pattern::new("*.dist-info").unwrap(),
            Pattern::new("*.egg-info").unwrap(),
        ]
    });
    patterns.iter().any(|p| p.matches(name))
}

fn fallback_entry_qualifies(path: &Path, meta_dir: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if is_license_basename(name) {
            return true;
        }
    }
    path.strip_prefix(meta_dir)
        .ok()
        .and_then(|rel| rel.components().next())
        .map_or(false, |first| {
            first
                .as_os_str()
                .to_string_lossy()
                .eq_ignore_ascii_case("licenses")
        })
}

fn push_unique(found: &mut Vec<PathBuf>, seen: &mut HashSet<String>, path: PathBuf) {
    let resolved = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if seen.insert(resolved.to_string_lossy().to_lowercase()) {
        found.push(path);
    }
}

/// Locate the distribution's metadata directory by name. Exact
/// name-version match first; failing that, a looser substring match where
/// the shortest directory name wins ties. The tie-break is an inherited
/// heuristic; determinism is all it promises.
fn find_metadata_dir(site_packages: &Path, name: &str, version: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(site_packages).ok()?;
    let mut candidates: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| is_metadata_dir_name(n))
        .collect();
    candidates.sort();

    if let Some(exact) = exact_dir_regex(name, version) {
        if let Some(hit) = candidates.iter().find(|n| exact.is_match(n)) {
            return Some(site_packages.join(hit));
        }
    }

    let name_key = fold(&normalize_name(name));
    let version_key = fold(version);
    candidates
        .iter()
        .filter(|n| {
            let folded = fold(n);
            folded.contains(&name_key) && folded.contains(&version_key)
        })
        .min_by_key(|n| n.len())
        .map(|n| site_packages.join(n))
}

/// `^<name>[-_.]+<version>.(dist|egg)-info$`, case-insensitive, with runs
/// of `-`, `_` and `.` in the name matching any such run (installers
/// rewrite them freely).
fn exact_dir_regex(name: &str, version: &str) -> Option<Regex> {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[-_.]+").unwrap());

    let name_pattern = separators
        .split(&normalize_name(name))
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[-_.]+");
    let pattern = format!(
        r"(?i)^{}[-_.]+{}\.(dist|egg)-info$",
        name_pattern,
        regex::escape(version)
    );
    Regex::new(&pattern).ok()
}

fn fold(s: &str) -> String {
    s.to_lowercase().replace(['-', '.'], "_")
}

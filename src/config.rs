use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults for a typical one-file release layout.
pub const DEFAULT_OUTPUT_DIR: &str = "release/licenses";
pub const DEFAULT_NOTICES: &str = "release/THIRD_PARTY_NOTICES.txt";
pub const DEFAULT_EXCLUDES: [&str; 3] = ["pip", "setuptools", "wheel"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory the license files are copied into
    pub output_dir: Option<PathBuf>,

    /// Path of the generated notices document
    pub notices: Option<PathBuf>,

    /// Distribution names to skip
    pub exclude: Option<Vec<String>>,

    /// Summary format (text, json)
    pub format: Option<String>,
}

/// Load configuration from pyproject.toml in the current directory.
pub fn load_config() -> Result<Config> {
    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(&dir)
}

/// Load configuration from `<dir>/pyproject.toml`. Missing file or missing
/// `[tool.py-license-collector]` section yields the defaults; a malformed
/// section is an error.
pub fn load_config_from(dir: &Path) -> Result<Config> {
    let pyproject_path = dir.join("pyproject.toml");

    if !pyproject_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&pyproject_path)
        .with_context(|| format!("Failed to read pyproject.toml: {}", pyproject_path.display()))?;

    let pyproject: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Failed to parse pyproject.toml: {}", pyproject_path.display()))?;

    // Extract [tool.py-license-collector] section
    if let Some(tool) = pyproject.get("tool") {
        if let Some(section) = tool.get("py-license-collector") {
            let config: Config = section
                .clone()
                .try_into()
                .context("Failed to parse [tool.py-license-collector] section")?;
            return Ok(config);
        }
    }

    Ok(Config::default())
}

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "py-license-collector")]
#[command(about = "Collect third-party license files from Python packages into a release directory")]
#[command(version)]
pub struct Cli {
    /// Path to site-packages directory or virtual environment
    pub path: Option<PathBuf>,

    /// Directory the license files are copied into
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Path of the generated notices document
    #[arg(short, long, value_name = "PATH")]
    pub notices: Option<PathBuf>,

    /// Distribution names to skip (default: pip, setuptools, wheel)
    #[arg(short, long, value_name = "NAME", num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Recursively delete the output directory before collecting
    #[arg(long)]
    pub clean: bool,

    /// Summary format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Suppress the end-of-run summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

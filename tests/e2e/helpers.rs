use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_py-license-collector").to_string();
        fs::create_dir_all(dir.path().join("site-packages")).unwrap();

        Self { dir, binary_path }
    }

    pub fn site_packages(&self) -> PathBuf {
        self.dir.path().join("site-packages")
    }

    /// Create a dist-info directory with METADATA, the given license files
    /// (paths relative to site-packages), and a RECORD listing all of them.
    pub fn add_dist(&self, dir_name: &str, metadata: &str, license_files: &[&str]) {
        let info = self.site_packages().join(dir_name);
        fs::create_dir_all(&info).unwrap();
        fs::write(info.join("METADATA"), metadata).unwrap();

        let mut record = format!("{}/METADATA,,\n", dir_name);
        for file in license_files {
            let path = self.site_packages().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("license text of {}", file)).unwrap();
            record.push_str(&format!("{},,\n", file));
        }
        fs::write(info.join("RECORD"), record).unwrap();
    }

    /// Run the collector against the fixture site-packages tree.
    pub fn run(&self, args: &[&str]) -> Output {
        let site_packages = self.site_packages();
        let mut all_args = vec![site_packages.to_str().unwrap()];
        all_args.extend_from_slice(args);
        self.run_raw(&all_args)
    }

    /// Run with explicit arguments (no implied positional path).
    pub fn run_raw(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("VIRTUAL_ENV")
            .output()
            .expect("Failed to run py-license-collector")
    }

    pub fn read_notices(&self) -> String {
        fs::read_to_string(self.dir.path().join("release/THIRD_PARTY_NOTICES.txt"))
            .expect("notices file not written")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("release/licenses")
    }
}

use super::helpers::TestEnv;
use std::fs;

#[test]
fn test_basic_collection() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "requests-2.31.0.dist-info",
        "Name: requests\nVersion: 2.31.0\nLicense: Apache-2.0\n",
        &["requests-2.31.0.dist-info/LICENSE"],
    );
    test_env.add_dist(
        "click-8.1.7.dist-info",
        "Name: click\nVersion: 8.1.7\nClassifier: License :: OSI Approved :: BSD License\n",
        &["click-8.1.7.dist-info/licenses/LICENSE.txt"],
    );

    let output = test_env.run(&[]);
    assert!(output.status.success());

    assert!(test_env.output_dir().join("requests-LICENSE").is_file());
    assert!(test_env.output_dir().join("click-LICENSE.txt").is_file());

    let notices = test_env.read_notices();
    assert!(notices.contains("- requests 2.31.0"));
    assert!(notices.contains("Declared/Detected License: Apache-2.0"));
    assert!(notices.contains("- click 8.1.7"));
    assert!(notices.contains("Declared/Detected License: BSD"));
    // Sorted case-insensitively: click before requests
    assert!(notices.find("- click").unwrap() < notices.find("- requests").unwrap());
}

#[test]
fn test_exclusion() {
    let test_env = TestEnv::new();

    test_env.add_dist("pip-24.0.dist-info", "Name: pip\nVersion: 24.0\n", &[]);
    test_env.add_dist(
        "keep-1.0.dist-info",
        "Name: keep\nVersion: 1.0\n",
        &["keep-1.0.dist-info/LICENSE"],
    );

    let output = test_env.run(&["--exclude", "pip"]);
    assert!(output.status.success());

    let notices = test_env.read_notices();
    assert!(!notices.contains("- pip 24.0"));
    assert!(!notices.contains("no license file found for: pip"));
    assert!(notices.contains("- keep 1.0"));
}

#[test]
fn test_missing_license_warns_but_lists_distribution() {
    let test_env = TestEnv::new();

    test_env.add_dist("Baz-0.1.dist-info", "Name: Baz\nVersion: 0.1\n", &[]);

    let output = test_env.run(&[]);
    assert!(output.status.success());

    let notices = test_env.read_notices();
    assert!(notices.contains("- Baz 0.1"));
    assert!(notices.contains("Included license files: (NOT FOUND)"));
    assert!(notices.contains("WARNINGS"));
    assert!(notices.contains("no license file found for: Baz 0.1"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[WARN] No license file found for 1 distributions"));
}

#[test]
fn test_collision_disambiguation() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\n",
        &["pkg-1.0.dist-info/LICENSE", "pkg/vendored/LICENSE"],
    );

    let output = test_env.run(&[]);
    assert!(output.status.success());

    assert!(test_env.output_dir().join("pkg-LICENSE").is_file());
    assert!(test_env.output_dir().join("pkg-LICENSE_2").is_file());
}

#[test]
fn test_rerun_without_clean_never_overwrites() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    assert!(test_env.run(&[]).status.success());
    let copied = test_env.output_dir().join("pkg-LICENSE");
    fs::write(&copied, "locally edited").unwrap();

    assert!(test_env.run(&[]).status.success());
    assert_eq!(fs::read_to_string(&copied).unwrap(), "locally edited");
    assert!(test_env.output_dir().join("pkg-LICENSE_2").is_file());
}

#[test]
fn test_clean_flag_removes_output_dir_first() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    fs::create_dir_all(test_env.output_dir()).unwrap();
    fs::write(test_env.output_dir().join("stale-file"), "old run").unwrap();

    let output = test_env.run(&["--clean"]);
    assert!(output.status.success());

    assert!(!test_env.output_dir().join("stale-file").exists());
    assert!(test_env.output_dir().join("pkg-LICENSE").is_file());
}

#[test]
fn test_custom_output_paths() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    let output = test_env.run(&[
        "--output-dir",
        "dist/third-party",
        "--notices",
        "dist/NOTICES.txt",
    ]);
    assert!(output.status.success());

    assert!(test_env
        .dir
        .path()
        .join("dist/third-party/pkg-LICENSE")
        .is_file());
    let notices = fs::read_to_string(test_env.dir.path().join("dist/NOTICES.txt")).unwrap();
    // The label follows the output directory name
    assert!(notices.contains("Output license directory: third-party"));
    assert!(notices.contains("- third-party/pkg-LICENSE"));
}

#[test]
fn test_json_summary() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\nLicense: MIT\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    let output = test_env.run(&["--format", "json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"distributions\""));
    assert!(stdout.contains("\"summary\""));
    assert!(stdout.contains("\"license_counts\""));
    assert!(stdout.contains("\"MIT\""));
}

#[test]
fn test_quiet_suppresses_summary() {
    let test_env = TestEnv::new();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    let output = test_env.run(&["--quiet"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    // The notices document is still written
    assert!(test_env.read_notices().contains("- pkg 1.0"));
}

#[test]
fn test_fatal_when_no_site_packages() {
    let test_env = TestEnv::new();

    // No positional path, no VIRTUAL_ENV, no ./.venv in the temp dir
    let output = test_env.run_raw(&[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("site-packages"));
}

#[test]
fn test_runtime_license_from_venv() {
    let test_env = TestEnv::new();

    // Full venv layout with pyvenv.cfg pointing at a fake base install
    let venv = test_env.dir.path().join("venv");
    let sp = venv.join("lib/python3.12/site-packages");
    fs::create_dir_all(&sp).unwrap();

    let base = test_env.dir.path().join("base");
    fs::create_dir_all(base.join("bin")).unwrap();
    fs::write(base.join("LICENSE.txt"), "PSF license text").unwrap();
    fs::write(
        venv.join("pyvenv.cfg"),
        format!("home = {}\nversion = 3.12.1\n", base.join("bin").display()),
    )
    .unwrap();

    let info = sp.join("pkg-1.0.dist-info");
    fs::create_dir_all(&info).unwrap();
    fs::write(info.join("METADATA"), "Name: pkg\nVersion: 1.0\n").unwrap();

    let output = test_env.run_raw(&[venv.to_str().unwrap()]);
    assert!(output.status.success());

    let notices = test_env.read_notices();
    assert!(notices.contains("- Python 3.12.1"));
    assert!(notices.contains("Python Software Foundation License (PSF-2.0)"));
    assert!(test_env.output_dir().join("Python-LICENSE.txt").is_file());
}

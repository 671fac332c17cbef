use super::helpers::TestEnv;
use std::fs;

#[test]
fn test_config_from_pyproject() {
    let test_env = TestEnv::new();

    fs::write(
        test_env.dir.path().join("pyproject.toml"),
        r#"[project]
name = "my-app"
version = "0.1.0"

[tool.py-license-collector]
output_dir = "bundle/licenses"
notices = "bundle/NOTICES.txt"
exclude = ["skipme"]
format = "json"
"#,
    )
    .unwrap();

    test_env.add_dist(
        "skipme-1.0.dist-info",
        "Name: skipme\nVersion: 1.0\n",
        &["skipme-1.0.dist-info/LICENSE"],
    );
    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\nLicense: MIT\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    let output = test_env.run(&[]);
    assert!(output.status.success());

    // Config-driven paths and exclusion
    assert!(test_env
        .dir
        .path()
        .join("bundle/licenses/pkg-LICENSE")
        .is_file());
    let notices = fs::read_to_string(test_env.dir.path().join("bundle/NOTICES.txt")).unwrap();
    assert!(notices.contains("- pkg 1.0"));
    assert!(!notices.contains("skipme"));

    // Config-driven JSON format
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"distributions\""));
}

#[test]
fn test_cli_flags_override_config() {
    let test_env = TestEnv::new();

    fs::write(
        test_env.dir.path().join("pyproject.toml"),
        r#"[tool.py-license-collector]
output_dir = "bundle/licenses"
notices = "bundle/NOTICES.txt"
format = "json"
"#,
    )
    .unwrap();

    test_env.add_dist(
        "pkg-1.0.dist-info",
        "Name: pkg\nVersion: 1.0\n",
        &["pkg-1.0.dist-info/LICENSE"],
    );

    let output = test_env.run(&[
        "--output-dir",
        "override/licenses",
        "--notices",
        "override/NOTICES.txt",
        "--format",
        "text",
    ]);
    assert!(output.status.success());

    assert!(test_env
        .dir
        .path()
        .join("override/licenses/pkg-LICENSE")
        .is_file());
    assert!(!test_env.dir.path().join("bundle").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[OK] Collected:"));
}

#[test]
fn test_malformed_config_is_fatal() {
    let test_env = TestEnv::new();

    fs::write(
        test_env.dir.path().join("pyproject.toml"),
        "[tool.py-license-collector]\nexclude = \"not-a-list\"\n",
    )
    .unwrap();

    let output = test_env.run(&[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("py-license-collector"));
}

//! `silex-deploy env` against a temporary compose project.

use std::path::Path;

use predicates::prelude::*;

use crate::cli_tests::silex_deploy;

/// Write a config pointing `stack.project_dir` at `project`.
fn write_config(dir: &Path, project: &Path) -> std::path::PathBuf {
    let path = dir.join("deploy.yaml");
    std::fs::write(
        &path,
        format!("stack:\n  project_dir: {}\n", project.display()),
    )
    .expect("write config");
    path
}

#[test]
fn test_env_dry_run_prints_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let env_path = dir.path().join(".env");
    std::fs::write(&env_path, "COMPOSE_PROJECT_NAME=opensilex\n").expect("write env");
    let config = write_config(dir.path(), dir.path());

    silex_deploy()
        .arg("--config")
        .arg(&config)
        .args(["env", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPOSE_PROJECT_NAME=opensilex"))
        .stdout(predicate::str::contains(
            "OPENSILEX_CONFIG_THEME=opensilex-sandbox#sandbox",
        ));

    let after = std::fs::read_to_string(&env_path).expect("read env");
    assert_eq!(after, "COMPOSE_PROJECT_NAME=opensilex\n");
}

#[test]
fn test_env_twice_keeps_single_theme_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        "COMPOSE_PROJECT_NAME=opensilex\nOPENSILEX_CONFIG_THEME=old#theme\n",
    )
    .expect("write env");
    let config = write_config(dir.path(), dir.path());

    for _ in 0..2 {
        silex_deploy()
            .arg("--config")
            .arg(&config)
            .args(["--quiet", "env"])
            .assert()
            .success();
    }

    let content = std::fs::read_to_string(&env_path).expect("read env");
    let theme_lines: Vec<&str> = content
        .lines()
        .filter(|l| l.starts_with("OPENSILEX_CONFIG_THEME="))
        .collect();
    assert_eq!(theme_lines, ["OPENSILEX_CONFIG_THEME=opensilex-sandbox#sandbox"]);
    assert!(content.starts_with("COMPOSE_PROJECT_NAME=opensilex\n"));
}

#[test]
fn test_env_creates_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path(), dir.path());

    silex_deploy()
        .arg("--config")
        .arg(&config)
        .args(["--quiet", "env"])
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join(".env")).expect("read env");
    assert!(content.contains("THEME_PRIMARY_COLOR=#00a38d"));
}

use qutebrowser_profile::profiles::PROFILE_MARKER;
use tempfile::tempdir;

use crate::common::{config_path, run_binary};

#[test]
fn load_with_new_then_list_prints_the_profile() {
    let temp = tempdir().expect("can create temporary directory");

    let created = run_binary(
        temp.path(),
        &["--load", "work", "--new", "--browser", "true"],
    );
    assert!(
        created.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&created.stderr)
    );
    assert!(temp
        .path()
        .join("data/qutebrowser/work")
        .join(PROFILE_MARKER)
        .is_file());
    assert!(config_path(temp.path()).is_file());

    let listed = run_binary(temp.path(), &["--list"]);
    assert!(listed.status.success());
    assert_eq!(String::from_utf8_lossy(&listed.stdout).trim(), "work");
}

#[test]
fn load_of_missing_profile_fails() {
    let temp = tempdir().expect("can create temporary directory");
    let output = run_binary(temp.path(), &["--load", "ghost", "--browser", "true"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("No such profile: ghost"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!temp.path().join("run/qutebrowser/ghost").exists());
}

#[test]
fn conflicting_actions_fail_before_touching_disk() {
    let temp = tempdir().expect("can create temporary directory");
    let output = run_binary(temp.path(), &["--list", "--remove", "work"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("mutually exclusive"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!config_path(temp.path()).exists());
}

#[test]
fn remove_prints_json_report() {
    let temp = tempdir().expect("can create temporary directory");
    let created = run_binary(
        temp.path(),
        &["--load", "old", "--new", "--browser", "true"],
    );
    assert!(created.status.success());

    let removed = run_binary(temp.path(), &["--remove", "old"]);
    assert!(
        removed.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&removed.stderr)
    );
    let value: serde_json::Value =
        serde_json::from_slice(&removed.stdout).expect("stdout is JSON");
    assert_eq!(value["status"], "removed");
    assert_eq!(value["profile"], "old");

    let listed = run_binary(temp.path(), &["--list"]);
    assert!(String::from_utf8_lossy(&listed.stdout).trim().is_empty());
}

#[test]
fn unwritable_config_only_warns_on_list() {
    let temp = tempdir().expect("can create temporary directory");
    let config_dir = temp.path().join("not-a-file");
    std::fs::create_dir(&config_dir).expect("can create directory");
    let config = config_dir.display().to_string();

    let output = run_binary(temp.path(), &["--list", "--config", &config]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(
        stderr.contains("Configuration file was not saved"),
        "stderr: {stderr}"
    );
}

#[test]
fn unwritable_config_only_warns_after_launch() {
    let temp = tempdir().expect("can create temporary directory");
    // Reads as absent, but writing through the link fails: its target's parent is missing.
    let config = temp.path().join("profiles.toml");
    std::os::unix::fs::symlink(temp.path().join("missing/profiles.toml"), &config)
        .expect("can create link");
    let config = config.display().to_string();

    let output = run_binary(
        temp.path(),
        &["--load", "fresh", "--new", "--browser", "true", "--config", &config],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(
        stderr.contains("Configuration file was not saved"),
        "stderr: {stderr}"
    );
    assert!(temp
        .path()
        .join("data/qutebrowser/fresh")
        .join(PROFILE_MARKER)
        .is_file());
    assert!(!temp.path().join("missing").exists());
}

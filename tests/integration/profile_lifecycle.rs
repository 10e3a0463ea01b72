use std::fs;

use qutebrowser_profile::{
    lib::errors::{ConfigError, ProfileError},
    profiles::{default_profile_args, PROFILE_MARKER},
};
use tempfile::tempdir;

use crate::common::{config_path, fixture, registry_in};

#[test]
fn created_profile_survives_a_new_registry() {
    let temp = tempdir().expect("can create temporary directory");
    let mut registry = registry_in(temp.path());
    registry
        .new_profile("work", Vec::new())
        .expect("profile is created");
    registry.save().expect("config is saved");

    let mut reopened = registry_in(temp.path());
    let profile = reopened.get_profile("work").expect("profile is discovered");
    assert_eq!(
        profile.stored_args(),
        Some(default_profile_args("work").as_slice())
    );
    assert!(temp
        .path()
        .join("data/qutebrowser/work")
        .join(PROFILE_MARKER)
        .is_file());
}

#[test]
fn layout_links_point_at_profile_directories() {
    let temp = tempdir().expect("can create temporary directory");
    let mut registry = registry_in(temp.path());
    let profile = registry
        .new_profile("media", vec!["--backend".into(), "webengine".into()])
        .expect("profile is created");

    let base = temp.path().join("run/qutebrowser/media");
    assert_eq!(profile.base_directory(), base);
    assert_eq!(
        fs::read_link(base.join("cache")).expect("cache link"),
        temp.path().join("cache/qutebrowser/media")
    );
    assert_eq!(
        fs::read_link(base.join("data")).expect("data link"),
        temp.path().join("data/qutebrowser/media")
    );
    assert_eq!(
        fs::read_link(base.join("config")).expect("config link"),
        temp.path().join("config/qutebrowser")
    );
}

#[test]
fn removal_clears_disk_and_config() {
    let temp = tempdir().expect("can create temporary directory");
    let mut registry = registry_in(temp.path());
    registry
        .new_profile("scratch", Vec::new())
        .expect("profile is created");
    registry.save().expect("config is saved");

    let mut registry = registry_in(temp.path());
    let report = registry
        .remove_profile("scratch")
        .expect("profile is removed");
    registry.save().expect("config is saved");

    assert!(report.skipped.is_empty(), "skipped: {:?}", report.skipped);
    assert!(!temp.path().join("run/qutebrowser/scratch").exists());
    assert!(!temp.path().join("data/qutebrowser/scratch").exists());
    let saved = fs::read_to_string(config_path(temp.path())).expect("config exists");
    assert!(!saved.contains("scratch"), "config: {saved}");

    let error = registry
        .get_profile("scratch")
        .expect_err("removed profile is gone");
    assert!(matches!(error, ProfileError::NoSuchProfile { .. }));
}

#[test]
fn malformed_config_surfaces_on_first_use() {
    let temp = tempdir().expect("can create temporary directory");
    let config = config_path(temp.path());
    fs::create_dir_all(config.parent().expect("has parent")).expect("can create dir");
    fs::copy(fixture("tests/fixtures/profiles_malformed.toml"), &config)
        .expect("can copy fixture");
    let mut registry = registry_in(temp.path());

    let error = registry
        .new_profile("work", Vec::new())
        .expect_err("malformed config must fail");
    assert!(
        matches!(
            error,
            ProfileError::Config(ConfigError::Malformed { .. })
        ),
        "Unexpected error: {error:?}"
    );
}

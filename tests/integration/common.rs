use std::{
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use qutebrowser_profile::{
    lib::paths::BaseDirectories,
    profiles::{ConfigStore, ProfileRegistry, ProfileRoots},
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_qutebrowser-profile");

pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// XDG directories rooted inside `root`.
pub fn base_dirs(root: &Path) -> BaseDirectories {
    BaseDirectories {
        runtime: root.join("run"),
        cache: root.join("cache"),
        data: root.join("data"),
        config: root.join("config"),
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join("config/qutebrowser-profile/profiles.toml")
}

/// Registry over `root` with the default profiles root and config path.
pub fn registry_in(root: &Path) -> ProfileRegistry {
    let dirs = base_dirs(root);
    let roots = ProfileRoots::new(&dirs, dirs.default_profiles_root());
    ProfileRegistry::new(roots, ConfigStore::new(config_path(root)))
}

/// Run the binary with every XDG variable pointed into `root`.
pub fn run_binary(root: &Path, args: &[&str]) -> Output {
    Command::new(BINARY_PATH)
        .args(args)
        .env("HOME", root)
        .env("XDG_RUNTIME_DIR", root.join("run"))
        .env("XDG_CACHE_HOME", root.join("cache"))
        .env("XDG_DATA_HOME", root.join("data"))
        .env("XDG_CONFIG_HOME", root.join("config"))
        .env_remove("QUTEBROWSER_PROFILE_CONFIG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("binary should start")
}

//! XDG base directory resolution shared by every profile.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Directory name used for the browser under every XDG root.
pub const APP_NAME: &str = "qutebrowser";

const XDG_RUNTIME_DIR_ENV: &str = "XDG_RUNTIME_DIR";
const XDG_CACHE_HOME_ENV: &str = "XDG_CACHE_HOME";
const XDG_DATA_HOME_ENV: &str = "XDG_DATA_HOME";
const XDG_CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";
const HOME_ENV: &str = "HOME";

/// Process-wide roots from which every profile layout is derived.
///
/// These are the XDG-level directories (for example `~/.cache`), not the
/// application subdirectories beneath them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectories {
    pub runtime: PathBuf,
    pub cache: PathBuf,
    pub data: PathBuf,
    pub config: PathBuf,
}

impl BaseDirectories {
    /// Resolve roots from the current process environment.
    pub fn from_env() -> Result<Self, String> {
        // SAFETY: getuid has no preconditions and cannot fail.
        let uid = unsafe { libc::getuid() };
        Self::resolve_with(|key| env::var_os(key), uid)
    }

    /// Resolve roots from an explicit variable lookup (testable helper).
    ///
    /// Empty or relative XDG values are ignored, as the XDG base directory
    /// rules require.
    pub fn resolve_with(
        lookup: impl Fn(&str) -> Option<OsString>,
        uid: u32,
    ) -> Result<Self, String> {
        let xdg = |key: &str| {
            lookup(key)
                .map(PathBuf::from)
                .filter(|path| is_nonempty_absolute(path))
        };
        let home = || {
            lookup(HOME_ENV)
                .map(PathBuf::from)
                .filter(|path| !path.as_os_str().is_empty())
                .ok_or_else(|| "HOME is unset and no XDG directory overrides it".to_string())
        };

        let runtime = xdg(XDG_RUNTIME_DIR_ENV)
            .unwrap_or_else(|| PathBuf::from(format!("/run/user/{uid}")));
        let cache = match xdg(XDG_CACHE_HOME_ENV) {
            Some(path) => path,
            None => home()?.join(".cache"),
        };
        let data = match xdg(XDG_DATA_HOME_ENV) {
            Some(path) => path,
            None => home()?.join(".local").join("share"),
        };
        let config = match xdg(XDG_CONFIG_HOME_ENV) {
            Some(path) => path,
            None => home()?.join(".config"),
        };

        Ok(Self {
            runtime,
            cache,
            data,
            config,
        })
    }

    /// Default directory scanned for profiles: `<data>/qutebrowser`.
    pub fn default_profiles_root(&self) -> PathBuf {
        self.data.join(APP_NAME)
    }

    /// The single configuration directory shared by all profiles.
    pub fn shared_config_dir(&self) -> PathBuf {
        self.config.join(APP_NAME)
    }
}

/// Returns true if the path is non-empty and absolute.
pub fn is_nonempty_absolute(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_absolute()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), OsString::from(value)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_home_and_uid() {
        let dirs = BaseDirectories::resolve_with(lookup_from(&[("HOME", "/home/ada")]), 1000)
            .expect("HOME is enough to resolve every root");

        assert_eq!(dirs.runtime, PathBuf::from("/run/user/1000"));
        assert_eq!(dirs.cache, PathBuf::from("/home/ada/.cache"));
        assert_eq!(dirs.data, PathBuf::from("/home/ada/.local/share"));
        assert_eq!(dirs.config, PathBuf::from("/home/ada/.config"));
        assert_eq!(
            dirs.default_profiles_root(),
            PathBuf::from("/home/ada/.local/share/qutebrowser")
        );
    }

    #[test]
    fn xdg_variables_override_home() {
        let dirs = BaseDirectories::resolve_with(
            lookup_from(&[
                ("XDG_RUNTIME_DIR", "/tmp/run"),
                ("XDG_CACHE_HOME", "/tmp/cache"),
                ("XDG_DATA_HOME", "/tmp/data"),
                ("XDG_CONFIG_HOME", "/tmp/config"),
            ]),
            1000,
        )
        .expect("HOME is not needed when every XDG variable is set");

        assert_eq!(dirs.runtime, PathBuf::from("/tmp/run"));
        assert_eq!(dirs.cache, PathBuf::from("/tmp/cache"));
        assert_eq!(dirs.data, PathBuf::from("/tmp/data"));
        assert_eq!(dirs.shared_config_dir(), PathBuf::from("/tmp/config/qutebrowser"));
    }

    #[test]
    fn relative_and_empty_xdg_values_are_ignored() {
        let dirs = BaseDirectories::resolve_with(
            lookup_from(&[
                ("HOME", "/home/ada"),
                ("XDG_CACHE_HOME", "relative/cache"),
                ("XDG_DATA_HOME", ""),
            ]),
            7,
        )
        .expect("should resolve");

        assert_eq!(dirs.cache, PathBuf::from("/home/ada/.cache"));
        assert_eq!(dirs.data, PathBuf::from("/home/ada/.local/share"));
    }

    #[test]
    fn missing_home_without_overrides_is_an_error() {
        assert!(BaseDirectories::resolve_with(lookup_from(&[]), 0).is_err());
    }
}

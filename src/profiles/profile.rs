//! A single named profile and its on-disk layout.
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::lib::{
    errors::ProfileError,
    fs::{self as profile_fs, RemoveOutcome},
    paths::{BaseDirectories, APP_NAME},
};

use super::store::{ConfigStore, ProfileRecord};

/// Application-level roots every profile layout is derived from.
///
/// Built once per run and shared by all profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRoots {
    /// Scanned for profiles; holds each profile's data directory.
    pub profiles_root: PathBuf,
    /// `<runtime>/qutebrowser`; holds each profile's base directory.
    pub runtime_root: PathBuf,
    /// `<cache>/qutebrowser`; holds each profile's cache directory.
    pub cache_root: PathBuf,
    /// `<config>/qutebrowser`; linked into every profile.
    pub shared_config: PathBuf,
}

impl ProfileRoots {
    pub fn new(base: &BaseDirectories, profiles_root: impl Into<PathBuf>) -> Self {
        Self {
            profiles_root: profiles_root.into(),
            runtime_root: base.runtime.join(APP_NAME),
            cache_root: base.cache.join(APP_NAME),
            shared_config: base.shared_config_dir(),
        }
    }
}

/// A symbolic link at `link` pointing to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLink {
    pub target: PathBuf,
    pub link: PathBuf,
}

/// What a teardown did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    pub removed_links: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Reject names that are not a single normal path component.
pub fn validate_profile_name(name: &str) -> Result<(), ProfileError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\0');
    if invalid {
        return Err(ProfileError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// One named profile. Its directories and links are computed, never stored.
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    record: Option<ProfileRecord>,
    roots: Arc<ProfileRoots>,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        record: Option<ProfileRecord>,
        roots: Arc<ProfileRoots>,
    ) -> Self {
        Self {
            name: name.into(),
            record,
            roots,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments stored in the config record, if the profile has one.
    pub fn stored_args(&self) -> Option<&[String]> {
        self.record.as_ref().map(|record| record.args.as_slice())
    }

    /// `<runtime>/qutebrowser/<name>`, passed to the browser as `--basedir`.
    pub fn base_directory(&self) -> PathBuf {
        self.roots.runtime_root.join(&self.name)
    }

    pub fn cache_directory(&self) -> PathBuf {
        self.roots.cache_root.join(&self.name)
    }

    pub fn data_directory(&self) -> PathBuf {
        self.roots.profiles_root.join(&self.name)
    }

    /// Directories in creation order.
    pub fn directories(&self) -> Vec<PathBuf> {
        let base = self.base_directory();
        vec![
            base.clone(),
            self.cache_directory(),
            self.data_directory(),
            base.join("runtime"),
        ]
    }

    /// Links inside the base directory. `config` always targets the shared directory.
    pub fn links(&self) -> Vec<ProfileLink> {
        let base = self.base_directory();
        vec![
            ProfileLink {
                target: self.cache_directory(),
                link: base.join("cache"),
            },
            ProfileLink {
                target: self.data_directory(),
                link: base.join("data"),
            },
            ProfileLink {
                target: self.roots.shared_config.clone(),
                link: base.join("config"),
            },
        ]
    }

    /// Create every directory, then (re)create every link. Safe to repeat.
    pub fn materialize(&self) -> Result<(), ProfileError> {
        for dir in self.directories() {
            profile_fs::ensure_dir(&dir).map_err(|source| ProfileError::io(&dir, source))?;
        }
        for ProfileLink { target, link } in self.links() {
            profile_fs::replace_symlink(&target, &link)
                .map_err(|source| ProfileError::io(&link, source))?;
        }
        debug!(
            target: "qutebrowser_profile::profile",
            profile = %self.name,
            base_directory = %self.base_directory().display(),
            "Materialized profile layout"
        );
        Ok(())
    }

    /// Undo [`Profile::materialize`] and drop the config record.
    ///
    /// Links go first because some live inside directories removed afterwards.
    /// Entries of the wrong type are skipped with a warning, never deleted.
    /// The record deletion is in memory only; the caller saves the store.
    pub fn remove(&self, store: &mut ConfigStore) -> Result<RemovalReport, ProfileError> {
        let mut report = RemovalReport::default();

        for ProfileLink { link, .. } in self.links() {
            match profile_fs::remove_symlink_checked(&link) {
                Ok(RemoveOutcome::Removed) => {
                    info!(
                        target: "qutebrowser_profile::profile",
                        path = %link.display(),
                        "Removed link"
                    );
                    report.removed_links.push(link);
                }
                Ok(RemoveOutcome::Missing) => {}
                Ok(RemoveOutcome::SkippedWrongType) => {
                    warn_skipped(&link, "not a symbolic link");
                    report.skipped.push(link);
                }
                Err(err) => {
                    warn_skipped(&link, &err.to_string());
                    report.skipped.push(link);
                }
            }
        }

        for dir in self.directories() {
            match profile_fs::remove_dir_checked(&dir) {
                Ok(RemoveOutcome::Removed) => {
                    info!(
                        target: "qutebrowser_profile::profile",
                        path = %dir.display(),
                        "Removed directory"
                    );
                    report.removed_dirs.push(dir);
                }
                Ok(RemoveOutcome::Missing) => {}
                Ok(RemoveOutcome::SkippedWrongType) => {
                    warn_skipped(&dir, "not a directory");
                    report.skipped.push(dir);
                }
                Err(err) => {
                    warn_skipped(&dir, &err.to_string());
                    report.skipped.push(dir);
                }
            }
        }

        store.delete_profile(&self.name)?;
        Ok(report)
    }
}

fn warn_skipped(path: &Path, reason: &str) {
    warn!(
        target: "qutebrowser_profile::profile",
        path = %path.display(),
        reason,
        "Skipping removal"
    );
}

//! Discovery, creation, lookup, and launch of profiles under one root.
use std::{fs, io, path::Path, sync::Arc};

use tracing::{debug, info};

use crate::lib::{
    browser as browser_helpers,
    errors::{ConfigError, ProfileError},
    fs as profile_fs,
    telemetry::{emit_launch, LaunchTelemetry},
};

use super::{
    profile::{validate_profile_name, Profile, ProfileRoots, RemovalReport},
    store::ConfigStore,
};

/// File the browser writes into every data directory; marks a managed profile.
pub const PROFILE_MARKER: &str = "state";

/// Discovered profiles, read from disk at most once per run.
///
/// Only this registry's own mutations update a populated cache; profiles
/// created or removed by another process during the run are not seen.
#[derive(Debug)]
enum ProfileCache {
    Unpopulated,
    Populated(Vec<Profile>),
}

/// Registry of profiles living under `roots.profiles_root`.
#[derive(Debug)]
pub struct ProfileRegistry {
    roots: Arc<ProfileRoots>,
    store: ConfigStore,
    cache: ProfileCache,
}

impl ProfileRegistry {
    pub fn new(roots: ProfileRoots, store: ConfigStore) -> Self {
        Self {
            roots: Arc::new(roots),
            store,
            cache: ProfileCache::Unpopulated,
        }
    }

    pub fn root(&self) -> &Path {
        &self.roots.profiles_root
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// True iff `<root>/<name>` is a directory containing a regular `state` file.
    pub fn is_valid_profile(&self, name: &str) -> bool {
        let dir = self.root().join(name);
        dir.is_dir()
            && fs::symlink_metadata(dir.join(PROFILE_MARKER))
                .map(|metadata| metadata.is_file())
                .unwrap_or(false)
    }

    /// All discovered profiles, sorted by name. The returned list is a copy.
    pub fn list_profiles(&mut self) -> Result<Vec<Profile>, ProfileError> {
        Ok(self.populate()?.clone())
    }

    pub fn profile_names(&mut self) -> Result<Vec<String>, ProfileError> {
        Ok(self
            .populate()?
            .iter()
            .map(|profile| profile.name().to_string())
            .collect())
    }

    pub fn get_profile(&mut self, name: &str) -> Result<Profile, ProfileError> {
        self.populate()?
            .iter()
            .find(|profile| profile.name() == name)
            .cloned()
            .ok_or_else(|| ProfileError::NoSuchProfile {
                name: name.to_string(),
            })
    }

    /// Create a profile: config record, directories, links, and marker.
    ///
    /// Existence is checked against the disk, not the cache. A record already
    /// present in the config file is reused as is.
    pub fn new_profile(&mut self, name: &str, args: Vec<String>) -> Result<Profile, ProfileError> {
        validate_profile_name(name)?;
        if self.is_valid_profile(name) {
            return Err(ProfileError::ProfileAlreadyExists {
                name: name.to_string(),
            });
        }
        self.populate()?;

        let record = self.store.get_or_create_profile(name, args)?;
        let profile = Profile::new(name, Some(record), Arc::clone(&self.roots));
        profile.materialize()?;
        let marker = profile.data_directory().join(PROFILE_MARKER);
        profile_fs::touch(&marker).map_err(|source| ProfileError::io(&marker, source))?;

        if let ProfileCache::Populated(profiles) = &mut self.cache {
            profiles.retain(|existing| existing.name() != name);
            profiles.push(profile.clone());
        }
        info!(
            target: "qutebrowser_profile::registry",
            profile = name,
            base_directory = %profile.base_directory().display(),
            "Created profile"
        );
        Ok(profile)
    }

    /// Tear down a discovered profile and drop it from the cache.
    pub fn remove_profile(&mut self, name: &str) -> Result<RemovalReport, ProfileError> {
        let profile = self.get_profile(name)?;
        let report = profile.remove(&mut self.store)?;
        if let ProfileCache::Populated(profiles) = &mut self.cache {
            profiles.retain(|existing| existing.name() != name);
        }
        Ok(report)
    }

    /// Spawn the browser for `profile` and return its pid without waiting.
    ///
    /// `args`, when given, replace the profile's stored arguments entirely.
    pub fn launch(
        &self,
        browser_path: &str,
        profile: &Profile,
        args: Option<&[String]>,
        show_output: bool,
    ) -> Result<u32, ProfileError> {
        profile.materialize()?;

        let base_directory = profile.base_directory();
        let extra = args.or(profile.stored_args()).unwrap_or(&[]);
        let argv = browser_helpers::filter_restore_flags(browser_helpers::build_browser_argv(
            browser_path,
            &base_directory,
            extra,
        ));
        let mut command = browser_helpers::build_browser_command(&argv, show_output)
            .ok_or_else(|| ProfileError::Spawn {
                program: browser_path.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty browser command"),
            })?;
        let child = command.spawn().map_err(|source| ProfileError::Spawn {
            program: browser_path.to_string(),
            source,
        })?;

        emit_launch(&LaunchTelemetry {
            profile: profile.name(),
            base_directory: &base_directory,
            pid: child.id(),
            show_output,
            argv: &argv,
        });
        Ok(child.id())
    }

    /// Persist the config store.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.store.save()
    }

    fn populate(&mut self) -> Result<&mut Vec<Profile>, ProfileError> {
        if let ProfileCache::Unpopulated = self.cache {
            let profiles = self.scan()?;
            debug!(
                target: "qutebrowser_profile::registry",
                root = %self.root().display(),
                profiles = profiles.len(),
                "Discovered profiles"
            );
            self.cache = ProfileCache::Populated(profiles);
        }
        match &mut self.cache {
            ProfileCache::Populated(profiles) => Ok(profiles),
            ProfileCache::Unpopulated => unreachable!("cache populated above"),
        }
    }

    fn scan(&mut self) -> Result<Vec<Profile>, ProfileError> {
        let root = self.root().to_path_buf();
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(ProfileError::io(&root, source)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProfileError::io(&root, source))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if self.is_valid_profile(&name) {
                names.push(name);
            }
        }
        names.sort();

        let mut profiles = Vec::with_capacity(names.len());
        for name in names {
            let record = self.store.get_profile(&name)?;
            profiles.push(Profile::new(name, record, Arc::clone(&self.roots)));
        }
        Ok(profiles)
    }
}

//! Persisted profile records: lazy load, in-memory mutation, explicit save.
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::lib::errors::ConfigError;

/// One named profile and the browser arguments used when none are given at launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Root of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
}

/// Arguments given to a profile created without explicit ones.
///
/// The window title carries the profile name so windows of different
/// profiles can be told apart.
pub fn default_profile_args(name: &str) -> Vec<String> {
    vec![format!(
        ":set window.title_format {{perc}}[{name}] {{current_title}}{{title_sep}}qutebrowser"
    )]
}

/// Owner of the config document for one invocation.
///
/// The document is read on first access and cached; nothing reaches the
/// disk until [`ConfigStore::save`] is called.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: Option<ConfigDocument>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: None,
        }
    }

    /// Return the cached document, reading it from disk on first use.
    ///
    /// A missing file yields an empty document. A file that exists but does
    /// not parse is an error, never an empty document.
    pub fn load(&mut self) -> Result<&mut ConfigDocument, ConfigError> {
        if self.document.is_none() {
            let document = read_document(&self.path)?;
            self.document = Some(document);
        }
        Ok(self.document.get_or_insert_with(ConfigDocument::default))
    }

    pub fn get_profile(&mut self, name: &str) -> Result<Option<ProfileRecord>, ConfigError> {
        Ok(self
            .load()?
            .profiles
            .iter()
            .find(|record| record.name == name)
            .cloned())
    }

    /// Return the record for `name`, appending a new one if absent.
    ///
    /// Empty `args` on a new record are replaced by [`default_profile_args`].
    pub fn get_or_create_profile(
        &mut self,
        name: &str,
        args: Vec<String>,
    ) -> Result<ProfileRecord, ConfigError> {
        let document = self.load()?;
        if let Some(record) = document.profiles.iter().find(|record| record.name == name) {
            return Ok(record.clone());
        }

        let args = if args.is_empty() {
            default_profile_args(name)
        } else {
            args
        };
        let record = ProfileRecord {
            name: name.to_string(),
            args,
        };
        document.profiles.push(record.clone());
        debug!(
            target: "qutebrowser_profile::config",
            profile = name,
            "Added profile record"
        );
        Ok(record)
    }

    /// Remove the record named `name`. Absent names are a no-op.
    pub fn delete_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        let document = self.load()?;
        if let Some(index) = document
            .profiles
            .iter()
            .position(|record| record.name == name)
        {
            document.profiles.remove(index);
            debug!(
                target: "qutebrowser_profile::config",
                profile = name,
                "Removed profile record"
            );
        }
        Ok(())
    }

    /// Write the current document back, creating parent directories as needed.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        let path = self.path.clone();
        let document = self.load()?;
        let serialized =
            toml::to_string_pretty(&*document).map_err(|source| ConfigError::Serialize {
                path: path.clone(),
                source,
            })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, serialized).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            target: "qutebrowser_profile::config",
            path = %path.display(),
            profiles = document.profiles.len(),
            "Configuration file saved"
        );
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a regular file",
                ),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                target: "qutebrowser_profile::config",
                path = %path.display(),
                "Configuration file not found; starting with no profiles"
            );
            return Ok(ConfigDocument::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let source = config::File::from(path.to_path_buf()).format(config::FileFormat::Toml);
    let document: ConfigDocument = config::Config::builder()
        .add_source(source)
        .build()
        .and_then(|built| built.try_deserialize())
        .map_err(|err| {
            let error = ConfigError::from_parse_error(path.to_path_buf(), err);
            error!(
                target: "qutebrowser_profile::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

    validate_names(path, &document)?;
    info!(
        target: "qutebrowser_profile::config",
        path = %path.display(),
        profiles = document.profiles.len(),
        "Configuration file loaded"
    );
    Ok(document)
}

fn validate_names(path: &Path, document: &ConfigDocument) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for record in &document.profiles {
        if record.name.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "profiles.name",
                message: "Profile names cannot be empty".into(),
            });
        }
        if !seen.insert(record.name.as_str()) {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "profiles.name",
                message: format!("Profile `{}` is defined more than once", record.name),
            });
        }
    }
    Ok(())
}

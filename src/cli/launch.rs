//! Resolved launch settings and config path resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

use crate::lib::paths::BaseDirectories;

use super::args::{LaunchArgs, RequestedAction};

const CONFIG_ENV: &str = "QUTEBROWSER_PROFILE_CONFIG";
const CONFIG_DIR_NAME: &str = "qutebrowser-profile";
const CONFIG_FILE_NAME: &str = "profiles.toml";

/// Everything an invocation needs, resolved once from args and environment.
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub action: RequestedAction,
    pub base_dirs: BaseDirectories,
    pub profiles_root: PathBuf,
    pub config_path: PathBuf,
    pub browser: String,
    pub menu_override: Option<String>,
    pub show_output: bool,
    pub browser_args: Option<Vec<String>>,
}

impl LaunchArgs {
    /// Build `LaunchSettings` from CLI args and environment variables.
    pub fn into_settings(self) -> Result<LaunchSettings> {
        let action = self.requested_action()?;
        let base_dirs = BaseDirectories::from_env().map_err(|message| anyhow!(message))?;
        self.into_settings_with(action, base_dirs, env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Settings from explicit base directories and config env value (testable helper).
    pub fn into_settings_with(
        self,
        action: RequestedAction,
        base_dirs: BaseDirectories,
        config_env: Option<PathBuf>,
    ) -> Result<LaunchSettings> {
        let config_path = resolve_config_path(self.config_override.clone(), config_env, &base_dirs)?;
        let profiles_root = match &self.profiles_root {
            Some(root) => absolutize(root)?,
            None => base_dirs.default_profiles_root(),
        };
        let browser_args = self.explicit_browser_args().map(<[String]>::to_vec);

        Ok(LaunchSettings {
            action,
            base_dirs,
            profiles_root,
            config_path,
            browser: self.browser,
            menu_override: self.menu,
            show_output: self.show_output,
            browser_args,
        })
    }
}

/// Resolve config path in the order: CLI override → env var → XDG default.
pub fn resolve_config_path(
    override_path: Option<PathBuf>,
    env_path: Option<PathBuf>,
    base_dirs: &BaseDirectories,
) -> Result<PathBuf> {
    let path = override_path
        .or_else(|| env_path.filter(|path| !path.as_os_str().is_empty()))
        .unwrap_or_else(|| base_dirs.config.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    absolutize(&path)
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(cwd.join(path))
}

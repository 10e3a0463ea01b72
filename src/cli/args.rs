//! CLI argument definitions and `RequestedAction` construction.
use std::path::PathBuf;

use clap::Parser;

use crate::lib::errors::ArgsError;

/// The one thing an invocation does, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedAction {
    /// Print discovered profiles.
    List { json: bool },
    /// Pick a profile interactively, then launch it.
    Choose { allow_new: bool },
    /// Launch a named profile, optionally creating it.
    Load { name: String, create_missing: bool },
    /// Tear a named profile down.
    Remove { name: String },
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Run qutebrowser with isolated per-profile cache, data, and runtime directories",
    long_about = None,
    after_help = "Arguments after the options (or after `--`) are passed to qutebrowser and replace the profile's stored arguments.\nWithout --list, --load, or --remove the profile is chosen interactively."
)]
pub struct LaunchArgs {
    /// List known profiles.
    #[arg(long)]
    pub list: bool,
    /// Choose a profile interactively (the default action).
    #[arg(long)]
    pub choose: bool,
    /// Launch the named profile.
    #[arg(long, value_name = "NAME")]
    pub load: Option<String>,
    /// Remove the named profile's directories and config record.
    #[arg(long, value_name = "NAME")]
    pub remove: Option<String>,
    /// With --load: create the profile if it does not exist.
    #[arg(long, requires = "load")]
    pub new: bool,
    /// With --choose: only offer existing profiles.
    #[arg(long, conflicts_with_all = ["list", "load", "remove"])]
    pub only_existing: bool,
    /// With --list: print JSON instead of one name per line.
    #[arg(long, requires = "list")]
    pub json: bool,
    /// Directory scanned for profiles (defaults to $XDG_DATA_HOME/qutebrowser).
    #[arg(long, value_name = "DIR")]
    pub profiles_root: Option<PathBuf>,
    /// Browser executable.
    #[arg(long, value_name = "PATH", default_value = "qutebrowser")]
    pub browser: String,
    /// Path to the profiles config file (overrides QUTEBROWSER_PROFILE_CONFIG).
    #[arg(long = "config", value_name = "PATH")]
    pub config_override: Option<PathBuf>,
    /// dmenu-compatible command used to pick a profile (defaults to rofi, then dmenu).
    #[arg(long, value_name = "COMMAND")]
    pub menu: Option<String>,
    /// Pass the browser's stdin/stdout/stderr through instead of discarding them.
    #[arg(long)]
    pub show_output: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
    /// Arguments passed to the browser.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "BROWSER_ARGS"
    )]
    pub browser_args: Vec<String>,
}

impl LaunchArgs {
    /// Collapse the independent action flags into one tagged action.
    ///
    /// Fails before any side effect when more than one action is given.
    pub fn requested_action(&self) -> Result<RequestedAction, ArgsError> {
        let mut selected = Vec::new();
        if self.list {
            selected.push("--list");
        }
        if self.choose {
            selected.push("--choose");
        }
        if self.load.is_some() {
            selected.push("--load");
        }
        if self.remove.is_some() {
            selected.push("--remove");
        }
        if selected.len() > 1 {
            return Err(ArgsError::MutuallyExclusiveOptions { actions: selected });
        }

        if self.list {
            return Ok(RequestedAction::List { json: self.json });
        }
        if let Some(name) = &self.load {
            return Ok(RequestedAction::Load {
                name: name.clone(),
                create_missing: self.new,
            });
        }
        if let Some(name) = &self.remove {
            return Ok(RequestedAction::Remove { name: name.clone() });
        }
        Ok(RequestedAction::Choose {
            allow_new: !self.only_existing,
        })
    }

    /// Browser arguments given on the command line, if any.
    pub fn explicit_browser_args(&self) -> Option<&[String]> {
        (!self.browser_args.is_empty()).then_some(self.browser_args.as_slice())
    }
}

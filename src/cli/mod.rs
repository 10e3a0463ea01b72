//! CLI entrypoint module structure and action execution.
use std::io;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    lib::{
        errors::ProfileError,
        menu::{self, MenuSelector, SystemMenuRunner},
    },
    profiles::{ConfigStore, Profile, ProfileRegistry, ProfileRoots},
};

pub mod args;
pub mod exit;
pub mod launch;

pub use args::{LaunchArgs, RequestedAction};
pub use exit::RuntimeExit;
pub use launch::{resolve_config_path, LaunchSettings};

/// Run the requested action, then save the config once.
///
/// A failed save is logged as a warning and does not change the outcome.
/// Returns text for stdout, if the action produces any.
pub fn execute(settings: LaunchSettings) -> Result<Option<String>> {
    let roots = ProfileRoots::new(&settings.base_dirs, settings.profiles_root.clone());
    let mut registry = ProfileRegistry::new(roots, ConfigStore::new(settings.config_path.clone()));

    let outcome = run_action(&mut registry, &settings);

    if let Err(err) = registry.save() {
        warn!(
            target: "qutebrowser_profile::config",
            path = %settings.config_path.display(),
            reason = %err,
            "Configuration file was not saved"
        );
    }
    outcome
}

fn run_action(
    registry: &mut ProfileRegistry,
    settings: &LaunchSettings,
) -> Result<Option<String>> {
    match &settings.action {
        RequestedAction::List { json } => list_profiles(registry, *json),
        RequestedAction::Remove { name } => remove_profile(registry, name),
        RequestedAction::Load {
            name,
            create_missing,
        } => {
            let profile = load_profile(registry, name, *create_missing)?;
            launch_profile(registry, settings, &profile)?;
            Ok(None)
        }
        RequestedAction::Choose { allow_new } => {
            let names = registry.profile_names()?;
            let Some(name) = pick_profile(settings, &names, *allow_new)? else {
                info!(
                    target: "qutebrowser_profile::menu",
                    "No profile selected; nothing to launch"
                );
                return Ok(None);
            };
            let create_missing = *allow_new && !names.contains(&name);
            let profile = load_profile(registry, &name, create_missing)?;
            launch_profile(registry, settings, &profile)?;
            Ok(None)
        }
    }
}

fn list_profiles(registry: &mut ProfileRegistry, as_json: bool) -> Result<Option<String>> {
    let profiles = registry.list_profiles()?;
    if as_json {
        let payload: Vec<_> = profiles
            .iter()
            .map(|profile| {
                json!({
                    "name": profile.name(),
                    "base_directory": profile.base_directory().to_string_lossy(),
                    "args": profile.stored_args(),
                })
            })
            .collect();
        return Ok(Some(serde_json::to_string_pretty(&payload)?));
    }
    if profiles.is_empty() {
        return Ok(None);
    }
    let names: Vec<&str> = profiles.iter().map(Profile::name).collect();
    Ok(Some(names.join("\n")))
}

fn remove_profile(registry: &mut ProfileRegistry, name: &str) -> Result<Option<String>> {
    let report = registry
        .remove_profile(name)
        .with_context(|| format!("failed to remove profile `{name}`"))?;
    let status = if report.skipped.is_empty() {
        "removed"
    } else {
        "removed_with_skips"
    };

    let payload = json!({
        "status": status,
        "profile": name,
        "removed_links": report.removed_links,
        "removed_dirs": report.removed_dirs,
        "skipped": report.skipped,
    });
    Ok(Some(serde_json::to_string_pretty(&payload)?))
}

/// Look a profile up, creating it on `NoSuchProfile` when allowed.
fn load_profile(
    registry: &mut ProfileRegistry,
    name: &str,
    create_missing: bool,
) -> Result<Profile> {
    match registry.get_profile(name) {
        Ok(profile) => Ok(profile),
        Err(ProfileError::NoSuchProfile { .. }) if create_missing => registry
            .new_profile(name, Vec::new())
            .with_context(|| format!("failed to create profile `{name}`")),
        Err(err) => Err(err.into()),
    }
}

fn launch_profile(
    registry: &ProfileRegistry,
    settings: &LaunchSettings,
    profile: &Profile,
) -> Result<u32> {
    registry
        .launch(
            &settings.browser,
            profile,
            settings.browser_args.as_deref(),
            settings.show_output,
        )
        .with_context(|| format!("failed to launch profile `{}`", profile.name()))
}

fn pick_profile(
    settings: &LaunchSettings,
    names: &[String],
    allow_new: bool,
) -> Result<Option<String>> {
    match menu::select_menu_command(settings.menu_override.as_deref()) {
        MenuSelector::External(command) => {
            let argv = menu::build_menu_argv(&command, allow_new)?;
            Ok(menu::choose_profile_name(&SystemMenuRunner, &argv, names)?)
        }
        MenuSelector::Terminal => {
            let stdin = io::stdin();
            let choice =
                menu::prompt_terminal(&mut stdin.lock(), &mut io::stderr(), names, allow_new)
                    .context("failed to read profile choice from the terminal")?;
            Ok(choice)
        }
    }
}

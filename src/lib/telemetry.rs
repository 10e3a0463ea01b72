//! Telemetry initialization and structured launch events.

use std::path::Path;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize `tracing` and format developer logs on stderr.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
pub fn init_tracing(verbose: bool) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(env_filter)
        .with_target(verbose)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Payload describing one browser launch.
#[derive(Debug)]
pub struct LaunchTelemetry<'a> {
    pub profile: &'a str,
    pub base_directory: &'a Path,
    pub pid: u32,
    pub show_output: bool,
    pub argv: &'a [String],
}

/// Emit a spawned browser to `tracing`.
pub fn emit_launch(telemetry: &LaunchTelemetry<'_>) {
    info!(
        target: "qutebrowser_profile::launch",
        profile = telemetry.profile,
        base_directory = %telemetry.base_directory.display(),
        show_output = telemetry.show_output,
        argv = ?telemetry.argv,
        "Started browser process {}",
        telemetry.pid
    );
}

//! Entry point for qutebrowser-profile.
use std::process::ExitCode;

use clap::Parser;
use qutebrowser_profile::{
    cli::{execute, LaunchArgs, RuntimeExit},
    lib::telemetry,
};

fn main() -> ExitCode {
    match bootstrap() {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

fn bootstrap() -> Result<(), RuntimeExit> {
    let args = LaunchArgs::parse();
    telemetry::init_tracing(args.verbose).map_err(RuntimeExit::from_error)?;
    let settings = args.into_settings().map_err(RuntimeExit::from_error)?;

    if let Some(message) = execute(settings).map_err(RuntimeExit::from_error)? {
        println!("{message}");
    }
    Ok(())
}

//! Shared helpers for building browser invocations.

use std::{
    os::unix::process::CommandExt,
    path::Path,
    process::{Command, Stdio},
};

/// Flags that restore a named session; each consumes the following argument.
pub const RESTORE_FLAGS: [&str; 2] = ["--restore", "-r"];
/// Flags that disable session restore; they take no value.
pub const OVERRIDE_RESTORE_FLAGS: [&str; 2] = ["--override-restore", "-R"];

/// Build the full argument vector: `[browser, --basedir, <base>, args...]`.
pub fn build_browser_argv(browser_path: &str, base_dir: &Path, args: &[String]) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.len() + 3);
    argv.push(browser_path.to_string());
    argv.push("--basedir".to_string());
    argv.push(base_dir.to_string_lossy().into_owned());
    argv.extend(args.iter().cloned());
    argv
}

/// Drop session-restore flags (and the session name that follows a restore flag).
///
/// Session state is isolated per profile directory, so the browser's own
/// restore mechanism is suppressed. Survivors keep their relative order.
pub fn filter_restore_flags(args: Vec<String>) -> Vec<String> {
    let mut filtered = Vec::with_capacity(args.len());
    let mut skip_value = false;
    for arg in args {
        if skip_value {
            skip_value = false;
            continue;
        }
        if RESTORE_FLAGS.contains(&arg.as_str()) {
            skip_value = true;
            continue;
        }
        if OVERRIDE_RESTORE_FLAGS.contains(&arg.as_str()) {
            continue;
        }
        filtered.push(arg);
    }
    filtered
}

/// Build a detached browser `Command` from a non-empty argument vector.
///
/// With `show_output` unset all three standard streams go to the null device;
/// otherwise they are inherited. The child gets its own process group so
/// terminal signals aimed at this process do not reach the browser.
pub fn build_browser_command(argv: &[String], show_output: bool) -> Option<Command> {
    let (program, rest) = argv.split_first()?;
    let mut command = Command::new(program);
    command.args(rest);
    command.process_group(0);
    if show_output {
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
    } else {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    }
    Some(command)
}

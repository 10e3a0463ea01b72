//! Interactive profile picker: rofi/dmenu detection with a terminal fallback.

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::{debug, warn};

use crate::lib::errors::MenuError;

/// Prompt shown by the external menu.
pub const MENU_PROMPT: &str = "qutebrowser";

/// How the user will be asked to pick a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSelector {
    /// An external dmenu-compatible command line.
    External(String),
    /// No menu program available; ask on the terminal.
    Terminal,
}

/// Captured result of one menu invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOutput {
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Abstraction over running the menu process.
pub trait MenuRunner {
    /// Run `argv`, feed `input` on stdin, and wait for the process to exit.
    fn run(&self, argv: &[String], input: &str) -> io::Result<MenuOutput>;
}

/// Runner that spawns a real process.
pub struct SystemMenuRunner;

impl MenuRunner for SystemMenuRunner {
    fn run(&self, argv: &[String], input: &str) -> io::Result<MenuOutput> {
        let (program, rest) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty menu command"))?;
        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // A menu may exit before reading its input.
            match stdin.write_all(input.as_bytes()) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
                Err(err) => return Err(err),
            }
        }
        let output = child.wait_with_output()?;
        Ok(MenuOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Pick the menu to use: explicit override, else rofi, else dmenu, else the terminal.
pub fn select_menu_command(override_command: Option<&str>) -> MenuSelector {
    select_menu_command_with(override_command, |name| which::which(name).ok())
}

/// Menu selection with an injectable PATH lookup (testable helper).
pub fn select_menu_command_with(
    override_command: Option<&str>,
    find: impl Fn(&str) -> Option<PathBuf>,
) -> MenuSelector {
    if let Some(command) = override_command {
        return MenuSelector::External(command.to_string());
    }
    if let Some(rofi) = find("rofi") {
        return MenuSelector::External(format!(
            "{} -dmenu",
            shell_words::quote(&rofi.to_string_lossy())
        ));
    }
    if let Some(dmenu) = find("dmenu") {
        return MenuSelector::External(shell_words::quote(&dmenu.to_string_lossy()).into_owned());
    }
    MenuSelector::Terminal
}

/// Split a menu command line and append the picker arguments.
///
/// `-no-custom` is only understood by rofi, so it is added only when the
/// program is rofi and new names are not allowed.
pub fn build_menu_argv(command: &str, allow_new: bool) -> Result<Vec<String>, MenuError> {
    let mut argv = shell_words::split(command).map_err(|err| MenuError::InvalidCommand {
        command: command.to_string(),
        message: err.to_string(),
    })?;
    let is_rofi = match argv.first() {
        Some(program) => Path::new(program)
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with("rofi")),
        None => {
            return Err(MenuError::InvalidCommand {
                command: command.to_string(),
                message: "command is empty".into(),
            })
        }
    };
    argv.push("-p".into());
    argv.push(MENU_PROMPT.into());
    if !allow_new && is_rofi {
        argv.push("-no-custom".into());
    }
    Ok(argv)
}

/// Run the external menu and interpret its result.
///
/// Returns `Ok(None)` when the user made no selection: exit 0 with empty
/// output, or exit 1 with empty stderr (cancelled).
pub fn choose_profile_name(
    runner: &dyn MenuRunner,
    argv: &[String],
    candidates: &[String],
) -> Result<Option<String>, MenuError> {
    let command = shell_words::join(argv);
    let mut input = candidates.join("\n");
    input.push('\n');

    debug!(
        target: "qutebrowser_profile::menu",
        command = %command,
        candidates = candidates.len(),
        "Starting profile menu"
    );
    let output = runner.run(argv, &input).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => MenuError::Spawn {
            command: command.clone(),
            source,
        },
        _ => MenuError::Io {
            command: command.clone(),
            source,
        },
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    match output.exit_code {
        Some(0) => {
            if !stderr.is_empty() {
                warn!(
                    target: "qutebrowser_profile::menu",
                    command = %command,
                    stderr = %stderr,
                    "Menu reported errors but exited successfully"
                );
            }
            let choice = stdout.trim_end_matches(['\n', '\r']).trim();
            Ok((!choice.is_empty()).then(|| choice.to_string()))
        }
        Some(1) if stderr.is_empty() => Ok(None),
        exit_code => Err(MenuError::Failed {
            command,
            exit_code,
            stderr,
        }),
    }
}

/// Ask on the terminal when no menu program exists.
///
/// A number picks the matching candidate, a listed name picks itself, and any
/// other text is accepted only if `allow_new` is set. Empty input means no
/// selection.
pub fn prompt_terminal(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    candidates: &[String],
    allow_new: bool,
) -> io::Result<Option<String>> {
    for (index, name) in candidates.iter().enumerate() {
        writeln!(writer, "{:>3}) {name}", index + 1)?;
    }
    if allow_new {
        write!(writer, "Profile number or name (new names are created): ")?;
    } else {
        write!(writer, "Profile number or name: ")?;
    }
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    if let Ok(number) = answer.parse::<usize>() {
        if let Some(name) = number.checked_sub(1).and_then(|idx| candidates.get(idx)) {
            return Ok(Some(name.clone()));
        }
    }
    if allow_new || candidates.iter().any(|name| name == answer) {
        return Ok(Some(answer.to_string()));
    }
    writeln!(writer, "Unknown profile: {answer}")?;
    Ok(None)
}

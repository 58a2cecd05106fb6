use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

use base64::Engine;

use crate::error::ClipboardError;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

type CopyCommand = (&'static str, &'static [&'static str]);

/// Platform copy commands, tried in order.
const COPY_COMMANDS: &[CopyCommand] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Copies through whichever platform command exists, falling back to the
/// OSC 52 escape sequence when stderr is a terminal.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: &'static [CopyCommand],
    osc52_fallback: bool,
    stderr_is_terminal: fn() -> bool,
}

fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            commands: COPY_COMMANDS,
            osc52_fallback: true,
            stderr_is_terminal,
        }
    }

    /// Only use platform commands.
    pub fn commands_only() -> Self {
        Self {
            commands: COPY_COMMANDS,
            osc52_fallback: false,
            stderr_is_terminal,
        }
    }

    /// A clipboard with no working mechanism at all.
    #[cfg(test)]
    pub(crate) fn unavailable() -> Self {
        Self {
            commands: &[],
            osc52_fallback: true,
            stderr_is_terminal: || false,
        }
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = None;

        for &(program, args) in self.commands {
            match run_copy_command(program, args, text) {
                Ok(()) => {
                    tracing::debug!(program, "copied to clipboard");
                    return Ok(());
                }
                Err(CommandOutcome::Missing) => continue,
                Err(CommandOutcome::Failed(err)) => {
                    tracing::warn!(error = %err, "clipboard command failed");
                    last_error = Some(err);
                }
            }
        }

        // Nothing can receive the sequence unless stderr is the terminal
        if self.osc52_fallback {
            if (self.stderr_is_terminal)() {
                return osc52_copy(text);
            }
            tracing::debug!("stderr is not a terminal, skipping OSC 52");
        }

        Err(last_error.unwrap_or(ClipboardError::Unavailable))
    }
}

enum CommandOutcome {
    Missing,
    Failed(ClipboardError),
}

fn run_copy_command(program: &str, args: &[&str], text: &str) -> Result<(), CommandOutcome> {
    let failed = |reason: String| {
        CommandOutcome::Failed(ClipboardError::Command {
            command: program.to_string(),
            reason,
        })
    };

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CommandOutcome::Missing)
        }
        Err(err) => return Err(failed(err.to_string())),
    };

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|err| failed(err.to_string()))?;
    }

    let status = child.wait().map_err(|err| failed(err.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(failed(format!("exited with {}", status)))
    }
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

/// The TUI draws on stderr, so the sequence goes there too.
fn osc52_copy(text: &str) -> Result<(), ClipboardError> {
    let mut stderr = std::io::stderr();
    stderr
        .write_all(osc52_sequence(text).as_bytes())
        .and_then(|_| stderr.flush())
        .map_err(ClipboardError::Terminal)
}

//! Running an external program and capturing everything it prints.

use crate::error::{FlashError, Result};
use std::io::Write;
use std::process::{Command, ExitStatus};

/// Captured result of a successful external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub program: String,
    pub status: ExitStatus,
    /// stdout followed by stderr, lossily decoded.
    pub output: String,
}

impl CommandOutput {
    /// Writes the captured output, one tab-indented line at a time.
    pub fn print_indented<W: Write>(&self, mut out: W) {
        for line in self.output.lines() {
            let _ = writeln!(out, "\t{}", line);
        }
    }
}

/// Runs `cmd` to completion. Non-zero exit becomes [`FlashError::Command`]
/// carrying the captured output verbatim.
pub(crate) fn run_captured(mut cmd: Command) -> Result<CommandOutput> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!(command = ?cmd, "spawning");
    let out = cmd
        .output()
        .map_err(|e| FlashError::io(program.as_str(), e))?;

    let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&out.stderr));

    if !out.status.success() {
        tracing::warn!(%program, status = %out.status, "command failed");
        return Err(FlashError::Command {
            program,
            status: out.status,
            output,
        });
    }
    Ok(CommandOutput {
        program,
        status: out.status,
        output,
    })
}

// SPDX-License-Identifier: GPL-3.0-only

//! Helper process execution
//!
//! `ProcessRunner` is the seam between the ext4 operations and the helpers
//! they launch. `CommandRunner` spawns real children; tests substitute
//! runners that return canned exit statuses.

use nix::unistd::{AccessFlags, access};
use std::ffi::OsString;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// How a helper process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Normal termination with an exit code
    Exited(i32),
    /// Terminated by a signal
    Signaled(i32),
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` to completion.
    ///
    /// `Err` means the program could not be started at all; anything the
    /// program itself reports comes back as a `ProcessExit`.
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessExit>;

    /// Whether `program` exists and may be executed by this process
    fn is_executable(&self, program: &Path) -> bool {
        access(program, AccessFlags::X_OK).is_ok()
    }
}

/// Spawns helpers as child processes with stdin detached
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRunner;

impl ProcessRunner for CommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessExit> {
        debug!("Running {:?} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let tool = program
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| program.display().to_string());
        log_output(&tool, &output.stdout);
        log_output(&tool, &output.stderr);

        match (output.status.code(), output.status.signal()) {
            (Some(code), _) => Ok(ProcessExit::Exited(code)),
            (None, Some(signal)) => Ok(ProcessExit::Signaled(signal)),
            // Stopped/continued children are not reported by wait-to-exit.
            (None, None) => Ok(ProcessExit::Signaled(0)),
        }
    }
}

fn log_output(tool: &str, bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        debug!(tool = %tool, "{}", line);
    }
}

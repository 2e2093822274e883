// SPDX-License-Identifier: GPL-3.0-only

use nix::errno::Errno;
use std::path::PathBuf;
use storage_types::CheckOutcome;
use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("Mount of {device:?} on {target:?} failed: {errno}")]
    Mount {
        device: PathBuf,
        target: PathBuf,
        errno: Errno,
    },

    #[error("Mount options are {len} bytes, limit is {limit}")]
    OptionsTooLong { len: usize, limit: usize },

    #[error("Failed to launch {tool:?}: {reason}")]
    Launch { tool: PathBuf, reason: String },

    #[error("{tool:?} did not exit properly (signal {signal})")]
    AbnormalExit { tool: PathBuf, signal: i32 },

    #[error("{tool:?} failed with exit code {code}")]
    ExitCode { tool: PathBuf, code: i32 },

    #[error("Filesystem check of {device:?} failed: {outcome}")]
    CheckFailed {
        device: PathBuf,
        outcome: CheckOutcome,
    },
}

impl SysError {
    /// errno-style code for callers that only speak errno.
    ///
    /// Every helper-process failure collapses to `EIO`; kernel mount errors are
    /// passed through untouched.
    pub fn errno(&self) -> Errno {
        match self {
            Self::Mount { errno, .. } => *errno,
            Self::OptionsTooLong { .. } => Errno::EINVAL,
            Self::Launch { .. }
            | Self::AbnormalExit { .. }
            | Self::ExitCode { .. }
            | Self::CheckFailed { .. } => Errno::EIO,
        }
    }
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_failures_collapse_to_eio() {
        let errors = [
            SysError::Launch {
                tool: PathBuf::from("/system/bin/mke2fs"),
                reason: "No such file or directory".to_string(),
            },
            SysError::AbnormalExit {
                tool: PathBuf::from("/system/bin/mke2fs"),
                signal: 9,
            },
            SysError::ExitCode {
                tool: PathBuf::from("/system/bin/mke2fs"),
                code: 1,
            },
            SysError::CheckFailed {
                device: PathBuf::from("/dev/sdb1"),
                outcome: CheckOutcome::from_exit_code(4),
            },
        ];

        for error in errors {
            assert_eq!(error.errno(), Errno::EIO, "{error}");
        }
    }

    #[test]
    fn mount_errno_is_passed_through() {
        let error = SysError::Mount {
            device: PathBuf::from("/dev/sdb1"),
            target: PathBuf::from("/mnt/usb"),
            errno: Errno::EBUSY,
        };
        assert_eq!(error.errno(), Errno::EBUSY);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::path::Path;

use storage_types::{CheckFlag, CheckOutcome};
use tracing::{error, info, warn};

use super::Ext4;
use crate::error::{Result, SysError};
use crate::process::ProcessExit;

impl Ext4 {
    /// Run e2fsck in preen mode (`-p`) against `device`.
    ///
    /// Checking is best effort: a missing checker skips the check and
    /// succeeds. Errors the checker corrected are logged but do not fail the
    /// call; anything it left behind, or any failure of the checker itself,
    /// does.
    pub fn check(&self, device: &Path) -> Result<()> {
        let checker = &self.tools.checker;

        if !self.runner.is_executable(checker) {
            warn!(checker = %checker.display(), "Skipping fs checks");
            return Ok(());
        }

        let args = [OsString::from("-p"), device.as_os_str().to_owned()];
        let exit = self.runner.run(checker, &args).map_err(|e| {
            error!(device = %device.display(), "Failed to run e2fsck: {}", e);
            SysError::Launch {
                tool: checker.clone(),
                reason: e.to_string(),
            }
        })?;

        let code = match exit {
            ProcessExit::Exited(code) => code,
            ProcessExit::Signaled(signal) => {
                error!(
                    device = %device.display(),
                    "E2FSCK did not exit properly (signal {})",
                    signal
                );
                return Err(SysError::AbnormalExit {
                    tool: checker.clone(),
                    signal,
                });
            }
        };

        info!(device = %device.display(), "E2FSCK returned {}", code);
        let outcome = CheckOutcome::from_exit_code(code);

        if outcome.is_clean() {
            info!(device = %device.display(), "EXT4 filesystem check completed OK");
            return Ok(());
        }

        log_outcome(device, &outcome);

        if outcome.is_failure() {
            return Err(SysError::CheckFailed {
                device: device.to_path_buf(),
                outcome,
            });
        }

        Ok(())
    }
}

fn log_outcome(device: &Path, outcome: &CheckOutcome) {
    for flag in outcome.flags().iter() {
        match flag {
            CheckFlag::Corrected => info!(
                device = %device.display(),
                "EXT4 filesystem check completed, errors corrected OK"
            ),
            CheckFlag::RebootRequired => error!(
                device = %device.display(),
                "EXT4 filesystem check completed, errors corrected, need reboot"
            ),
            CheckFlag::Uncorrected => {
                error!(device = %device.display(), "EXT4 filesystem errors left uncorrected")
            }
            CheckFlag::OperationalError => {
                error!(device = %device.display(), "E2FSCK operational error")
            }
            CheckFlag::UsageError => {
                error!(device = %device.display(), "E2FSCK usage or syntax error")
            }
            CheckFlag::Cancelled => {
                error!(device = %device.display(), "E2FSCK canceled by user request")
            }
            CheckFlag::LibraryError => {
                error!(device = %device.display(), "E2FSCK shared library error")
            }
        }
    }
}

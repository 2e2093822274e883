// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::path::PathBuf;

use storage_types::FormatRequest;
use tracing::{error, info};

use super::Ext4;
use crate::error::{Result, SysError};
use crate::process::ProcessExit;

impl Ext4 {
    /// Create an ext4 filesystem on `request.device`.
    ///
    /// Without a mount point hint this is `mke2fs -j -T ext4 <device>`; with
    /// one it is `make_ext4fs -J -a <mount point> <device>`.
    pub fn format(&self, request: &FormatRequest) -> Result<()> {
        let (tool, args) = self.format_command(request);
        let device = &request.device;

        let exit = self.runner.run(&tool, &args).map_err(|e| {
            error!(
                device = %device.display(),
                "Filesystem (ext4) format failed to launch: {}",
                e
            );
            SysError::Launch {
                tool: tool.clone(),
                reason: e.to_string(),
            }
        })?;

        if exit.success() {
            info!(device = %device.display(), "Filesystem (ext4) formatted OK");
            return Ok(());
        }

        match exit {
            ProcessExit::Exited(code) => {
                error!(
                    device = %device.display(),
                    "Format (ext4) failed (unknown exit code {})",
                    code
                );
                Err(SysError::ExitCode { tool, code })
            }
            ProcessExit::Signaled(signal) => {
                error!(
                    device = %device.display(),
                    "Filesystem (ext4) format did not exit properly (signal {})",
                    signal
                );
                Err(SysError::AbnormalExit { tool, signal })
            }
        }
    }

    fn format_command(&self, request: &FormatRequest) -> (PathBuf, Vec<OsString>) {
        let device = request.device.as_os_str().to_owned();

        match request.mount_point() {
            None => (
                self.tools.generic_formatter.clone(),
                vec!["-j".into(), "-T".into(), "ext4".into(), device],
            ),
            Some(mount_point) => (
                self.tools.specialized_formatter.clone(),
                vec![
                    "-J".into(),
                    "-a".into(),
                    mount_point.as_os_str().to_owned(),
                    device,
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use nix::errno::Errno;

    use super::*;
    use crate::ext4::testing::{FakeMount, FakeRunner, Invocation, ext4_with, test_tools};

    const DEVICE: &str = "/dev/block/vold/179:65";

    #[test]
    fn without_hint_uses_mke2fs() {
        let runner = FakeRunner::exiting(0);
        let ext4 = ext4_with(runner.clone(), FakeMount::succeeding());

        ext4.format(&FormatRequest::new(DEVICE)).expect("format should succeed");

        assert_eq!(
            runner.invocations(),
            vec![Invocation {
                program: test_tools().generic_formatter,
                args: vec!["-j", "-T", "ext4", DEVICE]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }]
        );
    }

    #[test]
    fn with_hint_uses_make_ext4fs() {
        let runner = FakeRunner::exiting(0);
        let ext4 = ext4_with(runner.clone(), FakeMount::succeeding());

        ext4.format(&FormatRequest::new(DEVICE).with_mount_point("/data"))
            .expect("format should succeed");

        assert_eq!(
            runner.invocations(),
            vec![Invocation {
                program: test_tools().specialized_formatter,
                args: vec!["-J", "-a", "/data", DEVICE]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }]
        );
    }

    #[test]
    fn nonzero_exit_fails_with_eio() {
        for request in [
            FormatRequest::new(DEVICE),
            FormatRequest::new(DEVICE).with_mount_point("/data"),
        ] {
            let ext4 = ext4_with(FakeRunner::exiting(1), FakeMount::succeeding());
            let error = ext4.format(&request).unwrap_err();

            assert!(matches!(error, SysError::ExitCode { code: 1, .. }));
            assert_eq!(error.errno(), Errno::EIO);
        }
    }

    #[test]
    fn killed_formatter_fails_with_eio() {
        let ext4 = ext4_with(
            FakeRunner::answering(Ok(ProcessExit::Signaled(15))),
            FakeMount::succeeding(),
        );
        let error = ext4.format(&FormatRequest::new(DEVICE)).unwrap_err();

        assert!(matches!(error, SysError::AbnormalExit { signal: 15, .. }));
        assert_eq!(error.errno(), Errno::EIO);
    }

    #[test]
    fn launch_failure_fails_with_eio() {
        let ext4 = ext4_with(
            FakeRunner::answering(Err(io::ErrorKind::NotFound)),
            FakeMount::succeeding(),
        );
        let error = ext4.format(&FormatRequest::new(DEVICE)).unwrap_err();

        match &error {
            SysError::Launch { tool, .. } => assert_eq!(tool, &test_tools().generic_formatter),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(error.errno(), Errno::EIO);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! The kernel mount primitive

use nix::errno::Errno;
use nix::mount::MsFlags;
use std::path::Path;

/// One call to `mount(2)`
pub trait MountSyscall: Send + Sync {
    fn mount(
        &self,
        source: &Path,
        target: &Path,
        fs_type: &str,
        flags: MsFlags,
        data: &str,
    ) -> Result<(), Errno>;
}

/// Mounts through the real system call
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelMount;

impl MountSyscall for KernelMount {
    fn mount(
        &self,
        source: &Path,
        target: &Path,
        fs_type: &str,
        flags: MsFlags,
        data: &str,
    ) -> Result<(), Errno> {
        nix::mount::mount(Some(source), target, Some(fs_type), flags, Some(data))
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! ext4 volume operations
//!
//! `Ext4` bundles the helper locations with the two system seams it drives
//! (process launching and `mount(2)`). It keeps no state between calls, so
//! one instance can serve concurrent operations on distinct devices.

mod check;
mod format;
mod mount;

#[cfg(test)]
mod testing;

pub use mount::{mount_data, mount_flags};

use std::path::PathBuf;
use std::sync::Arc;

use storage_types::ToolPaths;
use tracing::debug;
use which::which;

use crate::kernel::{KernelMount, MountSyscall};
use crate::process::{CommandRunner, ProcessRunner};

pub struct Ext4 {
    tools: ToolPaths,
    runner: Arc<dyn ProcessRunner>,
    mounter: Arc<dyn MountSyscall>,
}

impl Ext4 {
    /// Real child processes and the real `mount(2)`
    pub fn new(tools: ToolPaths) -> Self {
        Self::with_backends(tools, Arc::new(CommandRunner), Arc::new(KernelMount))
    }

    pub fn with_backends(
        tools: ToolPaths,
        runner: Arc<dyn ProcessRunner>,
        mounter: Arc<dyn MountSyscall>,
    ) -> Self {
        Self {
            tools,
            runner,
            mounter,
        }
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }
}

impl std::fmt::Debug for Ext4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ext4").field("tools", &self.tools).finish()
    }
}

/// Locate the helpers through `PATH`, keeping `fallback` for any not found
pub fn resolve_tools_from_path(fallback: ToolPaths) -> ToolPaths {
    let lookup = |name: &str, default: PathBuf| match which(name) {
        Ok(path) => {
            debug!("Found {} at {:?}", name, path);
            path
        }
        Err(_) => default,
    };

    ToolPaths {
        checker: lookup("e2fsck", fallback.checker),
        generic_formatter: lookup("mke2fs", fallback.generic_formatter),
        specialized_formatter: lookup("make_ext4fs", fallback.specialized_formatter),
    }
}

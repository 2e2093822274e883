// SPDX-License-Identifier: GPL-3.0-only

//! Low-level ext4 volume operations
//!
//! This crate drives the pieces of an ext4 volume's lifecycle that happen
//! below any volume manager:
//! - Mounting through `mount(2)`, with a read-only fallback
//! - Consistency checks through e2fsck
//! - Formatting through mke2fs or make_ext4fs
//!
//! These operations require elevated privileges and block the calling thread
//! until the kernel call or helper process finishes.

pub mod error;
pub mod ext4;
pub mod kernel;
pub mod process;

pub use error::{Result, SysError};
pub use ext4::{Ext4, resolve_tools_from_path};
pub use kernel::{KernelMount, MountSyscall};
pub use process::{CommandRunner, ProcessExit, ProcessRunner};

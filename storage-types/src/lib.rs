// SPDX-License-Identifier: GPL-3.0-only

//! Canonical models for ext4 volume lifecycle operations
//!
//! These types are shared between the low-level operations in **storage-sys**
//! and whatever volume manager drives them:
//!
//! - `MountRequest` → everything needed to build one `mount(2)` call
//! - `FormatRequest` → device plus the optional mount-point hint that picks the formatter
//! - `CheckOutcome` → decoded exit status of the consistency checker
//! - `ToolPaths` → where the external helpers live
//!
//! None of these types carry state between operations.

pub mod check;
pub mod filesystem;
pub mod tools;

pub use check::{CheckFlag, CheckOutcome};
pub use filesystem::{
    EXT4_FS_TYPE, FormatRequest, MOUNT_DATA_CAPACITY, MountRequest, SDCARD_EXTERNAL_CONTEXT,
};
pub use tools::{DEFAULT_HELPER_PREFIX, ToolPaths};

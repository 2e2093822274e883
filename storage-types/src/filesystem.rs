// SPDX-License-Identifier: GPL-3.0-only

//! Mount and format request types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filesystem type handed to `mount(2)`
pub const EXT4_FS_TYPE: &str = "ext4";

/// Security label forced onto removable/external volumes
pub const SDCARD_EXTERNAL_CONTEXT: &str = "context=u:object_r:sdcard_external:s0";

/// Size of the mount data buffer, including the terminating NUL
pub const MOUNT_DATA_CAPACITY: usize = 1024;

/// Everything needed to mount one ext4 volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountRequest {
    /// Block device (or image) to mount
    pub source: PathBuf,

    /// Directory to mount onto
    pub target: PathBuf,

    /// Mount read-only
    #[serde(default)]
    pub read_only: bool,

    /// Change flags of an existing mount instead of creating a new one
    #[serde(default)]
    pub remount: bool,

    /// Allow execution of binaries from the volume
    #[serde(default)]
    pub executable: bool,

    /// Force the external-storage security context label
    #[serde(default)]
    pub force_context: bool,

    /// Caller-supplied comma separated options, passed through verbatim
    #[serde(default)]
    pub options: Option<String>,
}

impl MountRequest {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: false,
            remount: false,
            executable: false,
            force_context: false,
            options: None,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn remount(mut self, remount: bool) -> Self {
        self.remount = remount;
        self
    }

    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    pub fn force_context(mut self, force_context: bool) -> Self {
        self.force_context = force_context;
        self
    }

    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Caller options, treating an empty string the same as none
    pub fn extra_options(&self) -> Option<&str> {
        self.options.as_deref().filter(|options| !options.is_empty())
    }
}

/// Target of a format operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRequest {
    /// Device path to format
    pub device: PathBuf,

    /// Mount point the volume will live at. When present the specialized
    /// formatter is used and receives this as its auto-mode hint.
    #[serde(default)]
    pub mount_point: Option<PathBuf>,
}

impl FormatRequest {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            mount_point: None,
        }
    }

    pub fn with_mount_point(mut self, mount_point: impl Into<PathBuf>) -> Self {
        self.mount_point = Some(mount_point.into());
        self
    }

    pub fn mount_point(&self) -> Option<&Path> {
        self.mount_point.as_deref()
    }
}

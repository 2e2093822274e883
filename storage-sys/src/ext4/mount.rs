// SPDX-License-Identifier: GPL-3.0-only

use nix::errno::Errno;
use nix::mount::MsFlags;
use storage_types::{EXT4_FS_TYPE, MOUNT_DATA_CAPACITY, MountRequest, SDCARD_EXTERNAL_CONTEXT};
use tracing::{error, info, warn};

use super::Ext4;
use crate::error::{Result, SysError};

/// Flags for `request`: a fixed hardening base plus the requested modes
pub fn mount_flags(request: &MountRequest) -> MsFlags {
    let mut flags =
        MsFlags::MS_NOATIME | MsFlags::MS_NODEV | MsFlags::MS_NOSUID | MsFlags::MS_DIRSYNC;

    if !request.executable {
        flags |= MsFlags::MS_NOEXEC;
    }
    if request.read_only {
        flags |= MsFlags::MS_RDONLY;
    }
    if request.remount {
        flags |= MsFlags::MS_REMOUNT;
    }

    flags
}

/// Data string for `request`: caller options, then the forced context label.
///
/// Fails when the result would not fit the kernel's option buffer.
pub fn mount_data(request: &MountRequest) -> Result<String> {
    let mut data = request.extra_options().unwrap_or_default().to_string();

    if request.force_context {
        if !data.is_empty() {
            data.push(',');
        }
        data.push_str(SDCARD_EXTERNAL_CONTEXT);
    }

    // One byte of the buffer is reserved for the terminating NUL.
    if data.len() >= MOUNT_DATA_CAPACITY {
        return Err(SysError::OptionsTooLong {
            len: data.len(),
            limit: MOUNT_DATA_CAPACITY - 1,
        });
    }

    Ok(data)
}

impl Ext4 {
    /// Mount `request.source` on `request.target` as ext4.
    ///
    /// A volume whose medium turns out to be read-only (`EROFS`) is mounted
    /// read-only instead, with a single retry.
    pub fn mount(&self, request: &MountRequest) -> Result<()> {
        let flags = mount_flags(request);
        let data = mount_data(request).inspect_err(|e| {
            error!(device = %request.source.display(), "Refusing to mount: {}", e);
        })?;

        let mut result = self.mounter.mount(
            &request.source,
            &request.target,
            EXT4_FS_TYPE,
            flags,
            &data,
        );

        if result == Err(Errno::EROFS) {
            warn!(
                device = %request.source.display(),
                "Appears to be a read only filesystem - retrying mount RO"
            );
            result = self.mounter.mount(
                &request.source,
                &request.target,
                EXT4_FS_TYPE,
                flags | MsFlags::MS_RDONLY,
                &data,
            );
        }

        match result {
            Ok(()) => {
                info!(
                    device = %request.source.display(),
                    target = %request.target.display(),
                    "Mounted ext4 volume"
                );
                Ok(())
            }
            Err(errno) => {
                error!(
                    device = %request.source.display(),
                    target = %request.target.display(),
                    "Mount failed: {}",
                    errno
                );
                Err(SysError::Mount {
                    device: request.source.clone(),
                    target: request.target.clone(),
                    errno,
                })
            }
        }
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Locations of the external ext4 helpers

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory the helpers are installed under unless configured otherwise
pub const DEFAULT_HELPER_PREFIX: &str = "/system/bin";

const CHECKER_NAME: &str = "e2fsck";
const GENERIC_FORMATTER_NAME: &str = "mke2fs";
const SPECIALIZED_FORMATTER_NAME: &str = "make_ext4fs";

/// Paths of the consistency checker and the two formatters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// e2fsck, run as `<checker> -p <device>`
    pub checker: PathBuf,

    /// mke2fs, used when no mount point hint is given
    pub generic_formatter: PathBuf,

    /// make_ext4fs, used when a mount point hint is given
    pub specialized_formatter: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_HELPER_PREFIX)
    }
}

impl ToolPaths {
    /// All three helpers under one directory
    pub fn with_prefix(prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref();
        Self {
            checker: prefix.join(CHECKER_NAME),
            generic_formatter: prefix.join(GENERIC_FORMATTER_NAME),
            specialized_formatter: prefix.join(SPECIALIZED_FORMATTER_NAME),
        }
    }

    /// Parse a TOML document. Missing keys fall back to the default prefix.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid tool path configuration")
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tool configuration {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to load tool configuration {}", path.display()))
    }
}

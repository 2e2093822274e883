// SPDX-License-Identifier: GPL-3.0-only

//! Consistency checker exit status
//!
//! e2fsck reports its result as a sum of independent conditions rather than a
//! single code, so several of these can be set at once.

use enumflags2::{BitFlags, bitflags, make_bitflags};
use std::fmt;

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckFlag {
    /// Filesystem errors were found and corrected
    Corrected = 0b0000_0001,
    /// Errors were corrected but the system should be rebooted
    RebootRequired = 0b0000_0010,
    /// Errors remain on the filesystem
    Uncorrected = 0b0000_0100,
    /// The checker failed on its own
    OperationalError = 0b0000_1000,
    /// The checker was invoked with bad arguments
    UsageError = 0b0001_0000,
    /// The check was cancelled on user request
    Cancelled = 0b0010_0000,
    /// The checker hit a shared library error
    LibraryError = 0b1000_0000,
}

impl CheckFlag {
    /// Conditions that make the check as a whole fail
    pub const FAILURES: BitFlags<CheckFlag> = make_bitflags!(CheckFlag::{
        Uncorrected | OperationalError | UsageError | Cancelled | LibraryError
    });

    pub fn description(self) -> &'static str {
        match self {
            Self::Corrected => "errors corrected",
            Self::RebootRequired => "errors corrected, reboot required",
            Self::Uncorrected => "errors left uncorrected",
            Self::OperationalError => "operational error",
            Self::UsageError => "usage or syntax error",
            Self::Cancelled => "canceled by user request",
            Self::LibraryError => "shared library error",
        }
    }

    pub fn is_failure(self) -> bool {
        Self::FAILURES.contains(self)
    }
}

/// Decoded exit status of one checker run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOutcome {
    code: i32,
    flags: BitFlags<CheckFlag>,
}

impl CheckOutcome {
    /// Decode a normal exit code. Bits with no assigned meaning are dropped
    /// from `flags()` but kept in `code()`.
    pub fn from_exit_code(code: i32) -> Self {
        let flags = BitFlags::<CheckFlag>::from_bits_truncate((code & 0xff) as u8);
        Self { code, flags }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn flags(&self) -> BitFlags<CheckFlag> {
        self.flags
    }

    pub fn contains(&self, flag: CheckFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Exit status 0: nothing was found, nothing was done
    pub fn is_clean(&self) -> bool {
        self.code == 0
    }

    /// Failing conditions that are set
    pub fn failures(&self) -> BitFlags<CheckFlag> {
        self.flags & CheckFlag::FAILURES
    }

    pub fn is_failure(&self) -> bool {
        !self.failures().is_empty()
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit status {}", self.code)?;
        if self.flags.is_empty() {
            return Ok(());
        }

        let descriptions: Vec<&str> = self.flags.iter().map(CheckFlag::description).collect();
        write!(f, " ({})", descriptions.join(", "))
    }
}

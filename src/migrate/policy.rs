// src/migrate/policy.rs

//! Operator policies for a migration run
//!
//! Both policies are closed enums. The integer codes are the ones operators
//! already pass on the command line (`--keeporiginal`, `--copy2cb`).

use crate::error::{Error, Result};
use std::fmt;

/// What happens to the legacy activity after a successful migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Delete the legacy activity and its files (code 0)
    Remove,
    /// Leave the legacy activity untouched (code 1)
    #[default]
    Keep,
    /// Hide the legacy activity from students (code 2)
    Hide,
}

impl RetentionPolicy {
    /// Translate an external `--keeporiginal` code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Remove),
            1 => Ok(Self::Keep),
            2 => Ok(Self::Hide),
            _ => Err(Error::ConfigurationError(format!(
                "keeporiginal must be 0, 1 or 2 (got {code})"
            ))),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Remove => 0,
            Self::Keep => 1,
            Self::Hide => 2,
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove => write!(f, "remove original"),
            Self::Keep => write!(f, "keep original"),
            Self::Hide => write!(f, "hide original"),
        }
    }
}

/// Whether the package is also added to the content bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyPolicy {
    /// Do not touch the content bank (code 0)
    None,
    /// Copy into the content bank and make the activity's package an alias of it (code 1)
    #[default]
    LinkedCopy,
    /// Copy into the content bank as an independent entry (code 2)
    Copy,
}

impl CopyPolicy {
    /// Translate an external `--copy2cb` code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::LinkedCopy),
            2 => Ok(Self::Copy),
            _ => Err(Error::ConfigurationError(format!(
                "copy2cb must be 0, 1 or 2 (got {code})"
            ))),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::LinkedCopy => 1,
            Self::Copy => 2,
        }
    }
}

impl fmt::Display for CopyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "no content bank copy"),
            Self::LinkedCopy => write!(f, "content bank copy with link"),
            Self::Copy => write!(f, "content bank copy without link"),
        }
    }
}

//! Errors raised by the hook-file core (`block` and `installer`).
//!
//! The outer layers (config loading, repository discovery, the CLI) work in
//! `anyhow`; this enum is what they wrap when a hook file itself is the
//! problem.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid hook command: {0}")]
    InvalidInput(String),

    #[error("corrupt hook file {}: {reason}", .path.display())]
    CorruptHook { path: PathBuf, reason: String },
}

impl HookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

/// Failure of the pure block transforms, before a path is attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CorruptBlock(pub String);

impl CorruptBlock {
    pub(crate) fn at(self, path: impl Into<PathBuf>) -> HookError {
        HookError::CorruptHook {
            path: path.into(),
            reason: self.0,
        }
    }
}

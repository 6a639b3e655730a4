/*
 * Error Module
 *
 * Failures the simulation can report to its caller. Everything inside a frame
 * is infallible by construction; errors only come from building the working
 * set (bad parameters, buffers that cannot be reserved) or loading config.
 */

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("could not reserve {what} for {count} units")]
    Allocation {
        what: &'static str,
        count: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("could not read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("could not serialize config: {0}")]
    ConfigWrite(#[from] ron::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParam { name, reason: reason.into() }
    }
}

// Reserve exactly `count` slots up front so a frame never allocates.
pub(crate) fn reserve<T>(buffer: &mut Vec<T>, count: usize, what: &'static str) -> Result<()> {
    buffer
        .try_reserve_exact(count)
        .map_err(|source| Error::Allocation { what, count, source })
}

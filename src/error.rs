//! Errors of the urn simulation

use std::path::PathBuf;

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("an urn needs at least one ball")]
    EmptyUrn,

    #[error("initial left count {initial_left} is larger than the number of balls {balls}")]
    InitialCountOutOfRange { initial_left: usize, balls: usize },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::Format;

/// Errors reported by the generator, the format codec, and the base-62 codec.
#[derive(Debug, Error)]
pub enum Error {
    /// The format token is not one of `default`, `compact`, `urn` or `teenie`.
    #[error("invalid UUID format {0:?}")]
    InvalidFormat(String),

    /// The value does not have the shape of the declared source format.
    #[error("invalid UUID {0:?}")]
    InvalidInput(String),

    /// The string is not a base-62 encoding of an unsigned 64-bit integer.
    #[error("invalid base-62 encoding {0:?}")]
    InvalidEncoding(String),

    /// Translation requested from a format to itself.
    #[error("source and target format are both {0}")]
    NoopTranslation(Format),

    /// No node identifier could be resolved for a fresh generator.
    #[error("node identifier unavailable")]
    NodeIdentityUnavailable,

    /// The state file could not be read or written.
    #[error("state file {} unavailable: {source}", path.display())]
    PersistenceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

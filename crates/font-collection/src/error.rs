//! Error types for collection assembly.

use std::result;

use read_fonts::{ReadError, types::Tag};

/// Errors that can occur while building a collection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font #{index}: {source}")]
    Parse {
        index: usize,
        #[source]
        source: ReadError,
    },

    #[error("a collection needs at least one font")]
    Empty,

    #[error("font #{index} lists table {tag} but its data is out of bounds")]
    MissingTable { index: usize, tag: Tag },

    #[error("collection exceeds the sfnt limits (32-bit offsets, 4095 tables per font)")]
    TooLarge,
}

pub type Result<T> = result::Result<T, Error>;

//! Error taxonomy shared by every module in the crate.

use thiserror::Error;

/// The crate's result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building, sorting or moving tensor
/// data around.
#[derive(Error, Debug)]
pub enum Error {
    /// A precondition was violated: an out-of-range dimension, a buffer
    /// length mismatch, a configuration value outside its allowed range, a
    /// sample request exceeding the domain size, or a partition count
    /// exceeding a dimension's size. Detectable without performing I/O.
    #[error("bad input: {0}")]
    BadInput(String),

    /// An I/O failure while reading or writing a blob (see [`crate::disk`]).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An unrecoverable internal failure: an invariant was violated that
    /// the core cannot continue past (for example a descriptor whose
    /// summed bit widths exceed the machine word).
    #[error("fatal: {0}")]
    Fatal(String),
}

impl Error {
    pub(crate) fn bad_input(msg: impl Into<String>) -> Self {
        Error::BadInput(msg.into())
    }

    pub(crate) fn fatal(msg: impl Into<String>) -> Self {
        Error::Fatal(msg.into())
    }
}

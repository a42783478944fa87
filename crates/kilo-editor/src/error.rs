//! Editor errors.
//!
//! Both variants are fatal: the binary clears the screen, prints the
//! message, and exits with status 1.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A fatal editor failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The file named on the command line could not be opened or read.
    #[error("fopen: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A terminal failure.
    #[error(transparent)]
    Term(#[from] kilo_term::Error),
}

/// Result alias for the editor core.
pub type Result<T> = std::result::Result<T, Error>;

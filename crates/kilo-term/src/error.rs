// SPDX-License-Identifier: MIT
//
// Terminal-layer errors.
//
// Every failure here is fatal to the session. The "no byte within the read
// timeout" condition is not an error; it surfaces as `Ok(None)` from
// `ReadByte::read_byte`, and incomplete escape sequences degrade to an
// `Escape` key inside the decoder.

use std::io;

use thiserror::Error;

/// A fatal terminal failure.
#[derive(Debug, Error)]
pub enum Error {
    /// An OS-level call on the terminal device failed.
    ///
    /// `op` names the call (`tcgetattr`, `tcsetattr`, `ioctl`, `read`,
    /// `write`) so the diagnostic reads like `perror` output.
    #[error("{op}: {source}")]
    Os {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// The terminal's cursor-position report could not be parsed into
    /// two positive integers.
    #[error("getWindowSize: unparseable cursor position report")]
    CursorReport,
}

impl Error {
    /// Wrap an I/O error from the named OS call.
    #[must_use]
    pub const fn os(op: &'static str, source: io::Error) -> Self {
        Self::Os { op, source }
    }
}

/// Result alias for the terminal layer.
pub type Result<T> = std::result::Result<T, Error>;

//! Content buffer — the rows kilo displays.
//!
//! Rows are opaque byte sequences without their line terminator, kept in
//! load order, which is also display order. Storage is a growable `Vec` of
//! rows even though only the first line of a file is loaded today.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of text, without `\n` or `\r`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
}

impl Row {
    /// Build a row from raw bytes, stripping any trailing line terminators.
    #[must_use]
    pub fn new(mut chars: Vec<u8>) -> Self {
        while matches!(chars.last(), Some(b'\n' | b'\r')) {
            chars.pop();
        }
        Self { chars }
    }

    /// The row's bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True if the row has no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ContentBuffer
// ---------------------------------------------------------------------------

/// Ordered rows of loaded text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBuffer {
    rows: Vec<Row>,
}

impl ContentBuffer {
    /// An empty buffer. The renderer shows the banner for it.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Load the first line of the file at `path`.
    ///
    /// An empty file gives an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened or read.
    pub fn open(path: &Path) -> Result<Self> {
        let open_err = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_err)?;
        let buffer = Self::from_reader(BufReader::new(file)).map_err(open_err)?;
        info!(path = %path.display(), rows = buffer.len(), "file loaded");
        Ok(buffer)
    }

    /// Load the first line from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns any read error from `reader`.
    pub fn from_reader(mut reader: impl BufRead) -> io::Result<Self> {
        let mut line = Vec::new();
        let mut buffer = Self::new();
        if reader.read_until(b'\n', &mut line)? > 0 {
            buffer.append_row(Row::new(line));
        }
        Ok(buffer)
    }

    /// Append a row at the end.
    pub fn append_row(&mut self, row: Row) {
        debug!(len = row.len(), "row appended");
        self.rows.push(row);
    }

    /// The row at `index`, if any.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows are loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// SPDX-License-Identifier: MIT
//
// Viewport discovery.
//
// The size is sampled once at startup and never refreshed: kilo does not
// track SIGWINCH. The primary path is the TIOCGWINSZ ioctl. Some terminals
// answer that with zeros (or not at all), so the fallback parks the cursor
// in the bottom-right corner and asks the terminal where it ended up.

use std::io::Write;

use tracing::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::terminal::Tty;

/// Upper bound on the cursor-position reply, including the final `R`.
const REPLY_CAPACITY: usize = 32;

// ─── Viewport ───────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    rows: u16,
    cols: u16,
}

impl Viewport {
    /// Build a viewport, rejecting a zero dimension.
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            Some(Self { rows, cols })
        }
    }

    /// Number of rows (height in character cells).
    #[inline]
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }

    /// Number of columns (width in character cells).
    #[inline]
    #[must_use]
    pub const fn cols(self) -> u16 {
        self.cols
    }
}

// ─── Probe ──────────────────────────────────────────────────────────────────

/// Determine the viewport of `tty`.
///
/// Tries the driver's window-size query first. If that fails or reports a
/// zero dimension, moves the cursor to the far corner and parses the
/// terminal's cursor-position report instead.
///
/// # Errors
///
/// Returns [`Error::Os`] if writing the fallback queries or reading the
/// reply fails, and [`Error::CursorReport`] if the reply is not
/// `ESC [ <rows> ; <cols> R` with two positive integers.
pub fn probe<T: Tty>(tty: &mut T) -> Result<Viewport> {
    match tty.window_size() {
        Ok(Some(viewport)) => {
            debug!(rows = viewport.rows, cols = viewport.cols, "viewport from ioctl");
            return Ok(viewport);
        }
        Ok(None) => warn!("window size query reported a zero dimension, asking the terminal"),
        Err(e) => warn!(error = %e, "window size query failed, asking the terminal"),
    }

    ansi::cursor_to_far_corner(tty).map_err(|e| Error::os("write", e))?;
    let viewport = cursor_position(tty)?;
    debug!(rows = viewport.rows, cols = viewport.cols, "viewport from cursor report");
    Ok(viewport)
}

/// Request and read the cursor-position report.
fn cursor_position<T: Tty>(tty: &mut T) -> Result<Viewport> {
    ansi::request_cursor_position(tty).map_err(|e| Error::os("write", e))?;
    tty.flush().map_err(|e| Error::os("write", e))?;

    let mut reply = Vec::with_capacity(REPLY_CAPACITY);
    while reply.len() < REPLY_CAPACITY - 1 {
        match tty.read_byte().map_err(|e| Error::os("read", e))? {
            None | Some(b'R') => break,
            Some(b) => reply.push(b),
        }
    }

    parse_cursor_report(&reply).ok_or(Error::CursorReport)
}

/// Parse a cursor-position report body: `ESC [ <rows> ; <cols>`, with or
/// without the trailing `R`.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Viewport> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let (rows, cols) = std::str::from_utf8(body).ok()?.split_once(';')?;
    Viewport::new(rows.parse().ok()?, cols.parse().ok()?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

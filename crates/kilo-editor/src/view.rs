//! View — composes one full frame from the editor state.
//!
//! The frame is built top to bottom in a fresh [`FrameBuffer`]:
//!
//! ```text
//! hide cursor, cursor home
//! for each screen row:
//!     row text (truncated to the width)    if the buffer has that row
//!     banner line                          if the buffer is empty and y == rows / 3
//!     "~"                                  otherwise
//!     erase to end of line, "\r\n" (not after the last row)
//! cursor to (row + 1, col + 1), show cursor
//! ```
//!
//! Rows are never wrapped. Hiding the cursor while drawing avoids the
//! cursor flickering across the screen as the frame is written.

use kilo_term::ansi;
use kilo_term::output::FrameBuffer;
use kilo_term::viewport::Viewport;

use crate::buffer::ContentBuffer;
use crate::cursor::Cursor;

/// Welcome line shown a third of the way down when nothing is loaded.
pub const BANNER: &str = concat!(
    "Kilo editor -- version ",
    env!("CARGO_PKG_VERSION"),
    " - Exit = Ctrl + K"
);

/// Placeholder drawn on screen rows past the end of the buffer.
const EMPTY_ROW_MARKER: &[u8] = b"~";

/// Compose a complete frame into `frame`.
///
/// Writing to a [`FrameBuffer`] cannot fail, so the encoder results are
/// discarded.
pub fn draw(frame: &mut FrameBuffer, content: &ContentBuffer, cursor: Cursor, viewport: Viewport) {
    ansi::cursor_hide(frame).ok();
    ansi::cursor_home(frame).ok();

    draw_rows(frame, content, viewport);

    ansi::cursor_to(frame, cursor.row(), cursor.col()).ok();
    ansi::cursor_show(frame).ok();
}

fn draw_rows(frame: &mut FrameBuffer, content: &ContentBuffer, viewport: Viewport) {
    let rows = viewport.rows();
    let cols = usize::from(viewport.cols());

    for y in 0..rows {
        match content.row(usize::from(y)) {
            Some(row) => {
                let text = row.as_bytes();
                frame.push(&text[..text.len().min(cols)]);
            }
            None if content.is_empty() && y == rows / 3 => draw_banner(frame, cols),
            None => frame.push(EMPTY_ROW_MARKER),
        }

        ansi::erase_line(frame).ok();
        if y + 1 < rows {
            frame.push(b"\r\n");
        }
    }
}

/// Center [`BANNER`] in `cols` cells. The first padding cell carries the
/// row marker so the left edge stays continuous.
fn draw_banner(frame: &mut FrameBuffer, cols: usize) {
    let banner = &BANNER.as_bytes()[..BANNER.len().min(cols)];
    let mut padding = (cols - banner.len()) / 2;

    if padding > 0 {
        frame.push(EMPTY_ROW_MARKER);
        padding -= 1;
    }
    frame.push_repeated(b' ', padding);
    frame.push(banner);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Editor — the state value the event loop drives.
//!
//! One `Editor` is built at startup from the sampled viewport and the loaded
//! content, then handed to the event loop by `&mut`. Key dispatch:
//!
//! | Key                  | Effect                                        |
//! |----------------------|-----------------------------------------------|
//! | quit chord (`Ctrl-K`) | quit                                         |
//! | arrows               | move one cell, clamped to the viewport        |
//! | `Home` / `End`       | column 0 / last column                        |
//! | `PageUp` / `PageDown`| `rows` single-cell moves up / down            |
//! | anything else        | ignored                                       |

use kilo_term::event_loop::{Action, App};
use kilo_term::input::{KeyEvent, ctrl};
use kilo_term::output::FrameBuffer;
use kilo_term::viewport::Viewport;
use tracing::debug;

use crate::buffer::ContentBuffer;
use crate::cursor::{Cursor, Direction};
use crate::view;

/// The default quit chord: `Ctrl-K`.
pub const QUIT_KEY: KeyEvent = KeyEvent::Control(ctrl(b'k'));

/// Editor state: viewport, cursor, and content.
#[derive(Debug, Clone)]
pub struct Editor {
    viewport: Viewport,
    cursor: Cursor,
    content: ContentBuffer,
    quit_key: KeyEvent,
}

impl Editor {
    /// Create an editor with the cursor at the origin.
    #[must_use]
    pub const fn new(viewport: Viewport, content: ContentBuffer) -> Self {
        Self {
            viewport,
            cursor: Cursor::ORIGIN,
            content,
            quit_key: QUIT_KEY,
        }
    }

    /// Use a different quit chord.
    #[must_use]
    pub fn with_quit_key(mut self, key: KeyEvent) -> Self {
        self.quit_key = key;
        self
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn content(&self) -> &ContentBuffer {
        &self.content
    }

    /// Apply one key to the editor state.
    pub fn process_key(&mut self, key: KeyEvent) -> Action {
        if key == self.quit_key {
            return Action::Quit;
        }

        let viewport = self.viewport;
        match key {
            KeyEvent::ArrowUp => self.cursor.step(Direction::Up, viewport),
            KeyEvent::ArrowDown => self.cursor.step(Direction::Down, viewport),
            KeyEvent::ArrowLeft => self.cursor.step(Direction::Left, viewport),
            KeyEvent::ArrowRight => self.cursor.step(Direction::Right, viewport),
            KeyEvent::Home => self.cursor.line_start(),
            KeyEvent::End => self.cursor.line_end(viewport),
            KeyEvent::PageUp => self.cursor.step_n(Direction::Up, viewport.rows(), viewport),
            KeyEvent::PageDown => self.cursor.step_n(Direction::Down, viewport.rows(), viewport),
            _ => {
                debug!(?key, "key ignored");
                return Action::Continue;
            }
        }

        debug!(row = self.cursor.row(), col = self.cursor.col(), "cursor moved");
        Action::Continue
    }
}

impl App for Editor {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        self.process_key(key)
    }

    fn paint(&self, frame: &mut FrameBuffer) {
        view::draw(frame, &self.content, self.cursor, self.viewport);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

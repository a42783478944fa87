// SPDX-License-Identifier: MIT
//
// Event loop — render, read one key, dispatch, repeat.
//
// Single-threaded and synchronous. The only place the loop waits is the
// key read, and every read on the device returns within the raw-mode
// timeout, so the loop is never stuck in the kernel for longer than that.
// There is no tick and no redraw without input: a frame is painted, then
// the loop waits for exactly one key.
//
// The loop owns the `TerminalSession`. Quitting clears the screen and
// restores the terminal explicitly; any error unwinds through `?` and the
// session's `Drop` restores it instead. Either way it happens once.

use std::io::Write;

use tracing::info;

use crate::ansi;
use crate::error::{Error, Result};
use crate::input::{self, KeyEvent};
use crate::output::FrameBuffer;
use crate::terminal::{TerminalSession, Tty};
use crate::viewport::{self, Viewport};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Clear the screen, restore the terminal, and return.
    Quit,
}

/// Application interface for the event loop.
///
/// Each cycle the loop calls [`paint`](App::paint) into an empty frame,
/// writes the frame, reads one key and hands it to
/// [`on_key`](App::on_key).
pub trait App {
    /// Handle one decoded key.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// Compose the complete frame. The buffer is empty on entry.
    fn paint(&self, frame: &mut FrameBuffer);
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// ```no_run
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::input::KeyEvent;
/// use kilo_term::output::FrameBuffer;
/// use kilo_term::terminal::PosixTty;
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key == KeyEvent::Char(b'q') {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&self, frame: &mut FrameBuffer) {
///         frame.push(b"press q");
///     }
/// }
///
/// let mut event_loop = EventLoop::new(PosixTty::new())?;
/// event_loop.run(&mut MyApp)?;
/// # Ok::<(), kilo_term::Error>(())
/// ```
pub struct EventLoop<T: Tty> {
    session: TerminalSession<T>,
    viewport: Viewport,
    frame: FrameBuffer,
}

impl<T: Tty> EventLoop<T> {
    /// Enter raw mode on `tty` and sample the viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered or the viewport
    /// cannot be determined. In the latter case the terminal has already
    /// been restored when this returns.
    pub fn new(tty: T) -> Result<Self> {
        let mut session = TerminalSession::enter(tty)?;
        let viewport = viewport::probe(session.tty_mut())?;
        info!(
            rows = viewport.rows(),
            cols = viewport.cols(),
            "event loop ready"
        );

        Ok(Self {
            session,
            viewport,
            frame: FrameBuffer::new(),
        })
    }

    /// The viewport sampled at startup.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the terminal is still in raw mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// # Errors
    ///
    /// Returns the first write or read failure. The loop does not retry.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        loop {
            self.render(&*app)?;
            let key = input::read_key(self.session.tty_mut())?;
            if app.on_key(key) == Action::Quit {
                return self.quit();
            }
        }
    }

    /// Paint one frame and write it in a single call.
    fn render(&mut self, app: &impl App) -> Result<()> {
        self.frame.clear();
        app.paint(&mut self.frame);
        self.frame
            .flush_to(self.session.tty_mut())
            .map_err(|e| Error::os("write", e))
    }

    fn quit(&mut self) -> Result<()> {
        info!("quit requested");
        let tty = self.session.tty_mut();
        let cleared = match ansi::clear_screen(&mut *tty) {
            Ok(()) => ansi::cursor_home(&mut *tty),
            Err(e) => Err(e),
        };
        cleared
            .and_then(|()| tty.flush())
            .map_err(|e| Error::os("write", e))?;
        self.session.restore()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

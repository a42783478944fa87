// SPDX-License-Identifier: MIT
//
// Terminal control — the device abstraction, raw mode, and RAII restore.
//
// Safety: `PosixTty` necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and raw fd reads and writes. These are
// the standard POSIX interfaces for terminal control and there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `TerminalSession` owns the terminal's mode for the whole process. It
// captures the original attributes, applies raw mode, and restores the
// original attributes exactly once: on an explicit `restore()` or, failing
// that, when the guard is dropped. Early returns and `?` propagation in the
// editor therefore all pass through the restore.
//
// A session that failed to enter holds no captured mode, so it never tries
// to restore anything.

use std::io;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::viewport::Viewport;

// ─── Device traits ──────────────────────────────────────────────────────────

/// A byte source with a bounded read timeout.
pub trait ReadByte {
    /// Read a single byte.
    ///
    /// Returns `Ok(None)` when no byte arrived within the device's read
    /// timeout. That is the normal idle outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails for any other reason.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// A terminal device: timed byte input, byte output, mode control, and a
/// geometry query.
pub trait Tty: ReadByte + io::Write {
    /// Opaque snapshot of the device's line discipline settings.
    type Mode;

    /// Capture the current mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be read.
    fn get_mode(&self) -> io::Result<Self::Mode>;

    /// Derive the raw-mode settings from an original snapshot.
    fn raw_mode(&self, original: &Self::Mode) -> Self::Mode;

    /// Apply a mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be applied.
    fn set_mode(&self, mode: &Self::Mode) -> io::Result<()>;

    /// Ask the device driver for the window geometry.
    ///
    /// Returns `Ok(None)` when the driver answers but reports a zero
    /// dimension, which some terminals do.
    ///
    /// # Errors
    ///
    /// Returns an error if the query itself fails.
    fn window_size(&self) -> io::Result<Option<Viewport>>;
}

// ─── PosixTty ───────────────────────────────────────────────────────────────

/// The controlling terminal: stdin for input and mode, stdout for output.
///
/// Output goes straight to fd 1 with `write(2)`, bypassing the line
/// buffering of [`io::Stdout`], so a frame handed to `write_all` leaves in
/// a single syscall whenever the terminal accepts it whole.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct PosixTty {
    _private: (),
}

#[cfg(unix)]
impl PosixTty {
    /// Handle to the process's standard terminal streams.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(unix)]
impl ReadByte for PosixTty {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            // VMIN=0 / VTIME=1: the read timed out with nothing to deliver.
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(unix)]
impl io::Write for PosixTty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(libc::STDOUT_FILENO, buf.as_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing is buffered on our side of the fd.
        Ok(())
    }
}

#[cfg(unix)]
impl Tty for PosixTty {
    type Mode = libc::termios;

    fn get_mode(&self) -> io::Result<libc::termios> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(termios)
        }
    }

    fn raw_mode(&self, original: &libc::termios) -> libc::termios {
        let mut raw = *original;

        // No break signal, no CR→LF, no parity check, no 8th-bit strip,
        // no XON/XOFF.
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        // No NL→CRLF post-processing.
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        // No echo, no canonical mode, no Ctrl-V literal, no signals.
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

        // VMIN=0, VTIME=1: read() returns after at most 100ms.
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 1;

        raw
    }

    fn set_mode(&self, mode: &libc::termios) -> io::Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, mode) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn window_size(&self) -> io::Result<Option<Viewport>> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(Viewport::new(ws.ws_row, ws.ws_col))
    }
}

// ─── TerminalSession ────────────────────────────────────────────────────────

/// Raw-mode guard over a [`Tty`].
///
/// [`enter`](Self::enter) switches the device to raw mode and returns the
/// guard. The original mode comes back on [`restore`](Self::restore) or on
/// drop, whichever happens first; the second attempt is a no-op.
///
/// ```no_run
/// use kilo_term::terminal::{PosixTty, TerminalSession};
///
/// let mut session = TerminalSession::enter(PosixTty::new())?;
/// // ... draw, read keys ...
/// session.restore()?;
/// # Ok::<(), kilo_term::Error>(())
/// ```
pub struct TerminalSession<T: Tty> {
    tty: T,
    /// Attributes captured before entering raw mode. `None` once restored.
    original: Option<T::Mode>,
}

impl<T: Tty> TerminalSession<T> {
    /// Capture the device's current mode and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Os`] if the attributes cannot be read
    /// (`tcgetattr`) or the raw attributes cannot be applied (`tcsetattr`).
    /// In both cases nothing needs restoring and the device is dropped.
    pub fn enter(tty: T) -> Result<Self> {
        let original = tty.get_mode().map_err(|e| Error::os("tcgetattr", e))?;
        let raw = tty.raw_mode(&original);
        tty.set_mode(&raw).map_err(|e| Error::os("tcsetattr", e))?;

        info!("terminal entered raw mode");
        Ok(Self {
            tty,
            original: Some(original),
        })
    }

    /// Whether the original mode is still waiting to be restored.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.original.is_some()
    }

    /// The underlying device.
    #[inline]
    pub const fn tty_mut(&mut self) -> &mut T {
        &mut self.tty
    }

    /// Reapply the captured original mode.
    ///
    /// Only the first call touches the device. The captured mode is
    /// consumed before the attempt, so a failed restore is not retried.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Os`] if `tcsetattr` fails.
    pub fn restore(&mut self) -> Result<()> {
        let Some(original) = self.original.take() else {
            debug!("terminal restore skipped: already restored");
            return Ok(());
        };

        self.tty
            .set_mode(&original)
            .map_err(|e| Error::os("tcsetattr", e))?;
        info!("terminal mode restored");
        Ok(())
    }
}

impl<T: Tty> Drop for TerminalSession<T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal mode on drop");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// kilo — a minimal raw-mode terminal text viewer.
//
// This is the main binary that wires the crates together:
//
//   kilo-term   → raw mode, viewport probe, key decoding, event loop
//   kilo-editor → content buffer, cursor, frame composition
//
// Each cycle flows through:
//
//   Editor::paint → view::draw → frame buffer → one write → terminal
//   stdin → read_key → Editor::on_key → cursor mutation
//
// Usage: `kilo [FILE]`. With a file, its first line is shown; without one,
// the welcome banner. `Ctrl-K` quits with status 0. Any terminal or file
// failure clears the screen, prints the reason to stderr, and exits with
// status 1.
//
// Logging is off unless `KILO_LOG` names a file to append to. The filter
// comes from `KILO_LOG_FILTER` (default `info`). Logs never go to the
// terminal the editor draws on.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use kilo_editor::Error;
use kilo_editor::buffer::ContentBuffer;
use kilo_editor::editor::Editor;
use kilo_term::ansi;
use kilo_term::event_loop::EventLoop;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install a file-backed subscriber if `KILO_LOG` is set.
///
/// A log file that cannot be opened just leaves logging off; it is not
/// worth refusing to start the editor over.
fn init_logging() {
    let Some(path) = env::var_os("KILO_LOG") else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_env("KILO_LOG_FILTER").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// ─── Run ────────────────────────────────────────────────────────────────────

/// Enter raw mode, load the file, and run until quit.
///
/// The event loop owns the terminal session, so every return from here,
/// including each `?`, restores the terminal.
#[cfg(unix)]
fn run(path: Option<PathBuf>) -> kilo_editor::Result<()> {
    use kilo_term::terminal::PosixTty;

    let mut event_loop = EventLoop::new(PosixTty::new())?;

    let content = match path.as_deref() {
        Some(path) => ContentBuffer::open(path)?,
        None => ContentBuffer::new(),
    };

    let mut editor = Editor::new(event_loop.viewport(), content);
    event_loop.run(&mut editor)?;
    Ok(())
}

#[cfg(not(unix))]
fn run(_path: Option<PathBuf>) -> kilo_editor::Result<()> {
    Err(kilo_term::Error::os("tcgetattr", io::Error::from(io::ErrorKind::Unsupported)).into())
}

/// Clear the screen, report `e` on stderr, and exit with status 1.
fn die(e: &Error) -> ! {
    let mut stdout = io::stdout().lock();
    let _ = ansi::clear_screen(&mut stdout);
    let _ = ansi::cursor_home(&mut stdout);
    let _ = stdout.flush();
    drop(stdout);

    eprintln!("kilo: {e}");
    process::exit(1);
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    init_logging();

    let path = env::args_os().nth(1).map(PathBuf::from);
    info!(path = ?path, "kilo starting");

    if let Err(e) = run(path) {
        error!(error = %e, "fatal");
        die(&e);
    }

    info!("kilo exiting");
}

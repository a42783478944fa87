// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal layer for kilo.
//
// Everything that touches the terminal device lives here: entering and
// restoring raw mode, discovering the viewport, decoding raw input bytes
// into keys, and writing each frame with a single write call.
//
// Device access goes through the `Tty` trait so the session guard, the
// geometry probe and the key decoder can be driven by scripted input in
// tests. `PosixTty` is the real device, built on raw termios.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod terminal;
pub mod viewport;

#[cfg(test)]
mod fake;

pub use error::{Error, Result};

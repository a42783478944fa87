// SPDX-License-Identifier: MIT
//
// Key decoding.
//
// Turns raw input bytes into one `KeyEvent` per call. Plain bytes map
// directly; the ESC byte starts a small state machine that recognizes the
// cursor and editing keys terminals send as escape sequences:
//
//   ESC [ A | B | C | D        arrows
//   ESC [ H | F                Home / End
//   ESC O H | F                Home / End (SS3 form)
//   ESC [ <digit> ~            Home, Delete, End, PageUp, PageDown
//
// Every read inside a sequence uses the device's bounded timeout. A
// timeout or an unexpected byte mid-sequence yields `Escape`; that is an
// ordinary outcome and never an error. Only a failing read is an error.
//
// The decoder keeps no state between calls. Each call starts in `Normal`
// and consumes exactly the bytes of the key it returns.

use tracing::debug;

use crate::error::{Error, Result};
use crate::terminal::ReadByte;

const ESC: u8 = 0x1b;

/// The control byte a terminal sends for `Ctrl` + `key`.
#[inline]
#[must_use]
pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

// ─── KeyEvent ───────────────────────────────────────────────────────────────

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A byte outside the control range.
    Char(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    /// A lone ESC, or an escape sequence that timed out or was not
    /// recognized.
    Escape,
    /// A control byte: `0x00..=0x1f` (other than ESC) or DEL (`0x7f`).
    Control(u8),
}

impl KeyEvent {
    /// Classify a single byte read outside any escape sequence.
    ///
    /// `read_key` routes ESC through the escape states instead, so the
    /// `Escape` arm only serves callers classifying bytes themselves.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Self::Escape,
            0x00..=0x1f | 0x7f => Self::Control(byte),
            _ => Self::Char(byte),
        }
    }
}

// ─── State machine ──────────────────────────────────────────────────────────

/// Decoder position within an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the first byte of a key.
    Normal,
    /// Read `ESC`.
    SawEscape,
    /// Read `ESC O`.
    SawSs3,
    /// Read `ESC [`.
    SawBracket,
    /// Read `ESC [ <digit>`; holds the digit's value.
    SawBracketDigit(u8),
}

/// The result of feeding one read outcome to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Read another byte in the given state.
    Await(State),
    /// The key is complete.
    Emit(KeyEvent),
}

impl State {
    /// Transition on one read outcome. `None` is a read timeout.
    ///
    /// In `Normal` a timeout keeps waiting; in every other state it ends
    /// the sequence as `Escape`.
    #[must_use]
    pub const fn advance(self, byte: Option<u8>) -> Step {
        match (self, byte) {
            (Self::Normal, None) => Step::Await(Self::Normal),
            (Self::Normal, Some(ESC)) => Step::Await(Self::SawEscape),
            (Self::Normal, Some(b)) => Step::Emit(KeyEvent::from_byte(b)),

            (Self::SawEscape, Some(b'[')) => Step::Await(Self::SawBracket),
            (Self::SawEscape, Some(b'O')) => Step::Await(Self::SawSs3),

            (Self::SawSs3, Some(b'H')) => Step::Emit(KeyEvent::Home),
            (Self::SawSs3, Some(b'F')) => Step::Emit(KeyEvent::End),

            (Self::SawBracket, Some(b'A')) => Step::Emit(KeyEvent::ArrowUp),
            (Self::SawBracket, Some(b'B')) => Step::Emit(KeyEvent::ArrowDown),
            (Self::SawBracket, Some(b'C')) => Step::Emit(KeyEvent::ArrowRight),
            (Self::SawBracket, Some(b'D')) => Step::Emit(KeyEvent::ArrowLeft),
            (Self::SawBracket, Some(b'H')) => Step::Emit(KeyEvent::Home),
            (Self::SawBracket, Some(b'F')) => Step::Emit(KeyEvent::End),
            (Self::SawBracket, Some(d @ b'0'..=b'9')) => {
                Step::Await(Self::SawBracketDigit(d - b'0'))
            }

            (Self::SawBracketDigit(d), Some(b'~')) => Step::Emit(match d {
                1 | 7 => KeyEvent::Home,
                3 => KeyEvent::Delete,
                4 | 8 => KeyEvent::End,
                5 => KeyEvent::PageUp,
                6 => KeyEvent::PageDown,
                _ => KeyEvent::Escape,
            }),

            _ => Step::Emit(KeyEvent::Escape),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Read one key from `src`, waiting as long as it takes for the first byte.
///
/// # Errors
///
/// Returns [`Error::Os`] if a read fails. Timeouts are never errors.
pub fn read_key<S: ReadByte + ?Sized>(src: &mut S) -> Result<KeyEvent> {
    let mut state = State::Normal;
    loop {
        let byte = src.read_byte().map_err(|e| Error::os("read", e))?;
        match state.advance(byte) {
            Step::Await(next) => state = next,
            Step::Emit(key) => {
                let lone_escape = state == State::SawEscape && byte.is_none();
                if key == KeyEvent::Escape && !lone_escape {
                    debug!(?state, ?byte, "escape sequence degraded to Escape");
                }
                debug!(?key, "key decoded");
                return Ok(key);
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeTty, Input};
    use pretty_assertions::assert_eq;

    /// Decode one key from `bytes` and assert nothing was left behind.
    fn decode_exact(bytes: &[u8]) -> KeyEvent {
        let mut tty = FakeTty::with_bytes(bytes);
        let key = read_key(&mut tty).unwrap();
        assert!(tty.input.is_empty(), "unconsumed input after {bytes:?}");
        key
    }

    /// Decode one key from `bytes` followed by a read timeout.
    fn decode_then_timeout(bytes: &[u8]) -> (KeyEvent, FakeTty) {
        let mut tty = FakeTty::with_bytes(bytes);
        tty.push(Input::Timeout);
        let key = read_key(&mut tty).unwrap();
        (key, tty)
    }

    // ── Plain bytes ──────────────────────────────────────────────────

    #[test]
    fn printable_bytes_are_chars() {
        assert_eq!(decode_exact(b"a"), KeyEvent::Char(b'a'));
        assert_eq!(decode_exact(b"~"), KeyEvent::Char(b'~'));
        assert_eq!(decode_exact(b" "), KeyEvent::Char(b' '));
        assert_eq!(decode_exact(&[0xc3]), KeyEvent::Char(0xc3));
    }

    #[test]
    fn control_bytes_are_controls() {
        assert_eq!(decode_exact(&[ctrl(b'k')]), KeyEvent::Control(0x0b));
        assert_eq!(decode_exact(&[0x00]), KeyEvent::Control(0x00));
        assert_eq!(decode_exact(b"\r"), KeyEvent::Control(b'\r'));
        assert_eq!(decode_exact(&[0x7f]), KeyEvent::Control(0x7f));
    }

    #[test]
    fn ctrl_masks_high_bits() {
        assert_eq!(ctrl(b'q'), 0x11);
        assert_eq!(ctrl(b'Q'), 0x11);
        assert_eq!(ctrl(b'k'), 0x0b);
    }

    #[test]
    fn one_key_per_call() {
        let mut tty = FakeTty::with_bytes(b"ab\x1b[A");
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Char(b'a'));
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Char(b'b'));
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::ArrowUp);
        assert!(tty.input.is_empty());
    }

    #[test]
    fn waits_through_idle_timeouts() {
        let mut tty = FakeTty::new();
        tty.push(Input::Timeout);
        tty.push(Input::Timeout);
        tty.push_bytes(b"x");
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Char(b'x'));
    }

    // ── Three-byte sequences ─────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(decode_exact(b"\x1b[A"), KeyEvent::ArrowUp);
        assert_eq!(decode_exact(b"\x1b[B"), KeyEvent::ArrowDown);
        assert_eq!(decode_exact(b"\x1b[C"), KeyEvent::ArrowRight);
        assert_eq!(decode_exact(b"\x1b[D"), KeyEvent::ArrowLeft);
    }

    #[test]
    fn csi_home_end() {
        assert_eq!(decode_exact(b"\x1b[H"), KeyEvent::Home);
        assert_eq!(decode_exact(b"\x1b[F"), KeyEvent::End);
    }

    #[test]
    fn ss3_home_end() {
        assert_eq!(decode_exact(b"\x1bOH"), KeyEvent::Home);
        assert_eq!(decode_exact(b"\x1bOF"), KeyEvent::End);
    }

    // ── Four-byte sequences ──────────────────────────────────────────

    #[test]
    fn tilde_sequences() {
        let cases: [(&[u8], KeyEvent); 8] = [
            (b"\x1b[1~", KeyEvent::Home),
            (b"\x1b[3~", KeyEvent::Delete),
            (b"\x1b[4~", KeyEvent::End),
            (b"\x1b[5~", KeyEvent::PageUp),
            (b"\x1b[6~", KeyEvent::PageDown),
            (b"\x1b[7~", KeyEvent::Home),
            (b"\x1b[8~", KeyEvent::End),
            (b"\x1b[2~", KeyEvent::Escape),
        ];
        for (bytes, expected) in cases {
            assert_eq!(decode_exact(bytes), expected, "{bytes:?}");
        }
    }

    #[test]
    fn unmapped_digits_are_escape() {
        for d in [b'0', b'2', b'9'] {
            assert_eq!(decode_exact(&[ESC, b'[', d, b'~']), KeyEvent::Escape);
        }
    }

    // ── Degraded sequences ───────────────────────────────────────────

    #[test]
    fn lone_escape_after_timeout() {
        let (key, tty) = decode_then_timeout(b"\x1b");
        assert_eq!(key, KeyEvent::Escape);
        assert!(tty.input.is_empty());
    }

    #[test]
    fn lone_escape_returns_once() {
        let mut tty = FakeTty::with_bytes(b"\x1b");
        tty.push(Input::Timeout);
        tty.push_bytes(b"q");
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Escape);
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Char(b'q'));
    }

    #[test]
    fn timeout_mid_sequence_is_escape() {
        let cases: [&[u8]; 3] = [b"\x1b[", b"\x1bO", b"\x1b[5"];
        for bytes in cases {
            let (key, tty) = decode_then_timeout(bytes);
            assert_eq!(key, KeyEvent::Escape, "{bytes:?}");
            assert!(tty.input.is_empty());
        }
    }

    #[test]
    fn unknown_byte_mid_sequence_is_escape() {
        assert_eq!(decode_exact(b"\x1bx"), KeyEvent::Escape);
        assert_eq!(decode_exact(b"\x1b[Z"), KeyEvent::Escape);
        assert_eq!(decode_exact(b"\x1bOA"), KeyEvent::Escape);
        assert_eq!(decode_exact(b"\x1b[5x"), KeyEvent::Escape);
    }

    #[test]
    fn escape_escape_is_one_key() {
        let mut tty = FakeTty::with_bytes(b"\x1b\x1bq");
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Escape);
        assert_eq!(read_key(&mut tty).unwrap(), KeyEvent::Char(b'q'));
        assert!(tty.input.is_empty());
    }

    #[test]
    fn from_byte_classifies_single_bytes() {
        assert_eq!(KeyEvent::from_byte(ESC), KeyEvent::Escape);
        assert_eq!(KeyEvent::from_byte(0x00), KeyEvent::Control(0x00));
        assert_eq!(KeyEvent::from_byte(ctrl(b'k')), KeyEvent::Control(0x0b));
        assert_eq!(KeyEvent::from_byte(0x7f), KeyEvent::Control(0x7f));
        assert_eq!(KeyEvent::from_byte(b' '), KeyEvent::Char(b' '));
        assert_eq!(KeyEvent::from_byte(0xc3), KeyEvent::Char(0xc3));
    }

    #[test]
    fn read_failure_is_an_error() {
        let mut tty = FakeTty::with_bytes(b"\x1b[");
        tty.push(Input::Fail);
        let err = read_key(&mut tty).unwrap_err();
        assert!(err.to_string().starts_with("read: "));
    }

    // ── Transition table ─────────────────────────────────────────────

    #[test]
    fn normal_waits_on_timeout() {
        assert_eq!(State::Normal.advance(None), Step::Await(State::Normal));
    }

    #[test]
    fn every_non_normal_state_degrades_on_timeout() {
        for state in [
            State::SawEscape,
            State::SawSs3,
            State::SawBracket,
            State::SawBracketDigit(5),
        ] {
            assert_eq!(state.advance(None), Step::Emit(KeyEvent::Escape), "{state:?}");
        }
    }

    #[test]
    fn bracket_digit_records_value() {
        assert_eq!(
            State::SawBracket.advance(Some(b'6')),
            Step::Await(State::SawBracketDigit(6))
        );
    }

    #[test]
    fn every_byte_after_escape_terminates_or_advances() {
        for b in 0..=u8::MAX {
            let step = State::SawEscape.advance(Some(b));
            match b {
                b'[' => assert_eq!(step, Step::Await(State::SawBracket)),
                b'O' => assert_eq!(step, Step::Await(State::SawSs3)),
                _ => assert_eq!(step, Step::Emit(KeyEvent::Escape)),
            }
        }
    }
}

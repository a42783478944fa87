// SPDX-License-Identifier: MIT
//
// Scripted terminal for tests.
//
// Input is a queue of bytes, read timeouts, and read failures. Running off
// the end of the script is a read failure, so a test that forgets its quit
// key fails instead of spinning forever on timeouts.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crate::terminal::{ReadByte, Tty};
use crate::viewport::Viewport;

/// One scripted `read_byte` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Byte(u8),
    Timeout,
    Fail,
}

/// The two modes a fake device can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMode {
    Original,
    Raw,
}

/// What the geometry ioctl answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Size { rows: u16, cols: u16 },
    Fail,
}

pub struct FakeTty {
    pub input: VecDeque<Input>,
    pub output: Vec<u8>,
    /// Number of `write` calls that reached the device.
    pub writes: usize,
    pub geometry: Geometry,
    pub fail_get_mode: bool,
    pub fail_set_mode: bool,
    /// Fail every write once this many bytes have been written.
    pub fail_writes_after: Option<usize>,
    modes: Rc<RefCell<Vec<FakeMode>>>,
    restores: Rc<Cell<usize>>,
}

impl FakeTty {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            writes: 0,
            geometry: Geometry::Size { rows: 24, cols: 80 },
            fail_get_mode: false,
            fail_set_mode: false,
            fail_writes_after: None,
            modes: Rc::new(RefCell::new(Vec::new())),
            restores: Rc::new(Cell::new(0)),
        }
    }

    /// A device whose input is exactly `bytes`, with no timeouts.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut tty = Self::new();
        tty.push_bytes(bytes);
        tty
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied().map(Input::Byte));
    }

    pub fn push(&mut self, input: Input) {
        self.input.push_back(input);
    }

    /// Successfully applied modes, shared so it outlives the device.
    pub fn mode_log(&self) -> Rc<RefCell<Vec<FakeMode>>> {
        Rc::clone(&self.modes)
    }

    /// Number of attempts to reapply the original mode.
    pub fn restore_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.restores)
    }
}

impl ReadByte for FakeTty {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.input.pop_front() {
            Some(Input::Byte(b)) => Ok(Some(b)),
            Some(Input::Timeout) => Ok(None),
            Some(Input::Fail) => Err(io::Error::other("scripted read failure")),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input script exhausted",
            )),
        }
    }
}

impl io::Write for FakeTty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(limit) = self.fail_writes_after {
            if self.output.len() >= limit {
                return Err(io::Error::other("scripted write failure"));
            }
        }
        self.writes += 1;
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Tty for FakeTty {
    type Mode = FakeMode;

    fn get_mode(&self) -> io::Result<FakeMode> {
        if self.fail_get_mode {
            return Err(io::Error::other("scripted tcgetattr failure"));
        }
        Ok(FakeMode::Original)
    }

    fn raw_mode(&self, _original: &FakeMode) -> FakeMode {
        FakeMode::Raw
    }

    fn set_mode(&self, mode: &FakeMode) -> io::Result<()> {
        if *mode == FakeMode::Original {
            self.restores.set(self.restores.get() + 1);
        }
        if self.fail_set_mode {
            return Err(io::Error::other("scripted tcsetattr failure"));
        }
        self.modes.borrow_mut().push(*mode);
        Ok(())
    }

    fn window_size(&self) -> io::Result<Option<Viewport>> {
        match self.geometry {
            Geometry::Size { rows, cols } => Ok(Viewport::new(rows, cols)),
            Geometry::Fail => Err(io::Error::other("scripted ioctl failure")),
        }
    }
}

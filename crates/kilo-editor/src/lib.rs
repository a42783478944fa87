//! # kilo-editor — Editor core for kilo
//!
//! The device-independent half of the editor:
//!
//! - **[`buffer`]** — `Row` and `ContentBuffer`, loaded from the first line of a file
//! - **[`cursor`]** — `Cursor` whose every mutator keeps it inside the viewport
//! - **[`view`]** — frame composition: rows, placeholder markers, banner, cursor
//! - **[`editor`]** — `Editor`, the state value the event loop drives
//!
//! Terminal access (raw mode, key decoding, output) lives in `kilo-term`.

pub mod buffer;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod view;

pub use error::{Error, Result};

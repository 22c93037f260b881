//! Host read/write surface
//!
//! This module provides [`DigitAttribute`], a byte-oriented view of a
//! [`DisplayEngine`] shaped like a virtual attribute file: reads return the
//! shown symbol as text, writes take a raw token.
//!
//! The transport (a sysfs file, a serial console, an HTTP handler) belongs to
//! the host; this type only converts between bytes and engine calls.
//!
//! ## Text Format
//!
//! | State | `show` output |
//! |-------|---------------|
//! | Displaying `3` | `b"3\n"` |
//! | Displaying `A` | `b"a\n"` |
//! | Uninitialized | `b"\n"` |
//!
//! ## Example
//!
//! ```rust
//! use display7::{Builder, DigitAttribute, DisplayEngine, OutputBus, SegmentMask};
//! # use core::convert::Infallible;
//! # struct Lines;
//! # impl OutputBus for Lines {
//! #     type Error = Infallible;
//! #     fn line_count(&self) -> usize { 7 }
//! #     fn apply(&mut self, _mask: SegmentMask) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # let config = match Builder::new().lines(7).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! # let engine = match DisplayEngine::new(Lines, config) {
//! #     Ok(engine) => engine,
//! #     Err(_) => return,
//! # };
//! let digit = DigitAttribute::new(&engine);
//!
//! // echo A > digit
//! let _ = digit.store(b"A\n");
//!
//! // cat digit
//! let mut buf = [0u8; 8];
//! let len = digit.show(&mut buf).unwrap_or(0);
//! assert_eq!(&buf[..len], b"a\n");
//! ```

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};

use crate::bus::OutputBus;
use crate::engine::{DisplayEngine, DisplayState};
use crate::error::Error;

/// Conventional attribute name
pub const ATTRIBUTE_NAME: &str = "digit";

/// Longest `show` output: one character and a newline
pub const MAX_SHOW_LEN: usize = 2;

type AttributeResult<T, B> = core::result::Result<T, Error<B>>;

/// Text for a display state, and its length
pub fn render(state: DisplayState) -> ([u8; MAX_SHOW_LEN], usize) {
    match state.symbol() {
        Some(symbol) => ([symbol.as_char() as u8, b'\n'], 2),
        None => ([b'\n', 0], 1),
    }
}

/// Read/write attribute over a borrowed engine
pub struct DigitAttribute<'a, B, M = CriticalSectionRawMutex>
where
    B: OutputBus,
    M: RawMutex,
{
    engine: &'a DisplayEngine<B, M>,
}

impl<'a, B, M> DigitAttribute<'a, B, M>
where
    B: OutputBus,
    M: RawMutex,
{
    /// Create an attribute for `engine`
    pub fn new(engine: &'a DisplayEngine<B, M>) -> Self {
        Self { engine }
    }

    /// Attribute name
    pub fn name(&self) -> &'static str {
        ATTRIBUTE_NAME
    }

    /// Write the shown symbol as text into `buf`
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if `buf` cannot hold the text; nothing
    /// is written in that case.
    pub fn show(&self, buf: &mut [u8]) -> AttributeResult<usize, B> {
        let (text, len) = render(self.engine.state());
        let Some(dest) = buf.get_mut(..len) else {
            return Err(Error::BufferTooSmall {
                required: len,
                provided: buf.len(),
            });
        };
        dest.copy_from_slice(&text[..len]);
        Ok(len)
    }

    /// Show the symbol named by `buf`
    ///
    /// Returns the number of bytes consumed, which is all of `buf`.
    ///
    /// # Errors
    ///
    /// Forwards the engine error after logging it. The shown symbol is
    /// unchanged.
    pub fn store(&self, buf: &[u8]) -> AttributeResult<usize, B> {
        match self.engine.set(buf) {
            Ok(_) => Ok(buf.len()),
            Err(e) => {
                log::warn!("display7: write to {} failed: {}", ATTRIBUTE_NAME, e);
                Err(e)
            }
        }
    }
}

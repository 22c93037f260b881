//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration or engine construction
//! - [`Error`] - Runtime errors while showing a symbol
//! - [`BusError`](crate::bus::BusError) - Low-level GPIO errors from [`PinBus`](crate::bus::PinBus)
//!
//! A failed write never changes the displayed symbol.
//!
//! ## Example
//!
//! ```
//! use display7::{Builder, BuilderError};
//!
//! // Missing line count
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingLineCount)));
//!
//! // More lines than a digit has
//! let result = Builder::new().lines(9).build();
//! assert!(matches!(result, Err(BuilderError::InvalidLineCount { lines: 9 })));
//! ```

use crate::bus::OutputBus;
use crate::codec::MAX_LINES;

/// Errors that can occur when showing a symbol
///
/// Generic over the bus type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
pub enum Error<B: OutputBus> {
    /// Token is not a hexadecimal digit
    ///
    /// Only returned under [`UnknownTokenPolicy::Reject`](crate::config::UnknownTokenPolicy::Reject).
    InvalidSymbol,
    /// Raw symbol value above 15
    ///
    /// Indicates a caller bug; the value never reaches the segment table.
    OutOfRange {
        /// Value requested
        index: u8,
    },
    /// Output lines could not be driven
    ///
    /// Wraps the underlying error from the [`OutputBus`] implementation.
    /// The previously shown symbol is still shown.
    OutputFailure(B::Error),
    /// Buffer is too small for the textual symbol
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

// Manual impl so the bus itself need not be `Debug`
impl<B: OutputBus> core::fmt::Debug for Error<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSymbol => write!(f, "InvalidSymbol"),
            Self::OutOfRange { index } => f
                .debug_struct("OutOfRange")
                .field("index", index)
                .finish(),
            Self::OutputFailure(e) => f.debug_tuple("OutputFailure").field(e).finish(),
            Self::BufferTooSmall { required, provided } => f
                .debug_struct("BufferTooSmall")
                .field("required", required)
                .field("provided", provided)
                .finish(),
        }
    }
}

impl<B: OutputBus> core::fmt::Display for Error<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSymbol => write!(f, "Invalid symbol"),
            Self::OutOfRange { index } => write!(f, "Symbol value {index} out of range (max 15)"),
            Self::OutputFailure(e) => write!(f, "Output failure: {e:?}"),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl<B: OutputBus> core::error::Error for Error<B> {}

/// Errors that can occur when building configuration
///
/// These errors occur before the engine drives any line.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Line count was not specified
    ///
    /// [`Builder::lines()`](crate::config::Builder::lines) must be called before building.
    MissingLineCount,
    /// Line count outside 1 to 8
    InvalidLineCount {
        /// Number of lines requested
        lines: usize,
    },
    /// Bus does not have the configured number of lines
    LineCountMismatch {
        /// Lines in the configuration
        configured: usize,
        /// Lines reported by the bus
        wired: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingLineCount => write!(f, "Line count must be specified"),
            Self::InvalidLineCount { lines } => {
                write!(f, "Invalid line count {lines} (must be 1 to {MAX_LINES})")
            }
            Self::LineCountMismatch { configured, wired } => write!(
                f,
                "Configured for {configured} lines but the bus has {wired}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

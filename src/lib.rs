//! Seven-Segment Display Driver
//!
//! A driver for a single seven-segment LED digit showing one hexadecimal
//! character, `0` through `F`.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Fixed, const-evaluable segment table
//! - 1 to 8 wired lines (with or without decimal point)
//! - Active-high or active-low segments
//! - All-or-nothing line updates
//! - Safe to share between contexts (blocking mutex from `embassy-sync`)
//! - Strict or legacy handling of unknown input
//!
//! ## Usage
//!
//! ```rust
//! use core::convert::Infallible;
//! use embedded_hal::digital::OutputPin;
//! use display7::{Builder, DigitAttribute, DisplayEngine, PinBus, Symbol};
//!
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // Segments A, B, C, D, E, F, G, DP
//! let bus = PinBus::new([
//!     MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin,
//! ]);
//! let config = match Builder::new().lines(8).initial_symbol(Some(Symbol::EIGHT)).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let engine = match DisplayEngine::new(bus, config) {
//!     Ok(engine) => engine,
//!     Err(_) => return,
//! };
//! let _ = engine.init();
//!
//! let _ = engine.set_char('c');
//! assert_eq!(engine.get(), Symbol::new(12));
//!
//! // Byte-oriented surface for a host attribute file
//! let digit = DigitAttribute::new(&engine);
//! let mut buf = [0u8; 4];
//! let len = digit.show(&mut buf).unwrap_or(0);
//! assert_eq!(&buf[..len], b"c\n");
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

/// Host read/write surface
pub mod attribute;
/// Output line abstraction
pub mod bus;
/// Segment table and mask type
pub mod codec;
/// Engine configuration types and builder
pub mod config;
/// Core display operations
pub mod engine;
/// Error types for the driver
pub mod error;
/// Hexadecimal display symbols
pub mod symbol;

pub use attribute::{ATTRIBUTE_NAME, DigitAttribute};
pub use bus::{BusError, OutputBus, PinBus, Polarity};
pub use codec::{MAX_LINES, SEGMENT_TABLE, Segment, SegmentMask, encode};
pub use config::{Builder, Config, TokenShape, UnknownTokenPolicy};
pub use engine::{DisplayEngine, DisplayState};
pub use error::{BuilderError, Error};
pub use symbol::Symbol;

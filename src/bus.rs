//! Output line abstraction
//!
//! This module provides the [`OutputBus`] trait and the [`PinBus`] struct
//! for driving the segment lines of a seven-segment digit.
//!
//! ## Hardware Requirements
//!
//! One GPIO output per wired segment, in segment order:
//! - **Line 0-6**: segments A-G
//! - **Line 7**: decimal point (optional)
//!
//! Displays wired without the decimal point use 7 lines; the engine never
//! drives a line that does not exist.
//!
//! ## Example
//!
//! ```rust
//! use display7::{OutputBus, PinBus, SegmentMask};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // Segments A through G, no decimal point
//! let mut bus = PinBus::new([
//!     MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin,
//! ]);
//! assert_eq!(bus.line_count(), 7);
//!
//! // Light segments B and C
//! let _ = bus.apply(SegmentMask::from_bits(0x06));
//! assert_eq!(bus.latched(), SegmentMask::from_bits(0x06));
//! ```

use core::fmt::Debug;
use embedded_hal::digital::OutputPin;

use crate::codec::{MAX_LINES, SegmentMask};

type BusResult<T, E> = core::result::Result<T, E>;

/// Trait for the set of output lines behind one digit
///
/// This trait abstracts over how segment lines are physically driven,
/// allowing the [`DisplayEngine`](crate::engine::DisplayEngine) to work
/// with GPIO pins, a shift register, a port expander, or a test double.
///
/// ## Implementing
///
/// For GPIO pins, use the provided [`PinBus`]. Custom implementations must
/// uphold two rules:
///
/// 1. `apply` is all-or-nothing from the caller's perspective: on `Err`, the
///    lines must show the previously applied mask.
/// 2. `apply` returns in bounded time. Fail instead of waiting on hardware
///    that does not respond.
pub trait OutputBus {
    /// Error type for line operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Number of wired lines, 1 to 8
    ///
    /// Must not change over the lifetime of the bus.
    fn line_count(&self) -> usize;

    /// Drive every line to reflect `mask`
    ///
    /// Bit *i* of `mask` is line *i*. Bits at or beyond
    /// [`line_count`](OutputBus::line_count) are zero.
    ///
    /// # Errors
    ///
    /// Returns an error if any line cannot be driven.
    fn apply(&mut self, mask: SegmentMask) -> BusResult<(), Self::Error>;
}

impl<T: OutputBus + ?Sized> OutputBus for &mut T {
    type Error = T::Error;

    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn apply(&mut self, mask: SegmentMask) -> BusResult<(), Self::Error> {
        (**self).apply(mask)
    }
}

/// Electrical level that lights a segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Line high lights the segment (common cathode)
    #[default]
    ActiveHigh,
    /// Line low lights the segment (common anode)
    ActiveLow,
}

/// Errors that can occur while driving pins
///
/// Generic over the GPIO error type.
#[derive(Debug)]
pub enum BusError<PinErr> {
    /// A line could not be driven
    Pin {
        /// Index of the line that failed
        line: usize,
        /// Underlying GPIO error
        error: PinErr,
    },
}

impl<PinErr: Debug> core::fmt::Display for BusError<PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin { line, error } => write!(f, "Pin error on line {line}: {error:?}"),
        }
    }
}

impl<PinErr: Debug> core::error::Error for BusError<PinErr> {}

/// [`OutputBus`] over GPIO pins
///
/// Implements [`OutputBus`] for an array of embedded-hal v1.0
/// [`OutputPin`]s. Pin `i` drives segment line `i`.
///
/// ## Type Parameters
///
/// * `P` - Pin type implementing [`OutputPin`]
/// * `N` - Number of wired lines, checked at compile time to be 1 to 8
///
/// ## Line State
///
/// The first [`apply`](OutputBus::apply), and the first one after a polarity
/// change, drives every line. Later calls only drive lines whose level
/// changes. [`DisplayEngine::init`](crate::engine::DisplayEngine::init)
/// performs that first full write at start-up.
pub struct PinBus<P, const N: usize> {
    /// Segment pins, line order
    pins: [P; N],
    /// Level that lights a segment
    polarity: Polarity,
    /// Last mask successfully driven
    latched: SegmentMask,
    /// Polarity `latched` was driven with
    latched_polarity: Polarity,
    /// Whether every line has been driven at least once
    synced: bool,
}

impl<P, const N: usize> PinBus<P, N>
where
    P: OutputPin,
{
    /// Create a new active-high PinBus
    ///
    /// # Arguments
    ///
    /// * `pins` - Output pins for segments A, B, C, ... in order
    pub fn new(pins: [P; N]) -> Self {
        const {
            assert!(N >= 1 && N <= MAX_LINES, "a digit has 1 to 8 segment lines");
        }
        Self {
            pins,
            polarity: Polarity::ActiveHigh,
            latched: SegmentMask::BLANK,
            latched_polarity: Polarity::ActiveHigh,
            synced: false,
        }
    }

    /// Set the level that lights a segment
    ///
    /// Default is active-high. Set to [`Polarity::ActiveLow`] for
    /// common-anode displays.
    pub fn set_polarity(&mut self, polarity: Polarity) -> &mut Self {
        if polarity != self.polarity {
            self.synced = false;
        }
        self.polarity = polarity;
        self
    }

    /// Get the current polarity
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Last mask successfully driven
    pub fn latched(&self) -> SegmentMask {
        self.latched
    }

    /// Release the pins
    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn drive(&mut self, line: usize, active: bool, polarity: Polarity) -> BusResult<(), P::Error> {
        let high = match polarity {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        };
        let Some(pin) = self.pins.get_mut(line) else {
            return Ok(());
        };
        if high { pin.set_high() } else { pin.set_low() }
    }

    /// Drive lines `0..upto` back to the latched levels
    fn roll_back(&mut self, upto: usize) {
        let (latched, polarity) = (self.latched, self.latched_polarity);
        for line in 0..upto {
            if let Err(error) = self.drive(line, latched.line_active(line), polarity) {
                log::warn!("display7: rollback of line {} failed: {:?}", line, error);
            }
        }
    }
}

impl<P, const N: usize> OutputBus for PinBus<P, N>
where
    P: OutputPin,
{
    type Error = BusError<P::Error>;

    fn line_count(&self) -> usize {
        N
    }

    fn apply(&mut self, mask: SegmentMask) -> BusResult<(), Self::Error> {
        let mask = mask.truncate(N);
        log::trace!("display7: driving {} lines with {}", N, mask);

        for line in 0..N {
            let active = mask.line_active(line);
            if self.synced && active == self.latched.line_active(line) {
                continue;
            }
            if let Err(error) = self.drive(line, active, self.polarity) {
                self.roll_back(line);
                return Err(BusError::Pin { line, error });
            }
        }

        self.latched = mask;
        self.latched_polarity = self.polarity;
        self.synced = true;
        Ok(())
    }
}

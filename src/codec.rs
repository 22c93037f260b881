//! Segment encoding
//!
//! This module maps each [`Symbol`] to the set of segments that draw it.
//!
//! ## Segment Layout
//!
//! ```text
//!       a
//!     +---+
//!   f | g | b
//!     +---+
//!   e |   | c
//!     +---+ * dp
//!       d
//! ```
//!
//! ## Bit Order
//!
//! A [`SegmentMask`] is one byte. Bit *i* drives output line *i*:
//!
//! | Bit | 7  | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
//! |-----|----|---|---|---|---|---|---|---|
//! | Segment | DP | G | F | E | D | C | B | A |
//!
//! No symbol lights the decimal point, so bit 7 of every table entry is 0.
//!
//! ## Example
//!
//! ```
//! use display7::codec::{encode, SEG_A, SEG_B, SEG_C};
//! use display7::Symbol;
//!
//! let seven = Symbol::new(7).map(encode);
//! assert_eq!(seven.map(|mask| mask.bits()), Some(SEG_A | SEG_B | SEG_C));
//! ```

use crate::symbol::{SYMBOL_COUNT, Symbol};

// Segment bits

/// Segment A (top)
pub const SEG_A: u8 = 1 << 0;
/// Segment B (top right)
pub const SEG_B: u8 = 1 << 1;
/// Segment C (bottom right)
pub const SEG_C: u8 = 1 << 2;
/// Segment D (bottom)
pub const SEG_D: u8 = 1 << 3;
/// Segment E (bottom left)
pub const SEG_E: u8 = 1 << 4;
/// Segment F (top left)
pub const SEG_F: u8 = 1 << 5;
/// Segment G (middle)
pub const SEG_G: u8 = 1 << 6;
/// Decimal point
pub const SEG_DP: u8 = 1 << 7;

/// Maximum number of segment lines a single digit can have (A-G plus DP)
pub const MAX_LINES: usize = 8;

/// Segment masks for symbols `0` through `F`, indexed by symbol value
pub const SEGMENT_TABLE: [u8; SYMBOL_COUNT] = [
    0x3F, // 0: f,e,d,c,b,a
    0x06, // 1: c,b
    0x5B, // 2: g,e,d,b,a
    0x4F, // 3: g,d,c,b,a
    0x66, // 4: g,f,c,b
    0x6D, // 5: g,f,d,c,a
    0x7D, // 6: g,f,e,d,c,a
    0x07, // 7: c,b,a
    0x7F, // 8: g,f,e,d,c,b,a
    0x6F, // 9: g,f,d,c,b,a
    0x77, // A: g,f,e,c,b,a
    0x7C, // b: g,f,e,d,c
    0x39, // C: f,e,d,a
    0x5E, // d: g,e,d,c,b
    0x79, // E: g,f,e,d,a
    0x71, // F: g,f,e,a
];

/// A single physical segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Segment {
    /// Top
    A = 0,
    /// Top right
    B = 1,
    /// Bottom right
    C = 2,
    /// Bottom
    D = 3,
    /// Bottom left
    E = 4,
    /// Top left
    F = 5,
    /// Middle
    G = 6,
    /// Decimal point
    Dp = 7,
}

impl Segment {
    /// All segments in line order
    pub const ALL: [Self; MAX_LINES] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::Dp,
    ];

    /// Output line index (bit position) of this segment
    pub const fn line(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this segment
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of lit segments, one bit per output line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SegmentMask(u8);

impl SegmentMask {
    /// All segments off
    pub const BLANK: Self = Self(0);

    /// Wrap raw segment bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw segment bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `segment` is lit
    pub const fn is_lit(self, segment: Segment) -> bool {
        self.0 & segment.bit() != 0
    }

    /// Whether output line `line` should be driven active
    ///
    /// Lines at or beyond [`MAX_LINES`] are never active.
    pub const fn line_active(self, line: usize) -> bool {
        line < MAX_LINES && (self.0 >> line) & 1 != 0
    }

    /// Drop bits for lines that are not wired
    ///
    /// A display wired with `lines` outputs only has bits `0..lines`.
    ///
    /// ```
    /// use display7::codec::SegmentMask;
    ///
    /// let mask = SegmentMask::from_bits(0xFF);
    /// assert_eq!(mask.truncate(7).bits(), 0x7F);
    /// assert_eq!(mask.truncate(8).bits(), 0xFF);
    /// assert_eq!(mask.truncate(0).bits(), 0x00);
    /// ```
    pub const fn truncate(self, lines: usize) -> Self {
        if lines >= MAX_LINES {
            self
        } else {
            Self(self.0 & ((1u8 << lines) - 1))
        }
    }
}

impl From<SegmentMask> for u8 {
    fn from(mask: SegmentMask) -> Self {
        mask.0
    }
}

impl core::fmt::Display for SegmentMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Encode a symbol into its segment mask
///
/// Pure table lookup; the result never has the decimal point set.
pub const fn encode(symbol: Symbol) -> SegmentMask {
    SegmentMask(SEGMENT_TABLE[symbol.value() as usize])
}

//! Hexadecimal display symbols
//!
//! This module defines the [`Symbol`] type: one of the sixteen characters a
//! single seven-segment digit can show, `0`-`9` and `A`-`F`.
//!
//! A [`Symbol`] always holds a value in `0..=15`. Every constructor checks the
//! range, so code that receives a `Symbol` never needs to re-validate it.
//!
//! ## Textual Form
//!
//! Input is case-insensitive. Output is always lower case, which is the form
//! exposed to the host:
//!
//! | Value | Accepted input | Output |
//! |-------|----------------|--------|
//! | 0-9   | `0`-`9`        | `0`-`9` |
//! | 10-15 | `a`-`f`, `A`-`F` | `a`-`f` |
//!
//! ## Example
//!
//! ```
//! use display7::Symbol;
//!
//! let symbol = Symbol::from_char('B');
//! assert_eq!(symbol, Symbol::new(11));
//! assert_eq!(symbol.map(Symbol::as_char), Some('b'));
//!
//! assert_eq!(Symbol::from_char('g'), None);
//! assert_eq!(Symbol::new(16), None);
//! ```

/// Number of distinct symbols a single digit can show
pub const SYMBOL_COUNT: usize = 16;

/// A hexadecimal digit, `0`-`F`
///
/// The wrapped value is always in `0..=15`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u8);

impl Symbol {
    /// Symbol `0`
    pub const ZERO: Self = Self(0);
    /// Symbol `8`, which lights every segment except the decimal point
    pub const EIGHT: Self = Self(8);
    /// Symbol `F`
    pub const F: Self = Self(15);

    /// Create a symbol from its numeric value
    ///
    /// Returns `None` if `value > 15`.
    pub const fn new(value: u8) -> Option<Self> {
        if (value as usize) < SYMBOL_COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Parse a single character, ignoring case
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self(c as u8 - b'0')),
            'a'..='f' => Some(Self(c as u8 - b'a' + 10)),
            'A'..='F' => Some(Self(c as u8 - b'A' + 10)),
            _ => None,
        }
    }

    /// Parse a raw token
    ///
    /// Surrounding ASCII whitespace is ignored, so a line written with a
    /// trailing newline parses the same as the bare character. Anything other
    /// than exactly one hexadecimal character is rejected.
    ///
    /// ```
    /// use display7::Symbol;
    ///
    /// assert_eq!(Symbol::parse(b"7\n"), Symbol::new(7));
    /// assert_eq!(Symbol::parse(b" e "), Symbol::new(14));
    /// assert_eq!(Symbol::parse(b""), None);
    /// assert_eq!(Symbol::parse(b"12"), None);
    /// ```
    pub fn parse(token: &[u8]) -> Option<Self> {
        match token.trim_ascii() {
            [byte] => Self::from_char(char::from(*byte)),
            _ => None,
        }
    }

    /// Parse the first byte of a raw token
    ///
    /// The rest of the token is ignored and nothing is trimmed, so `b"10"`
    /// parses as `1` and `b" 3"` is rejected.
    ///
    /// ```
    /// use display7::Symbol;
    ///
    /// assert_eq!(Symbol::parse_first(b"10\n"), Symbol::new(1));
    /// assert_eq!(Symbol::parse_first(b"ab"), Symbol::new(10));
    /// assert_eq!(Symbol::parse_first(b" 3"), None);
    /// ```
    pub fn parse_first(token: &[u8]) -> Option<Self> {
        token.first().and_then(|byte| Self::from_char(char::from(*byte)))
    }

    /// Numeric value, `0..=15`
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Lower-case character for this symbol
    pub const fn as_char(self) -> char {
        if self.0 < 10 {
            (b'0' + self.0) as char
        } else {
            (b'a' + self.0 - 10) as char
        }
    }

    /// Iterate over all sixteen symbols in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SYMBOL_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for Symbol {
    type Error = u8;

    /// Returns the rejected value on failure
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

impl TryFrom<char> for Symbol {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c).ok_or(c)
    }
}

impl From<Symbol> for char {
    fn from(symbol: Symbol) -> Self {
        symbol.as_char()
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

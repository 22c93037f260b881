//! Engine configuration types and builder

pub use crate::error::BuilderError;

use crate::codec::MAX_LINES;
use crate::symbol::Symbol;

/// What to do with a token that is not a hexadecimal digit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownTokenPolicy {
    /// Return [`Error::InvalidSymbol`](crate::error::Error::InvalidSymbol)
    /// and leave the display unchanged
    #[default]
    Reject,
    /// Show the given symbol instead
    ///
    /// Legacy drivers substitute `8`, which lights every segment as a
    /// visible error indicator.
    Substitute(Symbol),
}

impl UnknownTokenPolicy {
    /// Legacy behavior: unknown tokens show `8`
    pub const LEGACY: Self = Self::Substitute(Symbol::EIGHT);
}

/// How much of a written token names the symbol
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenShape {
    /// Exactly one hexadecimal character, surrounding whitespace ignored
    #[default]
    Exact,
    /// Only the first byte counts; legacy drivers read `b"10"` as `1`
    FirstByte,
}

impl TokenShape {
    /// Parse `token` according to this shape
    pub fn parse(self, token: &[u8]) -> Option<Symbol> {
        match self {
            Self::Exact => Symbol::parse(token),
            Self::FirstByte => Symbol::parse_first(token),
        }
    }
}

/// Engine configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of wired segment lines, 1 to 8
    pub lines: usize,
    /// Symbol shown by [`DisplayEngine::init`](crate::engine::DisplayEngine::init);
    /// `None` blanks the display
    pub initial_symbol: Option<Symbol>,
    /// Handling of tokens that are not hexadecimal digits
    pub unknown_token_policy: UnknownTokenPolicy,
    /// How much of a written token is parsed
    pub token_shape: TokenShape,
}

/// Builder for constructing engine configuration
///
/// # Example
///
/// ```rust
/// use display7::{Builder, Symbol, UnknownTokenPolicy};
///
/// let config = match Builder::new()
///     .lines(7)
///     .initial_symbol(Symbol::new(0))
///     .unknown_token_policy(UnknownTokenPolicy::Reject)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.lines, 7);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Number of wired lines (required)
    lines: Option<usize>,
    /// Symbol shown at init
    initial_symbol: Option<Symbol>,
    /// Handling of unknown tokens
    unknown_token_policy: UnknownTokenPolicy,
    /// Token parsing
    token_shape: TokenShape,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of wired segment lines (required)
    ///
    /// 7 for segments A-G, 8 when the decimal point is wired too.
    pub fn lines(mut self, lines: usize) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Set the symbol shown at init
    pub fn initial_symbol(mut self, symbol: Option<Symbol>) -> Self {
        self.initial_symbol = symbol;
        self
    }

    /// Set handling of tokens that are not hexadecimal digits
    pub fn unknown_token_policy(mut self, policy: UnknownTokenPolicy) -> Self {
        self.unknown_token_policy = policy;
        self
    }

    /// Set how much of a written token is parsed
    pub fn token_shape(mut self, shape: TokenShape) -> Self {
        self.token_shape = shape;
        self
    }

    /// Match legacy driver behavior
    ///
    /// Starts on `8`, reads only the first byte of a token and substitutes
    /// `8` for unknown tokens.
    pub fn legacy(self) -> Self {
        self.initial_symbol(Some(Symbol::EIGHT))
            .unknown_token_policy(UnknownTokenPolicy::LEGACY)
            .token_shape(TokenShape::FirstByte)
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingLineCount` if the line count was not set,
    /// or `BuilderError::InvalidLineCount` if it is not 1 to 8
    pub fn build(self) -> Result<Config, BuilderError> {
        let lines = self.lines.ok_or(BuilderError::MissingLineCount)?;
        if lines == 0 || lines > MAX_LINES {
            return Err(BuilderError::InvalidLineCount { lines });
        }
        Ok(Config {
            lines,
            initial_symbol: self.initial_symbol,
            unknown_token_policy: self.unknown_token_policy,
            token_shape: self.token_shape,
        })
    }
}

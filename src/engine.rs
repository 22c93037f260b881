//! Core display operations

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};

use crate::bus::OutputBus;
use crate::codec::{SegmentMask, encode};
use crate::config::{Config, TokenShape, UnknownTokenPolicy};
use crate::error::{BuilderError, Error};
use crate::symbol::Symbol;

type EngineResult<T, B> = core::result::Result<T, Error<B>>;

/// What the display is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayState {
    /// No symbol has been shown yet
    #[default]
    Uninitialized,
    /// The output lines show this symbol
    Displaying(Symbol),
}

impl DisplayState {
    /// Shown symbol, if any
    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Self::Uninitialized => None,
            Self::Displaying(symbol) => Some(symbol),
        }
    }
}

struct Inner<B> {
    bus: B,
    state: DisplayState,
}

/// Driver for one seven-segment digit
///
/// Owns the displayed-symbol state and the [`OutputBus`] behind it. Every
/// operation takes `&self` and runs under one lock, so an engine can be
/// shared between request contexts and each write appears atomic to every
/// reader: the symbol returned by [`get`](Self::get) always matches the
/// mask latched on the lines.
///
/// ## Type Parameters
///
/// * `B` - Output lines implementing [`OutputBus`]. Pass `&mut bus` to keep
///   ownership of the lines outside the engine.
/// * `M` - Raw mutex guarding state and bus. The default
///   [`CriticalSectionRawMutex`] is safe to share across threads and
///   interrupts; use `NoopRawMutex` when only one context touches the engine.
///
/// ## Example
///
/// ```rust
/// use display7::{Builder, DisplayEngine, OutputBus, SegmentMask, Symbol};
/// # use core::convert::Infallible;
/// # struct Lines(u8);
/// # impl OutputBus for Lines {
/// #     type Error = Infallible;
/// #     fn line_count(&self) -> usize { 8 }
/// #     fn apply(&mut self, mask: SegmentMask) -> Result<(), Infallible> {
/// #         self.0 = mask.bits();
/// #         Ok(())
/// #     }
/// # }
/// let config = match Builder::new().lines(8).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let engine = match DisplayEngine::new(Lines(0), config) {
///     Ok(engine) => engine,
///     Err(_) => return,
/// };
///
/// let _ = engine.set(b"3");
/// assert_eq!(engine.get(), Symbol::new(3));
/// assert_eq!(engine.release().0, 0x4F);
/// ```
pub struct DisplayEngine<B, M = CriticalSectionRawMutex>
where
    B: OutputBus,
    M: RawMutex,
{
    /// Bus and state, locked together
    inner: Mutex<M, RefCell<Inner<B>>>,
    /// Wired line count, fixed at construction
    lines: usize,
    /// Symbol shown by `init`
    initial_symbol: Option<Symbol>,
    /// Handling of unknown tokens
    policy: UnknownTokenPolicy,
    /// Token parsing
    token_shape: TokenShape,
}

impl<B> DisplayEngine<B, CriticalSectionRawMutex>
where
    B: OutputBus,
{
    /// Create a new engine guarded by a critical section
    ///
    /// Does not touch the bus; call [`init`](Self::init) to drive the
    /// initial state.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::LineCountMismatch` if the bus does not have
    /// `config.lines` lines.
    pub fn new(bus: B, config: Config) -> Result<Self, BuilderError> {
        Self::with_mutex(bus, config)
    }
}

impl<B, M> DisplayEngine<B, M>
where
    B: OutputBus,
    M: RawMutex,
{
    /// Create a new engine guarded by the raw mutex `M`
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::LineCountMismatch` if the bus does not have
    /// `config.lines` lines.
    pub fn with_mutex(bus: B, config: Config) -> Result<Self, BuilderError> {
        let wired = bus.line_count();
        if wired != config.lines {
            return Err(BuilderError::LineCountMismatch {
                configured: config.lines,
                wired,
            });
        }
        Ok(Self {
            inner: Mutex::new(RefCell::new(Inner {
                bus,
                state: DisplayState::Uninitialized,
            })),
            lines: config.lines,
            initial_symbol: config.initial_symbol,
            policy: config.unknown_token_policy,
            token_shape: config.token_shape,
        })
    }

    /// Drive the initial state onto the lines
    ///
    /// Shows the configured initial symbol. Without one, an uninitialized
    /// display is blanked and stays [`DisplayState::Uninitialized`], and a
    /// display already showing a symbol has that symbol driven again.
    pub fn init(&self) -> EngineResult<(), B> {
        if let Some(symbol) = self.initial_symbol {
            return self.set_symbol(symbol).map(|_| ());
        }
        self.locked(|inner| {
            let state = inner.state;
            match state {
                DisplayState::Uninitialized => inner
                    .bus
                    .apply(SegmentMask::BLANK)
                    .map_err(Error::OutputFailure),
                DisplayState::Displaying(symbol) => self.drive(inner, symbol).map(|_| ()),
            }
        })
    }

    /// Show the symbol named by a raw token
    ///
    /// Under [`TokenShape::Exact`] the token is one hexadecimal character,
    /// case-insensitive, with optional surrounding whitespace. Under
    /// [`TokenShape::FirstByte`] only its first byte is read. Anything else
    /// is handled by the configured [`UnknownTokenPolicy`].
    ///
    /// Returns the symbol now shown.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidSymbol` for an unknown token under `Reject`
    /// - `Error::OutputFailure` if the bus fails; the previous symbol stays
    pub fn set(&self, token: &[u8]) -> EngineResult<Symbol, B> {
        self.locked(|inner| {
            let symbol = self.resolve(self.token_shape.parse(token))?;
            self.drive(inner, symbol)
        })
    }

    /// Show the symbol named by a character
    ///
    /// Same rules as [`set`](Self::set) for a one-character token.
    pub fn set_char(&self, c: char) -> EngineResult<Symbol, B> {
        self.locked(|inner| {
            let symbol = self.resolve(Symbol::from_char(c))?;
            self.drive(inner, symbol)
        })
    }

    /// Show a symbol
    pub fn set_symbol(&self, symbol: Symbol) -> EngineResult<Symbol, B> {
        self.locked(|inner| self.drive(inner, symbol))
    }

    /// Show the symbol with numeric value `index`
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if `index > 15`. The unknown-token policy
    /// does not apply to numeric input.
    pub fn set_index(&self, index: u8) -> EngineResult<Symbol, B> {
        self.locked(|inner| {
            let symbol = Symbol::new(index).ok_or(Error::OutOfRange { index })?;
            self.drive(inner, symbol)
        })
    }

    /// Currently shown symbol
    ///
    /// Returns `None` until the first successful write. Never touches the bus.
    pub fn get(&self) -> Option<Symbol> {
        self.state().symbol()
    }

    /// Current display state
    pub fn state(&self) -> DisplayState {
        self.locked(|inner| inner.state)
    }

    /// Run `f` with a consistent view of state and bus
    ///
    /// No write can happen while `f` runs. `f` must not call back into the
    /// engine.
    pub fn inspect<R>(&self, f: impl FnOnce(DisplayState, &B) -> R) -> R {
        self.locked(|inner| f(inner.state, &inner.bus))
    }

    /// Number of wired segment lines
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Configured handling of unknown tokens
    pub fn unknown_token_policy(&self) -> UnknownTokenPolicy {
        self.policy
    }

    /// Configured token parsing
    pub fn token_shape(&self) -> TokenShape {
        self.token_shape
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.inner.into_inner().into_inner().bus
    }

    fn locked<R>(&self, f: impl FnOnce(&mut Inner<B>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    fn resolve(&self, parsed: Option<Symbol>) -> EngineResult<Symbol, B> {
        match (parsed, self.policy) {
            (Some(symbol), _) => Ok(symbol),
            (None, UnknownTokenPolicy::Substitute(symbol)) => Ok(symbol),
            (None, UnknownTokenPolicy::Reject) => Err(Error::InvalidSymbol),
        }
    }

    /// Encode, apply, and commit; the caller holds the lock
    fn drive(&self, inner: &mut Inner<B>, symbol: Symbol) -> EngineResult<Symbol, B> {
        let mask = encode(symbol).truncate(self.lines);
        inner.bus.apply(mask).map_err(Error::OutputFailure)?;
        inner.state = DisplayState::Displaying(symbol);
        log::debug!("display7: showing {} ({})", symbol, mask);
        Ok(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct StuckLine;

    /// Bus that records every applied mask and can be told to fail
    struct RecordingBus {
        lines: usize,
        applied: Vec<SegmentMask>,
        fail: Arc<AtomicBool>,
    }

    impl RecordingBus {
        fn new(lines: usize) -> (Self, Arc<AtomicBool>) {
            let fail = Arc::new(AtomicBool::new(false));
            let bus = Self {
                lines,
                applied: Vec::new(),
                fail: fail.clone(),
            };
            (bus, fail)
        }

        fn last(&self) -> Option<SegmentMask> {
            self.applied.last().copied()
        }
    }

    impl OutputBus for RecordingBus {
        type Error = StuckLine;

        fn line_count(&self) -> usize {
            self.lines
        }

        fn apply(&mut self, mask: SegmentMask) -> Result<(), Self::Error> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StuckLine);
            }
            self.applied.push(mask);
            Ok(())
        }
    }

    fn engine_with(config: Config) -> (DisplayEngine<RecordingBus>, Arc<AtomicBool>) {
        let (bus, fail) = RecordingBus::new(config.lines);
        (DisplayEngine::new(bus, config).unwrap(), fail)
    }

    fn strict_engine() -> (DisplayEngine<RecordingBus>, Arc<AtomicBool>) {
        engine_with(Builder::new().lines(8).build().unwrap())
    }

    fn legacy_engine() -> (DisplayEngine<RecordingBus>, Arc<AtomicBool>) {
        engine_with(Builder::new().lines(8).legacy().build().unwrap())
    }

    fn last_mask<M: RawMutex>(engine: &DisplayEngine<RecordingBus, M>) -> Option<u8> {
        engine.inspect(|_, bus| bus.last().map(SegmentMask::bits))
    }

    #[test]
    fn test_new_rejects_line_count_mismatch() {
        let (bus, _) = RecordingBus::new(7);
        let config = Builder::new().lines(8).build().unwrap();
        let result = DisplayEngine::new(bus, config);
        assert!(matches!(
            result,
            Err(BuilderError::LineCountMismatch {
                configured: 8,
                wired: 7
            })
        ));
    }

    #[test]
    fn test_new_does_not_touch_bus() {
        let (engine, _) = legacy_engine();
        assert_eq!(engine.state(), DisplayState::Uninitialized);
        assert_eq!(engine.get(), None);
        assert_eq!(last_mask(&engine), None);
    }

    #[test]
    fn test_init_shows_initial_symbol() {
        let (engine, _) = legacy_engine();
        engine.init().unwrap();
        assert_eq!(engine.get(), Some(Symbol::EIGHT));
        assert_eq!(last_mask(&engine), Some(0x7F));
    }

    #[test]
    fn test_init_without_initial_symbol_blanks() {
        let (engine, _) = strict_engine();
        engine.init().unwrap();
        assert_eq!(engine.state(), DisplayState::Uninitialized);
        assert_eq!(last_mask(&engine), Some(0x00));
    }

    #[test]
    fn test_init_after_write_keeps_symbol() {
        let (engine, _) = strict_engine();
        engine.set(b"c").unwrap();
        engine.init().unwrap();
        assert_eq!(engine.get(), Symbol::new(12));
        assert_eq!(last_mask(&engine), Some(0x39));
    }

    #[test]
    fn test_scenario_legacy_display() {
        let (engine, fail) = legacy_engine();
        engine.init().unwrap();

        assert_eq!(engine.set(b"3").unwrap(), Symbol::new(3).unwrap());
        assert_eq!(engine.get(), Symbol::new(3));
        assert_eq!(last_mask(&engine), Some(0x4F));

        assert_eq!(engine.set(b"x").unwrap(), Symbol::EIGHT);
        assert_eq!(engine.get(), Some(Symbol::EIGHT));
        assert_eq!(last_mask(&engine), Some(0x7F));

        fail.store(true, Ordering::SeqCst);
        let result = engine.set(b"A");
        assert!(matches!(result, Err(Error::OutputFailure(StuckLine))));
        assert_eq!(engine.get(), Some(Symbol::EIGHT));
        assert_eq!(last_mask(&engine), Some(0x7F));
    }

    #[test]
    fn test_set_then_get_for_every_token() {
        let (engine, _) = strict_engine();
        for symbol in Symbol::all() {
            let lower = symbol.as_char();
            let upper = lower.to_ascii_uppercase();
            for c in [lower, upper] {
                let token = [c as u8];
                assert_eq!(engine.set(&token).unwrap(), symbol);
                assert_eq!(engine.get(), Some(symbol));
                assert_eq!(last_mask(&engine), Some(encode(symbol).bits()));
            }
        }
    }

    #[test]
    fn test_set_accepts_trailing_newline() {
        let (engine, _) = strict_engine();
        assert_eq!(engine.set(b"d\n").unwrap(), Symbol::new(13).unwrap());
        assert_eq!(last_mask(&engine), Some(0x5E));
    }

    #[test]
    fn test_set_is_idempotent() {
        let (engine, _) = strict_engine();
        engine.set(b"5").unwrap();
        engine.set(b"5").unwrap();
        assert_eq!(engine.get(), Symbol::new(5));
        engine.inspect(|_, bus| {
            assert_eq!(bus.applied.len(), 2);
            assert_eq!(bus.applied[0], bus.applied[1]);
            assert_eq!(bus.applied[0].bits(), 0x6D);
        });
    }

    #[test]
    fn test_strict_rejects_unknown_tokens() {
        let (engine, _) = strict_engine();
        engine.set(b"1").unwrap();

        let tokens: [&[u8]; 8] = [b"g", b"Z", b"", b"x", b"\n", b"10", b"-", &[0xFF]];
        for token in tokens {
            let result = engine.set(token);
            assert!(matches!(result, Err(Error::InvalidSymbol)), "{token:?}");
            assert_eq!(engine.get(), Symbol::new(1));
        }
        engine.inspect(|_, bus| assert_eq!(bus.applied.len(), 1));
    }

    #[test]
    fn test_legacy_substitutes_eight_for_unknown_tokens() {
        let (engine, _) = legacy_engine();

        let tokens: [&[u8]; 8] = [b"g", b"Z", b"", b"x", b"\n", b"g1", b"-", &[0xFF]];
        for token in tokens {
            engine.set(b"1").unwrap();
            assert_eq!(engine.set(token).unwrap(), Symbol::EIGHT, "{token:?}");
            assert_eq!(engine.get(), Some(Symbol::EIGHT));
            assert_eq!(last_mask(&engine), Some(0x7F));
        }
    }

    #[test]
    fn test_legacy_reads_first_byte_of_token() {
        let (engine, _) = legacy_engine();
        assert_eq!(engine.token_shape(), TokenShape::FirstByte);

        assert_eq!(engine.set(b"10\n").unwrap(), Symbol::new(1).unwrap());
        assert_eq!(last_mask(&engine), Some(0x06));

        assert_eq!(engine.set(b"ab").unwrap(), Symbol::new(10).unwrap());
        assert_eq!(last_mask(&engine), Some(0x77));

        assert_eq!(engine.set(b" 3").unwrap(), Symbol::EIGHT);
    }

    #[test]
    fn test_strict_rejects_multi_char_token() {
        let (engine, _) = strict_engine();
        assert_eq!(engine.token_shape(), TokenShape::Exact);
        assert!(matches!(engine.set(b"10\n"), Err(Error::InvalidSymbol)));
        assert_eq!(engine.get(), None);
    }

    #[test]
    fn test_custom_substitute_symbol() {
        let config = Builder::new()
            .lines(8)
            .unknown_token_policy(UnknownTokenPolicy::Substitute(Symbol::ZERO))
            .build()
            .unwrap();
        let (engine, _) = engine_with(config);
        assert_eq!(engine.set_char('?').unwrap(), Symbol::ZERO);
        assert_eq!(last_mask(&engine), Some(0x3F));
    }

    #[test]
    fn test_set_char_follows_policy() {
        let (strict, _) = strict_engine();
        assert_eq!(strict.set_char('b').unwrap(), Symbol::new(11).unwrap());
        assert!(matches!(strict.set_char('q'), Err(Error::InvalidSymbol)));

        let (legacy, _) = legacy_engine();
        assert_eq!(legacy.set_char('q').unwrap(), Symbol::EIGHT);
    }

    #[test]
    fn test_set_index_out_of_range() {
        let (engine, _) = legacy_engine();
        engine.set_index(9).unwrap();

        let result = engine.set_index(16);
        assert!(matches!(result, Err(Error::OutOfRange { index: 16 })));
        assert_eq!(engine.get(), Symbol::new(9));
        assert_eq!(last_mask(&engine), Some(0x6F));
    }

    #[test]
    fn test_failure_before_first_write_stays_uninitialized() {
        let (engine, fail) = strict_engine();
        fail.store(true, Ordering::SeqCst);
        assert!(matches!(engine.set(b"2"), Err(Error::OutputFailure(_))));
        assert_eq!(engine.state(), DisplayState::Uninitialized);
    }

    #[test]
    fn test_recovers_after_bus_failure() {
        let (engine, fail) = strict_engine();
        engine.set(b"7").unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(engine.set(b"6").is_err());
        assert_eq!(engine.get(), Symbol::new(7));

        fail.store(false, Ordering::SeqCst);
        assert_eq!(engine.set(b"6").unwrap(), Symbol::new(6).unwrap());
        assert_eq!(last_mask(&engine), Some(0x7D));
    }

    #[test]
    fn test_seven_lines_truncate_mask() {
        let config = Builder::new().lines(7).build().unwrap();
        let (engine, _) = engine_with(config);
        for symbol in Symbol::all() {
            engine.set_symbol(symbol).unwrap();
            let mask = last_mask(&engine).unwrap();
            assert_eq!(mask & 0x80, 0);
            assert_eq!(mask, encode(symbol).bits());
        }
    }

    #[test]
    fn test_three_lines_only_see_low_bits() {
        let config = Builder::new().lines(3).build().unwrap();
        let (engine, _) = engine_with(config);
        engine.set(b"8").unwrap();
        assert_eq!(last_mask(&engine), Some(0x07));
        assert_eq!(engine.line_count(), 3);
    }

    #[test]
    fn test_borrowed_bus_outlives_engine() {
        let (mut bus, _) = RecordingBus::new(8);
        {
            let config = Builder::new().lines(8).build().unwrap();
            let engine = DisplayEngine::new(&mut bus, config).unwrap();
            engine.set(b"f").unwrap();
        }
        assert_eq!(bus.last().map(SegmentMask::bits), Some(0x71));
    }

    #[test]
    fn test_noop_mutex_engine() {
        let (bus, _) = RecordingBus::new(8);
        let config = Builder::new().lines(8).build().unwrap();
        let engine: DisplayEngine<_, NoopRawMutex> =
            DisplayEngine::with_mutex(bus, config).unwrap();
        engine.set(b"e").unwrap();
        assert_eq!(engine.release().last().map(SegmentMask::bits), Some(0x79));
    }

    #[test]
    fn test_policy_accessor() {
        let (engine, _) = legacy_engine();
        assert_eq!(engine.unknown_token_policy(), UnknownTokenPolicy::LEGACY);
    }

    #[test]
    fn test_concurrent_readers_see_latched_symbol() {
        let (engine, _) = legacy_engine();
        engine.init().unwrap();

        std::thread::scope(|scope| {
            for writer in 0..4u8 {
                let engine = &engine;
                scope.spawn(move || {
                    for i in 0..200u8 {
                        let value = (writer * 4 + i) % 16;
                        engine.set_index(value).unwrap();
                        std::thread::yield_now();
                    }
                });
            }
            for _ in 0..4 {
                let engine = &engine;
                scope.spawn(move || {
                    for _ in 0..200 {
                        engine.inspect(|state, bus| {
                            let shown = state.symbol().map(encode);
                            assert_eq!(shown, bus.last());
                        });
                        std::thread::yield_now();
                    }
                });
            }
        });

        let total = engine.inspect(|_, bus| bus.applied.len());
        assert_eq!(total, 1 + 4 * 200);
        let final_mask = engine.get().map(encode);
        assert_eq!(final_mask, engine.inspect(|_, bus| bus.last()));
    }
}

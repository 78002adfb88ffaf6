//! # elwave — Elliott Wave detection and backtesting
//!
//! Detects impulsive (5-leg) and corrective (3-leg) Elliott Wave patterns
//! in a price series, projects Fibonacci price targets from the detected
//! wave, and evaluates the resulting signal against history.
//!
//! ## Quick Start
//!
//! ```rust
//! use elwave::prelude::*;
//!
//! // Build an analyzer (defaults: 3% zigzag threshold, 30-bar look-back)
//! let analyzer = AnalyzerBuilder::new()
//!     .threshold(0.03)
//!     .build()
//!     .unwrap();
//!
//! // Any slice of prices works; dated quotes implement `Quote` too
//! let prices = vec![100.0, 110.0, 106.0, 130.0, 124.0, 140.0];
//!
//! let waves = analyzer.analyze(&prices);
//! let prediction = analyzer.predict_next_move(&prices);
//! ```

pub mod advice;
pub mod backtest;
pub mod fib;
pub mod params;
pub mod pattern;
pub mod pivots;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::fib::FibLevels;
use crate::pattern::{WaveKind, WavePattern};

pub mod prelude {
    pub use crate::{
        // Advice
        advice::{recommend, AdviceAction, PriceTarget, TradeAdvice},
        // Parallel
        analyze_parallel,
        // Backtest
        backtest::{
            BacktestConfig, BacktestReport, Backtester, EquityPoint, Trade, TradeAction,
        },
        // Fibonacci
        fib::{FibLevels, FIB_RATIOS},
        // Parameters
        params::{get_period, get_ratio, ParamMeta, ParamType, Parameterized},
        // Patterns
        pattern::{WaveKind, WavePattern},
        // Pivots
        pivots::{candidate_pivots, classify, local_extrema, zigzag, Pivot, PivotKind},
        AnalysisResult,
        AnalyzerBuilder,
        AnalyzerConfig,
        CurrentWave,
        Direction,
        MoveDirection,
        Prediction,
        Result,
        Threshold,
        WaveAnalyzer,
        WaveCollection,
        // Errors
        WaveError,
        WaveRecord,
        Window,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors that can occur when configuring the analyzer
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaveError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Fraction in the open interval (0.0, 1.0) — reversal thresholds, risk
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Create a new Threshold, validating the value is in (0.0, 1.0)
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(WaveError::InvalidValue(
                "Threshold cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 || value >= 1.0 {
            return Err(WaveError::OutOfRange {
                field: "Threshold",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Threshold from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Threshold {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Threshold {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Threshold::new(value).map_err(serde::de::Error::custom)
    }
}

/// Bar or pivot count (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Window(usize);

impl Window {
    /// Create a new Window, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(WaveError::InvalidValue("Window must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Window {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Window {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Window::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// QUOTE TRAIT
// ============================================================

/// Core price data trait — one observation of the series.
///
/// Implemented for bare `f64` prices and for `(timestamp, price)` pairs,
/// so both plain arrays and dated series feed the analyzer directly.
pub trait Quote {
    fn price(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

impl Quote for f64 {
    #[inline]
    fn price(&self) -> f64 {
        *self
    }
}

impl Quote for (i64, f64) {
    #[inline]
    fn price(&self) -> f64 {
        self.1
    }

    #[inline]
    fn timestamp(&self) -> Option<i64> {
        Some(self.0)
    }
}

// ============================================================
// DIRECTIONS & PREDICTION
// ============================================================

/// Net direction of a price move
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, Direction::Up)
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, Direction::Down)
    }
}

/// Directional call for the next expected move
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// The larger trend is expected to resume
    Continuation,
    /// A correction of the completed move is expected
    Reversal,
    Undetermined,
}

/// Confidence assigned to a continuation call (after a corrective wave).
/// Policy value, not derived statistically.
pub const CONTINUATION_CONFIDENCE: f64 = 0.7;
/// Confidence assigned to a reversal call (after an impulse wave)
pub const REVERSAL_CONFIDENCE: f64 = 0.6;

/// Prediction for the next market move
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Prediction {
    pub direction: MoveDirection,
    /// In [0, 1]
    pub confidence: f64,
    pub target: Option<f64>,
}

// ============================================================
// WAVE COLLECTION
// ============================================================

/// One recognized wave: the pivot window it spans, the validated pattern,
/// and its 1-based running count within its category.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WaveRecord {
    pub pivot_indices: Vec<usize>,
    pub pattern: WavePattern,
    pub wave_count: usize,
}

/// Recognized waves grouped by category. Append-only accumulator owned by
/// one `analyze` call.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct WaveCollection {
    impulse: Vec<WaveRecord>,
    corrective: Vec<WaveRecord>,
    motive: Vec<WaveRecord>,
    diagonal: Vec<WaveRecord>,
}

impl WaveCollection {
    pub fn records(&self, kind: WaveKind) -> &[WaveRecord] {
        match kind {
            WaveKind::Impulse => &self.impulse,
            WaveKind::Corrective => &self.corrective,
            WaveKind::Motive => &self.motive,
            WaveKind::Diagonal => &self.diagonal,
        }
    }

    pub fn len(&self) -> usize {
        self.impulse.len() + self.corrective.len() + self.motive.len() + self.diagonal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_mut(&mut self, kind: WaveKind) -> &mut Vec<WaveRecord> {
        match kind {
            WaveKind::Impulse => &mut self.impulse,
            WaveKind::Corrective => &mut self.corrective,
            WaveKind::Motive => &mut self.motive,
            WaveKind::Diagonal => &mut self.diagonal,
        }
    }

    fn append(&mut self, kind: WaveKind, pivot_indices: Vec<usize>, pattern: WavePattern) {
        let list = self.list_mut(kind);
        let wave_count = list.len() + 1;
        list.push(WaveRecord {
            pivot_indices,
            pattern,
            wave_count,
        });
    }
}

/// The wave assessed as currently live, with its projected levels.
/// Recomputed on demand, never cached.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CurrentWave {
    pub kind: WaveKind,
    pub pattern: WavePattern,
    pub next_target: FibLevels,
}

// ============================================================
// ANALYZER
// ============================================================

/// Default number of bars inspected for the current wave
pub const DEFAULT_LOOK_BACK: usize = 30;
/// Default stop-loss fraction handed to the advice layer
pub const DEFAULT_RISK: f64 = 0.02;
/// Fixed zigzag threshold for the current-wave assessment
pub const CURRENT_WAVE_THRESHOLD: f64 = 0.03;

/// Analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalyzerConfig {
    /// Zigzag reversal threshold
    pub threshold: Threshold,
    /// Half-window for the local-extrema fallback
    pub window: Window,
    /// Bars inspected when assessing the current wave
    pub look_back: Window,
    /// Stop-loss fraction forwarded to trade advice
    pub risk: Threshold,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::new_const(pivots::DEFAULT_ZIGZAG_THRESHOLD),
            window: Window::new_const(pivots::DEFAULT_EXTREMA_WINDOW),
            look_back: Window::new_const(DEFAULT_LOOK_BACK),
            risk: Threshold::new_const(DEFAULT_RISK),
        }
    }
}

/// Elliott Wave analyzer over a price series.
///
/// Orchestrates pivot extraction, candidate-window enumeration and pattern
/// validation. Each call owns its own accumulator; the analyzer itself is
/// immutable and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct WaveAnalyzer {
    config: AnalyzerConfig,
}

impl WaveAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Candidate turning points for the full series, labeled peak/trough.
    pub fn pivot_points<T: Quote>(&self, quotes: &[T]) -> Vec<pivots::Pivot> {
        let prices: Vec<f64> = quotes.iter().map(Quote::price).collect();
        let indices = pivots::candidate_pivots(
            &prices,
            self.config.threshold.get(),
            self.config.window.get(),
        );
        pivots::classify(&prices, &indices)
    }

    /// Exhaustive overlapping-window scan for wave patterns.
    ///
    /// Every start offset in the pivot sequence is tried: a 6-pivot impulse
    /// window where six pivots remain, a 4-pivot corrective window where
    /// four remain. Valid patterns are appended under their category with a
    /// 1-based running count; a pivot may participate in many windows.
    pub fn analyze<T: Quote>(&self, quotes: &[T]) -> WaveCollection {
        let prices: Vec<f64> = quotes.iter().map(Quote::price).collect();
        let pivots = pivots::candidate_pivots(
            &prices,
            self.config.threshold.get(),
            self.config.window.get(),
        );
        trace!(candidates = pivots.len(), "derived candidate pivots");

        let mut waves = WaveCollection::default();
        for offset in 0..pivots.len() {
            for kind in [WaveKind::Impulse, WaveKind::Corrective] {
                let need = kind.expected_points();
                if offset + need > pivots.len() {
                    continue;
                }
                let window = &pivots[offset..offset + need];
                let pattern = WavePattern::new(kind, pivot_prices(&prices, window));
                if pattern.is_valid() {
                    waves.append(kind, window.to_vec(), pattern);
                }
            }
        }

        debug!(
            impulse = waves.records(WaveKind::Impulse).len(),
            corrective = waves.records(WaveKind::Corrective).len(),
            "wave scan complete"
        );
        waves
    }

    /// Assess the currently live wave over the most recent bars.
    ///
    /// Pivots are re-derived over the last `look_back` prices with the
    /// fixed [`CURRENT_WAVE_THRESHOLD`]; an impulse over the most recent
    /// six pivots is tried first, then a corrective over the most recent
    /// four as the fallback for a still-forming structure.
    pub fn find_current_wave<T: Quote>(&self, quotes: &[T]) -> Option<CurrentWave> {
        if quotes.is_empty() {
            return None;
        }

        let look_back = self.config.look_back.get().min(quotes.len());
        let offset = quotes.len() - look_back;
        let recent: Vec<f64> = quotes[offset..].iter().map(Quote::price).collect();

        let turning = pivots::zigzag(&recent, CURRENT_WAVE_THRESHOLD);
        let absolute: Vec<usize> = turning.iter().map(|&i| offset + i).collect();

        for kind in [WaveKind::Impulse, WaveKind::Corrective] {
            let need = kind.expected_points();
            if absolute.len() < need {
                continue;
            }
            let window = &absolute[absolute.len() - need..];
            let points: Vec<(usize, f64)> =
                window.iter().map(|&i| (i, quotes[i].price())).collect();
            let pattern = WavePattern::new(kind, points);
            if let Some(next_target) = pattern.next_target() {
                trace!(kind = kind.as_str(), "current wave identified");
                return Some(CurrentWave {
                    kind,
                    pattern,
                    next_target,
                });
            }
        }

        None
    }

    /// Directional call for the next move, derived from the current wave.
    ///
    /// A corrective wave predicts continuation of the larger trend at
    /// confidence [`CONTINUATION_CONFIDENCE`]; an impulse predicts a
    /// correction at [`REVERSAL_CONFIDENCE`]; no wave at all yields an
    /// undetermined call with zero confidence and no target.
    pub fn predict_next_move<T: Quote>(&self, quotes: &[T]) -> Prediction {
        Self::prediction_from(self.find_current_wave(quotes).as_ref())
    }

    /// Trade recommendation for the latest bar, using the configured risk
    /// fraction for the stop-loss distance.
    pub fn advise<T: Quote>(&self, quotes: &[T]) -> advice::TradeAdvice {
        let current = self.find_current_wave(quotes);
        let prediction = Self::prediction_from(current.as_ref());
        let price = quotes.last().map_or(0.0, Quote::price);
        advice::recommend(current.as_ref(), &prediction, price, self.config.risk.get())
    }

    fn prediction_from(current: Option<&CurrentWave>) -> Prediction {
        match current {
            None => Prediction {
                direction: MoveDirection::Undetermined,
                confidence: 0.0,
                target: None,
            },
            Some(wave) => match wave.kind {
                WaveKind::Corrective => Prediction {
                    direction: MoveDirection::Continuation,
                    confidence: CONTINUATION_CONFIDENCE,
                    target: wave.next_target.level(1.618),
                },
                _ => Prediction {
                    direction: MoveDirection::Reversal,
                    confidence: REVERSAL_CONFIDENCE,
                    target: wave.next_target.level(0.618),
                },
            },
        }
    }
}

fn pivot_prices(prices: &[f64], indices: &[usize]) -> Vec<(usize, f64)> {
    indices.iter().map(|&i| (i, prices[i])).collect()
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating [`WaveAnalyzer`] instances
pub struct AnalyzerBuilder {
    threshold: f64,
    window: usize,
    look_back: usize,
    risk: f64,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            threshold: pivots::DEFAULT_ZIGZAG_THRESHOLD,
            window: pivots::DEFAULT_EXTREMA_WINDOW,
            look_back: DEFAULT_LOOK_BACK,
            risk: DEFAULT_RISK,
        }
    }

    /// Zigzag reversal threshold (fraction, e.g. 0.03 = 3%)
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Half-window for the local-extrema fallback
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Bars inspected when assessing the current wave
    pub fn look_back(mut self, look_back: usize) -> Self {
        self.look_back = look_back;
        self
    }

    /// Stop-loss fraction forwarded to trade advice
    pub fn risk(mut self, risk: f64) -> Self {
        self.risk = risk;
        self
    }

    /// Build the analyzer, validating every parameter
    pub fn build(self) -> Result<WaveAnalyzer> {
        Ok(WaveAnalyzer {
            config: AnalyzerConfig {
                threshold: Threshold::new(self.threshold)?,
                window: Window::new(self.window)?,
                look_back: Window::new(self.look_back)?,
                risk: Threshold::new(self.risk)?,
            },
        })
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

/// Result of analyzing a single instrument
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub waves: WaveCollection,
}

/// Analyze multiple instruments in parallel.
///
/// Each closure gets its own accumulator; the analyzer is shared read-only.
pub fn analyze_parallel<'a, T, I>(analyzer: &WaveAnalyzer, instruments: I) -> Vec<AnalysisResult>
where
    T: Quote + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    instruments
        .into_par_iter()
        .map(|(symbol, quotes)| AnalysisResult {
            symbol: symbol.to_string(),
            waves: analyzer.analyze(quotes),
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================

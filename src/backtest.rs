//! Wave-strategy backtesting: single-position replay with equity accounting.
//!
//! The backtester walks the bounded price window one bar at a time and
//! re-runs the analyzer on exactly the data visible up to that bar — no
//! look-ahead anywhere. All state lives inside one `run` call.

use tracing::debug;

use crate::{MoveDirection, Quote, WaveAnalyzer};

// ============================================================
// DEFAULTS
// ============================================================

/// Default initial cash for a backtest run
pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;
/// Minimum prediction confidence required to act on a signal
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
/// Bars of history required before the first signal is evaluated
pub const DEFAULT_MIN_HISTORY: usize = 60;

// ============================================================
// CONFIG
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub min_confidence: f64,
    pub min_history: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_history: DEFAULT_MIN_HISTORY,
        }
    }
}

// ============================================================
// TRADES & EQUITY
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Trade {
    pub index: usize,
    pub timestamp: Option<i64>,
    pub action: TradeAction,
    pub price: f64,
    pub shares: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EquityPoint {
    pub index: usize,
    pub timestamp: Option<i64>,
    pub equity: f64,
}

/// Final result of a backtest run. Percentages throughout.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BacktestReport {
    pub initial_investment: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    /// Completed round trips (one buy plus one sell)
    pub num_trades: usize,
    pub win_rate: f64,
    pub avg_trade_return: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

// ============================================================
// BACKTESTER
// ============================================================

pub struct Backtester<'a> {
    analyzer: &'a WaveAnalyzer,
    config: BacktestConfig,
}

impl<'a> Backtester<'a> {
    pub fn new(analyzer: &'a WaveAnalyzer) -> Self {
        Self {
            analyzer,
            config: BacktestConfig::default(),
        }
    }

    pub fn with_config(analyzer: &'a WaveAnalyzer, config: BacktestConfig) -> Self {
        Self { analyzer, config }
    }

    #[inline]
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Replay the strategy over `quotes[start..=end]`.
    ///
    /// Out-of-range bounds are clamped to the nearest valid index; an empty
    /// window returns an empty report with `final_equity == initial_cash`.
    ///
    /// Strategy: flat + `Reversal` at sufficient confidence buys with all
    /// available cash; holding + `Continuation` at sufficient confidence
    /// liquidates fully. An equity point is recorded for every bar of the
    /// window whether or not a trade occurred.
    pub fn run<T: Quote>(&self, quotes: &[T], start: usize, end: usize) -> BacktestReport {
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve: Vec<EquityPoint> = Vec::new();

        if quotes.is_empty() {
            return self.finalize(trades, equity_curve);
        }

        let last = quotes.len() - 1;
        let start = start.min(last);
        let end = end.min(last);
        if end < start {
            return self.finalize(trades, equity_curve);
        }

        let mut cash = self.config.initial_cash;
        let mut shares = 0.0f64;

        for i in start..=end {
            let price = quotes[i].price();

            if i - start >= self.config.min_history && price > 0.0 {
                let visible = &quotes[start..=i];
                let prediction = self.analyzer.predict_next_move(visible);
                let confident = prediction.confidence >= self.config.min_confidence;

                if shares == 0.0
                    && cash > 0.0
                    && confident
                    && prediction.direction == MoveDirection::Reversal
                {
                    shares = cash / price;
                    cash = 0.0;
                    debug!(bar = i, price, shares, "opening position");
                    trades.push(Trade {
                        index: i,
                        timestamp: quotes[i].timestamp(),
                        action: TradeAction::Buy,
                        price,
                        shares,
                        value: shares * price,
                    });
                } else if shares > 0.0
                    && confident
                    && prediction.direction == MoveDirection::Continuation
                {
                    cash = shares * price;
                    debug!(bar = i, price, proceeds = cash, "closing position");
                    trades.push(Trade {
                        index: i,
                        timestamp: quotes[i].timestamp(),
                        action: TradeAction::Sell,
                        price,
                        shares,
                        value: cash,
                    });
                    shares = 0.0;
                }
            }

            equity_curve.push(EquityPoint {
                index: i,
                timestamp: quotes[i].timestamp(),
                equity: cash + shares * price,
            });
        }

        self.finalize(trades, equity_curve)
    }

    fn finalize(&self, trades: Vec<Trade>, equity_curve: Vec<EquityPoint>) -> BacktestReport {
        let initial = self.config.initial_cash;
        let final_equity = equity_curve.last().map_or(initial, |p| p.equity);
        let total_return = (final_equity / initial - 1.0) * 100.0;

        // Drawdown against the running equity peak, seeded with the stake.
        let mut peak = initial;
        let mut max_drawdown = 0.0f64;
        for point in &equity_curve {
            if point.equity > peak {
                peak = point.equity;
            }
            let drawdown = (peak - point.equity) / peak * 100.0;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        // Round-trip returns: consecutive buy/sell pairs.
        let mut returns: Vec<f64> = Vec::new();
        for pair in trades.chunks_exact(2) {
            if pair[0].action == TradeAction::Buy && pair[1].action == TradeAction::Sell {
                returns.push((pair[1].price / pair[0].price - 1.0) * 100.0);
            }
        }

        let num_trades = trades.len() / 2;
        let win_rate = if returns.is_empty() {
            0.0
        } else {
            returns.iter().filter(|&&r| r > 0.0).count() as f64 / returns.len() as f64 * 100.0
        };
        let avg_trade_return = if returns.is_empty() {
            0.0
        } else {
            returns.iter().sum::<f64>() / returns.len() as f64
        };

        debug!(
            num_trades,
            final_equity, total_return, max_drawdown, "backtest complete"
        );

        BacktestReport {
            initial_investment: initial,
            final_equity,
            total_return,
            max_drawdown,
            num_trades,
            win_rate,
            avg_trade_return,
            trades,
            equity_curve,
        }
    }
}

// ============================================================
// TESTS
// ============================================================

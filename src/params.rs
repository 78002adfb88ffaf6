//! Parameter metadata for the analyzer and backtester
//!
//! This module provides metadata about tunable parameters, enabling:
//! - Grid search optimization
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use elwave::params::{ParamMeta, ParamType, Parameterized};
//! use elwave::prelude::*;
//!
//! // Get parameter metadata for the analyzer
//! let params = AnalyzerConfig::param_meta();
//! for param in params {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::backtest::{BacktestConfig, DEFAULT_INITIAL_CASH};
use crate::{AnalyzerConfig, Result, Threshold, WaveError, Window};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Fractional value in (0, 1), e.g. a reversal threshold
  Ratio,
  /// Bar or pivot count (positive integer)
  Period,
}

/// Metadata for a single tunable parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "threshold")
  pub name: &'static str,
  /// Parameter type (Ratio or Period)
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Ratio parameter
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(WaveError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Ratio => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(WaveError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED CONFIG TRAIT
// ============================================================

/// Trait for configs that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of configs with custom parameter values
/// - Grid search optimization
pub trait Parameterized: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a config with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Threshold from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Threshold> {
  let value = params.get(key).copied().unwrap_or(default);
  Threshold::new(value)
}

/// Helper to get a Window from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Window> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  Window::new(value as usize)
}

// ============================================================
// IMPLEMENTATIONS
// ============================================================

static ANALYZER_PARAMS: [ParamMeta; 4] = [
  ParamMeta::ratio(
    "threshold",
    0.03,
    (0.01, 0.10, 0.01),
    "Zigzag reversal threshold as a fraction of the running extreme",
  ),
  ParamMeta::period("window", 10.0, (4.0, 20.0, 2.0), "Half-window for the local-extrema fallback"),
  ParamMeta::period(
    "look_back",
    30.0,
    (20.0, 60.0, 10.0),
    "Bars inspected when assessing the current wave",
  ),
  ParamMeta::ratio(
    "risk",
    0.02,
    (0.01, 0.05, 0.01),
    "Stop-loss distance as a fraction of the entry price",
  ),
];

impl Parameterized for AnalyzerConfig {
  fn param_meta() -> &'static [ParamMeta] {
    &ANALYZER_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      threshold: get_ratio(params, "threshold", 0.03)?,
      window: get_period(params, "window", 10)?,
      look_back: get_period(params, "look_back", 30)?,
      risk: get_ratio(params, "risk", 0.02)?,
    })
  }
}

static BACKTEST_PARAMS: [ParamMeta; 2] = [
  ParamMeta::ratio(
    "min_confidence",
    0.6,
    (0.5, 0.8, 0.05),
    "Minimum prediction confidence required to act on a signal",
  ),
  ParamMeta::period(
    "min_history",
    60.0,
    (30.0, 120.0, 10.0),
    "Bars of history required before the first signal is evaluated",
  ),
];

impl Parameterized for BacktestConfig {
  fn param_meta() -> &'static [ParamMeta] {
    &BACKTEST_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      initial_cash: DEFAULT_INITIAL_CASH,
      min_confidence: get_ratio(params, "min_confidence", 0.6)?.get(),
      min_history: get_period(params, "min_history", 60)?.get(),
    })
  }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_meta_ratio() {
    let meta = ParamMeta::ratio("test_ratio", 0.5, (0.3, 0.7, 0.1), "Test ratio parameter");

    assert_eq!(meta.name, "test_ratio");
    assert_eq!(meta.param_type, ParamType::Ratio);
    assert_eq!(meta.default, 0.5);
  }

  #[test]
  fn test_param_meta_period() {
    let meta = ParamMeta::period("test_period", 14.0, (10.0, 20.0, 2.0), "Test period parameter");

    assert_eq!(meta.name, "test_period");
    assert_eq!(meta.param_type, ParamType::Period);
    assert_eq!(meta.default, 14.0);
  }

  #[test]
  fn test_generate_grid() {
    let meta = ParamMeta::ratio("test", 0.5, (0.3, 0.7, 0.2), "Test");

    let grid = meta.generate_grid();
    assert_eq!(grid.len(), 3);
    assert!((grid[0] - 0.3).abs() < f64::EPSILON);
    assert!((grid[1] - 0.5).abs() < f64::EPSILON);
    assert!((grid[2] - 0.7).abs() < f64::EPSILON);
  }

  #[test]
  fn test_validate_ratio() {
    let meta = ParamMeta::ratio("test", 0.5, (0.3, 0.7, 0.1), "Test");

    assert!(meta.validate(0.5).is_ok());
    assert!(meta.validate(0.3).is_ok());
    assert!(meta.validate(0.7).is_ok());
    assert!(meta.validate(0.2).is_err());
    assert!(meta.validate(0.8).is_err());
  }

  #[test]
  fn test_validate_period() {
    let meta = ParamMeta::period("test", 14.0, (10.0, 20.0, 2.0), "Test");

    assert!(meta.validate(14.0).is_ok());
    assert!(meta.validate(10.0).is_ok());
    assert!(meta.validate(20.0).is_ok());
    assert!(meta.validate(8.0).is_err());
    assert!(meta.validate(22.0).is_err());
  }

  #[test]
  fn test_get_ratio_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 0.8);

    assert!((get_ratio(&params, "key1", 0.5).unwrap().get() - 0.8).abs() < f64::EPSILON);
    assert!((get_ratio(&params, "key2", 0.5).unwrap().get() - 0.5).abs() < f64::EPSILON);
  }

  #[test]
  fn test_get_period_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 20.0);

    assert_eq!(get_period(&params, "key1", 14).unwrap().get(), 20);
    assert_eq!(get_period(&params, "key2", 14).unwrap().get(), 14);
  }

  #[test]
  fn test_analyzer_config_with_params() {
    let mut params = HashMap::new();
    params.insert("threshold", 0.05);
    params.insert("look_back", 40.0);

    let config = AnalyzerConfig::with_params(&params).unwrap();
    assert!((config.threshold.get() - 0.05).abs() < f64::EPSILON);
    assert_eq!(config.look_back.get(), 40);
    // Missing parameters fall back to defaults.
    assert_eq!(config.window.get(), 10);
  }

  #[test]
  fn test_analyzer_config_rejects_bad_threshold() {
    let mut params = HashMap::new();
    params.insert("threshold", 1.5);
    assert!(AnalyzerConfig::with_params(&params).is_err());
  }

  #[test]
  fn test_backtest_config_with_params() {
    let mut params = HashMap::new();
    params.insert("min_confidence", 0.7);

    let config = BacktestConfig::with_params(&params).unwrap();
    assert!((config.min_confidence - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.min_history, 60);
    assert_eq!(config.initial_cash, DEFAULT_INITIAL_CASH);
  }
}

//! Fibonacci retracement and extension price grid.
//!
//! The sole price-target projection mechanism in the crate: every "next
//! target" a wave pattern produces is one of these levels.

/// The nine-ratio grid: retracements up to 1.0, extensions beyond.
pub const FIB_RATIOS: [f64; 9] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.272, 1.618];

/// Projected price levels between two prices.
///
/// Retracement levels (`ratio <= 1.0`) are `start + diff * ratio`;
/// extension levels are `end + diff * (ratio - 1.0)` in the direction of
/// the move. The 0.0 and 1.0 entries are exactly `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FibLevels {
    start: f64,
    end: f64,
    levels: [f64; 9],
}

impl FibLevels {
    /// Compute the level grid for a move from `start` to `end` (either order).
    pub fn between(start: f64, end: f64) -> Self {
        let diff = end - start;
        let mut levels = [0.0f64; 9];
        for (slot, &ratio) in levels.iter_mut().zip(FIB_RATIOS.iter()) {
            *slot = if ratio == 0.0 {
                start
            } else if ratio == 1.0 {
                end
            } else if ratio < 1.0 {
                start + diff * ratio
            } else {
                end + diff * (ratio - 1.0)
            };
        }
        Self { start, end, levels }
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Price at one of the grid ratios. `None` for a ratio outside the grid.
    pub fn level(&self, ratio: f64) -> Option<f64> {
        FIB_RATIOS
            .iter()
            .position(|&r| r == ratio)
            .map(|i| self.levels[i])
    }

    /// All `(ratio, price)` pairs in ascending ratio order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        FIB_RATIOS.iter().copied().zip(self.levels.iter().copied())
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let levels = FibLevels::between(103.37, 141.19);
        assert_eq!(levels.level(0.0), Some(103.37));
        assert_eq!(levels.level(1.0), Some(141.19));
    }

    #[test]
    fn test_retracement_levels_upward_move() {
        let levels = FibLevels::between(100.0, 200.0);
        assert!((levels.level(0.5).unwrap() - 150.0).abs() < 1e-12);
        assert!((levels.level(0.382).unwrap() - 138.2).abs() < 1e-9);
        assert!((levels.level(0.618).unwrap() - 161.8).abs() < 1e-9);
    }

    #[test]
    fn test_extension_levels_beyond_end() {
        let levels = FibLevels::between(100.0, 200.0);
        assert!((levels.level(1.272).unwrap() - 227.2).abs() < 1e-9);
        assert!((levels.level(1.618).unwrap() - 261.8).abs() < 1e-9);
    }

    #[test]
    fn test_downward_move_extends_down() {
        let levels = FibLevels::between(200.0, 100.0);
        assert!((levels.level(0.5).unwrap() - 150.0).abs() < 1e-12);
        assert!((levels.level(1.618).unwrap() - 38.2).abs() < 1e-9);
        assert!(levels.level(1.272).unwrap() < levels.end());
    }

    #[test]
    fn test_unknown_ratio_is_none() {
        let levels = FibLevels::between(100.0, 200.0);
        assert_eq!(levels.level(0.333), None);
    }

    #[test]
    fn test_iter_is_ordered_and_complete() {
        let levels = FibLevels::between(100.0, 200.0);
        let pairs: Vec<_> = levels.iter().collect();
        assert_eq!(pairs.len(), FIB_RATIOS.len());
        assert_eq!(pairs[0], (0.0, 100.0));
        assert_eq!(pairs[6], (1.0, 200.0));
    }
}

//! Turning-point extraction: local extrema and the zigzag filter.
//!
//! Pure, stateless functions over a price slice. The zigzag filter is the
//! primary pivot source; local extrema densify the candidate set when the
//! market is too quiet for the percentage filter to trigger.

// ============================================================
// DEFAULTS
// ============================================================

/// Default zigzag reversal threshold (3%)
pub const DEFAULT_ZIGZAG_THRESHOLD: f64 = 0.03;
/// Default half-window for local extrema detection
pub const DEFAULT_EXTREMA_WINDOW: usize = 10;
/// Minimum zigzag turning points before the extrema fallback kicks in
pub const MIN_ZIGZAG_PIVOTS: usize = 4;

// ============================================================
// PIVOT TYPE
// ============================================================

/// Extremum kind of a turning point
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotKind {
    Peak,
    Trough,
}

/// A turning point in the price series
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
    pub kind: PivotKind,
}

// ============================================================
// LOCAL EXTREMA
// ============================================================

/// Find local maxima and minima of `prices` within a symmetric half-window.
///
/// Index `i` qualifies as a maximum (resp. minimum) iff the full window
/// `[i-window, i+window]` fits inside the array and `prices[i]` is strictly
/// greater (resp. less) than every other price in it. Arrays shorter than
/// `2*window + 1` yield empty sets.
pub fn local_extrema(prices: &[f64], window: usize) -> (Vec<usize>, Vec<usize>) {
    let mut maxima = Vec::new();
    let mut minima = Vec::new();

    if window == 0 || prices.len() < 2 * window + 1 {
        return (maxima, minima);
    }

    for i in window..prices.len() - window {
        let p = prices[i];
        let neighborhood = prices[i - window..=i + window]
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != window);

        let mut is_max = true;
        let mut is_min = true;
        for (_, &other) in neighborhood {
            if p <= other {
                is_max = false;
            }
            if p >= other {
                is_min = false;
            }
            if !is_max && !is_min {
                break;
            }
        }

        if is_max {
            maxima.push(i);
        } else if is_min {
            minima.push(i);
        }
    }

    (maxima, minima)
}

// ============================================================
// ZIGZAG FILTER
// ============================================================

/// Collapse a noisy price series into significant turning points.
///
/// Maintains a trend direction (initially up) and a running extreme; a move
/// against the trend by more than `threshold` as a fraction of the running
/// extreme emits the extreme's index and flips the trend. The final running
/// extreme is appended so the filtered sequence spans the full input.
///
/// Output indices are strictly increasing and alternate peak/trough.
/// Deterministic for a given input and threshold.
pub fn zigzag(prices: &[f64], threshold: f64) -> Vec<usize> {
    if prices.is_empty() {
        return Vec::new();
    }

    let mut up_trend = true;
    let mut extreme = prices[0];
    let mut extreme_idx = 0usize;
    let mut turning = vec![0usize];

    for (i, &price) in prices.iter().enumerate().skip(1) {
        if up_trend {
            if price > extreme {
                extreme = price;
                extreme_idx = i;
            } else if price < extreme * (1.0 - threshold) {
                if turning.last() != Some(&extreme_idx) {
                    turning.push(extreme_idx);
                }
                up_trend = false;
                extreme = price;
                extreme_idx = i;
            }
        } else if price < extreme {
            extreme = price;
            extreme_idx = i;
        } else if price > extreme * (1.0 + threshold) {
            if turning.last() != Some(&extreme_idx) {
                turning.push(extreme_idx);
            }
            up_trend = true;
            extreme = price;
            extreme_idx = i;
        }
    }

    if turning.last() != Some(&extreme_idx) {
        turning.push(extreme_idx);
    }

    turning
}

// ============================================================
// CANDIDATE PIVOT POLICY
// ============================================================

/// Derive the candidate pivot set for wave enumeration.
///
/// Runs [`zigzag`] first; if fewer than [`MIN_ZIGZAG_PIVOTS`] turning points
/// result, the set is unioned with [`local_extrema`] output (deduplicated,
/// sorted) to densify candidates in quiet markets.
pub fn candidate_pivots(prices: &[f64], threshold: f64, window: usize) -> Vec<usize> {
    let mut pivots = zigzag(prices, threshold);

    if pivots.len() < MIN_ZIGZAG_PIVOTS {
        let (maxima, minima) = local_extrema(prices, window);
        pivots.extend(maxima);
        pivots.extend(minima);
        pivots.sort_unstable();
        pivots.dedup();
    }

    pivots
}

/// Label pivot indices as peaks or troughs.
///
/// Each pivot is compared against the next one in the sequence (the last
/// against its predecessor). A lone pivot is classified a trough, matching
/// the zigzag filter's initial up-trend assumption.
pub fn classify(prices: &[f64], indices: &[usize]) -> Vec<Pivot> {
    indices
        .iter()
        .enumerate()
        .map(|(k, &idx)| {
            let kind = if k + 1 < indices.len() {
                if prices[idx] > prices[indices[k + 1]] {
                    PivotKind::Peak
                } else {
                    PivotKind::Trough
                }
            } else if k > 0 {
                if prices[idx] > prices[indices[k - 1]] {
                    PivotKind::Peak
                } else {
                    PivotKind::Trough
                }
            } else {
                PivotKind::Trough
            };

            Pivot {
                index: idx,
                price: prices[idx],
                kind,
            }
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================

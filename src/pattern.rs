//! Elliott Wave pattern validation and next-target projection.
//!
//! A [`WavePattern`] is a value object: validity is derived once at
//! construction and queried, never raised. Rule-violating pivot windows are
//! simply invalid and get discarded by the analyzer.

use crate::fib::FibLevels;
use crate::Direction;

// ============================================================
// WAVE KIND
// ============================================================

/// Wave category. The analyzer only ever constructs `Impulse` and
/// `Corrective` candidates; `Diagonal` and `Motive` are retained for
/// callers that classify impulse variants themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveKind {
    Impulse,
    Corrective,
    Motive,
    Diagonal,
}

impl WaveKind {
    /// Number of pivot points the kind expects (legs + 1).
    #[inline]
    pub fn expected_points(self) -> usize {
        match self {
            WaveKind::Corrective => 4,
            WaveKind::Impulse | WaveKind::Motive | WaveKind::Diagonal => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WaveKind::Impulse => "impulse",
            WaveKind::Corrective => "corrective",
            WaveKind::Motive => "motive",
            WaveKind::Diagonal => "diagonal",
        }
    }
}

// ============================================================
// RETRACEMENT BAND
// ============================================================

/// Leg B of a corrective must retrace at least this fraction of leg A
pub const CORRECTIVE_RETRACE_MIN: f64 = 0.236;
/// ...and at most this fraction
pub const CORRECTIVE_RETRACE_MAX: f64 = 1.0;

// ============================================================
// WAVE PATTERN
// ============================================================

/// A labeled, ordered, immutable sequence of `(index, price)` pivots.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WavePattern {
    kind: WaveKind,
    points: Vec<(usize, f64)>,
    valid: bool,
}

impl WavePattern {
    /// Construct and validate. A wrong pivot count (or any rule violation)
    /// yields an invalid pattern, never an error.
    pub fn new(kind: WaveKind, points: Vec<(usize, f64)>) -> Self {
        let valid = validate(kind, &points);
        Self {
            kind,
            points,
            valid,
        }
    }

    #[inline]
    pub fn kind(&self) -> WaveKind {
        self.kind
    }

    #[inline]
    pub fn points(&self) -> &[(usize, f64)] {
        &self.points
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of legs (pivot count minus one).
    #[inline]
    pub fn wave_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Net direction of the whole pattern. `None` for a flat or empty one.
    pub fn direction(&self) -> Option<Direction> {
        let first = self.points.first()?.1;
        let last = self.points.last()?.1;
        if last > first {
            Some(Direction::Up)
        } else if last < first {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Project the likely next price levels from a valid pattern.
    ///
    /// * Impulse ending at P5: the expected correction retraces the whole
    ///   move, so the grid runs from P5 back toward P0 — its 0.382/0.618
    ///   entries are the canonical correction band.
    /// * Corrective ending at PC: the prior trend is expected to resume
    ///   with a move of the correction's own length beyond PC — the grid's
    ///   1.0/1.618 entries are the 100%/161.8% continuation targets.
    ///
    /// Returns `None` for invalid patterns.
    pub fn next_target(&self) -> Option<FibLevels> {
        if !self.valid {
            return None;
        }
        let first = self.points.first()?.1;
        let last = self.points.last()?.1;

        match self.kind {
            WaveKind::Impulse | WaveKind::Motive | WaveKind::Diagonal => {
                Some(FibLevels::between(last, first))
            }
            WaveKind::Corrective => {
                let length = (last - first).abs();
                // Resumption runs opposite to the correction itself.
                let dir = if last < first { 1.0 } else { -1.0 };
                Some(FibLevels::between(last, last + dir * length))
            }
        }
    }
}

// ============================================================
// VALIDATION RULES
// ============================================================

fn validate(kind: WaveKind, points: &[(usize, f64)]) -> bool {
    if points.len() != kind.expected_points() {
        return false;
    }
    match kind {
        WaveKind::Impulse => validate_impulse(points, false),
        WaveKind::Diagonal => validate_impulse(points, true),
        WaveKind::Corrective => validate_corrective(points),
        WaveKind::Motive => alternates(points),
    }
}

/// Indices strictly increasing, no zero-length leg, and leg directions
/// strictly alternating.
fn alternates(points: &[(usize, f64)]) -> bool {
    let mut prev_up: Option<bool> = None;
    for pair in points.windows(2) {
        if pair[1].0 <= pair[0].0 {
            return false;
        }
        let delta = pair[1].1 - pair[0].1;
        if delta == 0.0 {
            return false;
        }
        let up = delta > 0.0;
        if prev_up == Some(up) {
            return false;
        }
        prev_up = Some(up);
    }
    true
}

/// Impulse rules over P0..P5. `allow_overlap` relaxes the leg-4/leg-1
/// territory rule, which is what distinguishes a diagonal.
fn validate_impulse(points: &[(usize, f64)], allow_overlap: bool) -> bool {
    if !alternates(points) {
        return false;
    }

    let p: Vec<f64> = points.iter().map(|&(_, price)| price).collect();
    let up = p[1] > p[0];

    // Leg 2 must not retrace to or past the origin of leg 1.
    if up {
        if p[2] <= p[0] {
            return false;
        }
    } else if p[2] >= p[0] {
        return false;
    }

    // Leg 3 must be the longest of legs 1, 3, 5.
    let leg1 = (p[1] - p[0]).abs();
    let leg3 = (p[3] - p[2]).abs();
    let leg5 = (p[5] - p[4]).abs();
    if leg3 < leg1 || leg3 < leg5 {
        return false;
    }

    // Leg 4 must not enter leg 1's price territory.
    if !allow_overlap {
        let (lo1, hi1) = min_max(p[0], p[1]);
        let (lo4, hi4) = min_max(p[3], p[4]);
        if lo4 <= hi1 && lo1 <= hi4 {
            return false;
        }
    }

    true
}

/// Corrective rules over P0..P3 (legs A, B, C).
fn validate_corrective(points: &[(usize, f64)]) -> bool {
    if !alternates(points) {
        return false;
    }

    let leg_a = (points[1].1 - points[0].1).abs();
    let leg_b = (points[2].1 - points[1].1).abs();
    let retrace = leg_b / leg_a;

    (CORRECTIVE_RETRACE_MIN..=CORRECTIVE_RETRACE_MAX).contains(&retrace)
}

#[inline]
fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================
// TESTS
// ============================================================

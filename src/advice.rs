//! Trade recommendation derived from the current wave and its prediction.
//!
//! Pure function of the assessment: picks the two Fibonacci levels matching
//! the predicted direction, sets a stop-loss from the caller's risk
//! fraction, and reports the resulting risk/reward ratios.

use crate::{CurrentWave, MoveDirection, Prediction};

/// Predictions below this confidence produce a `Hold`
pub const MIN_ADVICE_CONFIDENCE: f64 = 0.5;

// ============================================================
// TYPES
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceAction {
    Buy,
    Sell,
    Hold,
}

/// A projected price level with its distance from entry.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PriceTarget {
    pub price: f64,
    /// Percent change from the entry price
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TradeAdvice {
    pub action: AdviceAction,
    pub reason: String,
    pub entry: f64,
    pub targets: Vec<PriceTarget>,
    pub stop_loss: Option<f64>,
    pub risk_reward: Vec<f64>,
}

impl TradeAdvice {
    fn hold(entry: f64, reason: &str) -> Self {
        Self {
            action: AdviceAction::Hold,
            reason: reason.to_string(),
            entry,
            targets: Vec::new(),
            stop_loss: None,
            risk_reward: Vec::new(),
        }
    }
}

// ============================================================
// RECOMMENDATION
// ============================================================

/// Derive a trade recommendation from the current wave assessment.
///
/// `risk` is the stop-loss distance as a fraction of the entry price.
/// An absent wave or a confidence below [`MIN_ADVICE_CONFIDENCE`] yields a
/// `Hold` with no levels.
pub fn recommend(
    current: Option<&CurrentWave>,
    prediction: &Prediction,
    current_price: f64,
    risk: f64,
) -> TradeAdvice {
    let Some(wave) = current else {
        return TradeAdvice::hold(
            current_price,
            "insufficient wave structure or low confidence",
        );
    };
    if prediction.confidence < MIN_ADVICE_CONFIDENCE {
        return TradeAdvice::hold(
            current_price,
            "insufficient wave structure or low confidence",
        );
    }

    // Levels matching the predicted direction: the continuation pair after
    // a correction, the retracement band after an impulse.
    let ratios: [f64; 2] = match prediction.direction {
        MoveDirection::Continuation => [1.0, 1.618],
        MoveDirection::Reversal => [0.382, 0.618],
        MoveDirection::Undetermined => {
            return TradeAdvice::hold(current_price, "no directional call");
        }
    };

    let targets: Vec<PriceTarget> = ratios
        .iter()
        .filter_map(|&r| wave.next_target.level(r))
        .map(|price| PriceTarget {
            price,
            change_pct: (price - current_price) / current_price * 100.0,
        })
        .collect();

    let Some(first) = targets.first() else {
        return TradeAdvice::hold(current_price, "no projectable target");
    };

    let expecting_rise = first.price > current_price;
    let (action, stop_loss) = if expecting_rise {
        (AdviceAction::Buy, current_price * (1.0 - risk))
    } else {
        (AdviceAction::Sell, current_price * (1.0 + risk))
    };

    let risk_amount = (current_price - stop_loss).abs();
    let risk_reward = targets
        .iter()
        .map(|t| {
            let reward = if expecting_rise {
                t.price - current_price
            } else {
                current_price - t.price
            };
            if risk_amount > 0.0 {
                reward / risk_amount
            } else {
                0.0
            }
        })
        .collect();

    let trend = if expecting_rise { "upward" } else { "downward" };
    let reason = match prediction.direction {
        MoveDirection::Continuation => format!(
            "{} continuation expected after a {} wave",
            trend,
            wave.kind.as_str()
        ),
        _ => format!(
            "{} correction expected after a {} wave",
            trend,
            wave.kind.as_str()
        ),
    };

    TradeAdvice {
        action,
        reason,
        entry: current_price,
        targets,
        stop_loss: Some(stop_loss),
        risk_reward,
    }
}

// ============================================================
// TESTS
// ============================================================

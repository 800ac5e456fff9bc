use serde::{Deserialize, Serialize};

/// Classic floor-trader pivot levels derived from one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pivot: f64,
    pub resistance_1: f64,
    pub resistance_2: f64,
    pub resistance_3: f64,
    pub support_1: f64,
    pub support_2: f64,
    pub support_3: f64,
}

impl PivotLevels {
    /// Labelled view of the levels, pivot first, then resistances, then supports.
    pub fn as_pairs(&self) -> [(&'static str, f64); 7] {
        [
            ("Pivot Point", self.pivot),
            ("Resistance 1", self.resistance_1),
            ("Resistance 2", self.resistance_2),
            ("Resistance 3", self.resistance_3),
            ("Support 1", self.support_1),
            ("Support 2", self.support_2),
            ("Support 3", self.support_3),
        ]
    }

    pub fn supports(&self) -> [f64; 3] {
        [self.support_1, self.support_2, self.support_3]
    }

    pub fn resistances(&self) -> [f64; 3] {
        [self.resistance_1, self.resistance_2, self.resistance_3]
    }
}

/// Round `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/*
--------------------------------------------------------------------------------
   Pivot point and three support/resistance levels from a reference bar's
   high, low and close. Returns None if any input is not finite.
--------------------------------------------------------------------------------
*/
pub fn pivot_points(high: f64, low: f64, close: f64) -> Option<PivotLevels> {
    if !(high.is_finite() && low.is_finite() && close.is_finite()) {
        return None;
    }

    let pivot = (high + low + close) / 3.0;
    let range = high - low;

    Some(PivotLevels {
        pivot: round_to(pivot, 2),
        resistance_1: round_to(2.0 * pivot - low, 2),
        resistance_2: round_to(pivot + range, 2),
        resistance_3: round_to(high + 2.0 * (pivot - low), 2),
        support_1: round_to(2.0 * pivot - high, 2),
        support_2: round_to(pivot - range, 2),
        support_3: round_to(low - 2.0 * (high - pivot), 2),
    })
}

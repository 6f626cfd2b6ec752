//! Black-Scholes delta for the published chain.

use std::f64::consts::SQRT_2;

use serde::Serialize;
use statrs::function::erf::erfc;

use crate::chain::{Side, StrikeRow};

/// Standard normal cumulative distribution Φ(x).
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Black-Scholes delta.
///
/// `sigma` is a decimal fraction (15% IV is `0.15`) and `t` is in years.
/// Expired options (`t <= 0`) and missing volatility (`sigma == 0`) return
/// exactly `0.0`. Any other `sigma`, negative included, goes through the
/// formula as given. `strike` must be positive; the parser never retains rows
/// that break this.
pub fn delta(spot: f64, strike: f64, t: f64, rate: f64, sigma: f64, side: Side) -> f64 {
    if t <= 0.0 || sigma == 0.0 {
        return 0.0;
    }
    let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let n = norm_cdf(d1);
    match side {
        Side::Call => n,
        Side::Put => n - 1.0,
    }
}

/// Round to two decimals for display, ties to even. Negative zero comes out
/// as `0.0`.
pub fn round2(x: f64) -> f64 {
    let r = (x * 100.0).round_ties_even() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

/// Cycle-wide pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GreekInputs {
    /// Years to expiry.
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
}

impl GreekInputs {
    pub fn new(days_to_expiry: f64, risk_free_rate: f64) -> Self {
        GreekInputs {
            time_to_expiry: days_to_expiry / 365.0,
            risk_free_rate,
        }
    }
}

/// Rounded call and put delta for one strike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GreekResult {
    pub call_delta: f64,
    pub put_delta: f64,
}

impl GreekResult {
    /// Deltas for both legs of `row`, using each leg's own IV (percent).
    pub fn for_row(spot: f64, row: &StrikeRow, inputs: &GreekInputs) -> Self {
        let side_delta = |side: Side| {
            let sigma = row.leg(side).implied_volatility / 100.0;
            round2(delta(
                spot,
                row.strike,
                inputs.time_to_expiry,
                inputs.risk_free_rate,
                sigma,
                side,
            ))
        };
        GreekResult {
            call_delta: side_delta(Side::Call),
            put_delta: side_delta(Side::Put),
        }
    }
}

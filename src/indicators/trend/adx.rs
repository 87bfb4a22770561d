//! ADX (Average Directional Index) indicator

use crate::common::math;

pub const ADX_PERIOD: usize = 14;

/// Calculate the ADX series
///
/// ADX measures trend strength regardless of direction. +DI/-DI come from
/// Wilder-smoothed directional movement over the true range, DX from their
/// spread, and ADX is the Wilder average of DX. The first value lands on row
/// `2 * period - 1`.
pub fn adx_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut out = vec![None; n];
    if period == 0 || n < 2 {
        return out;
    }

    let mut tr_values = Vec::with_capacity(n - 1);
    let mut plus_dm_values = Vec::with_capacity(n - 1);
    let mut minus_dm_values = Vec::with_capacity(n - 1);

    for i in 1..n {
        tr_values.push(math::true_range(highs[i], lows[i], closes[i - 1]));

        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];
        plus_dm_values.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm_values.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
    }

    let smoothed_tr = math::wilder_series(&tr_values, period);
    let smoothed_plus = math::wilder_series(&plus_dm_values, period);
    let smoothed_minus = math::wilder_series(&minus_dm_values, period);

    let dx: Vec<Option<f64>> = (0..tr_values.len())
        .map(|j| {
            let tr = smoothed_tr[j]?;
            let plus = smoothed_plus[j]?;
            let minus = smoothed_minus[j]?;
            if tr <= 0.0 {
                return Some(0.0);
            }
            let plus_di = 100.0 * plus / tr;
            let minus_di = 100.0 * minus / tr;
            let di_sum = plus_di + minus_di;
            Some(if di_sum > 0.0 {
                100.0 * (plus_di - minus_di).abs() / di_sum
            } else {
                0.0
            })
        })
        .collect();

    let adx = math::apply_to_defined(&dx, |v| math::wilder_series(v, period));
    for (j, value) in adx.into_iter().enumerate() {
        out[j + 1] = value;
    }
    out
}

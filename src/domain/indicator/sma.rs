//! Simple Moving Average.
//!
//! SMA(n)[i] = (V[i-n+1] + ... + V[i]) / n
//! Warmup: first (n-1) entries are undefined. Any undefined entry inside the
//! window makes the output undefined.

use super::Window;

pub fn moving_average(values: &[Option<f64>], window: Window) -> Vec<Option<f64>> {
    let period = window.get();

    (0..values.len())
        .map(|i| {
            if i < window.warmup() {
                return None;
            }
            values[i + 1 - period..=i]
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / period as f64)
        })
        .collect()
}

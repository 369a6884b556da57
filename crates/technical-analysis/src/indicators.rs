use analysis_core::{mean, population_std_dev, round2, Observation};
use serde::{Deserialize, Serialize};

/// Closing prices with missing or invalid closes read as zero.
pub fn closes(data: &[Observation]) -> Vec<f64> {
    data.iter().map(|o| o.valid_close().unwrap_or(0.0)).collect()
}

/// Maps index `i` of an indicator series of length `series_len`, computed
/// from a source of length `source_len`, back to its source index.
pub fn source_index(source_len: usize, series_len: usize, i: usize) -> Option<usize> {
    if i >= series_len || series_len > source_len {
        return None;
    }
    Some(i + (source_len - series_len))
}

/// Valid closes of every `period`-long window, oldest first. Windows without
/// a single valid close are dropped.
fn valid_windows(data: &[Observation], period: usize) -> impl Iterator<Item = Vec<f64>> + '_ {
    let start = period.saturating_sub(1);
    let end = if period == 0 { 0 } else { data.len() };
    (start..end).filter_map(move |i| {
        let window: Vec<f64> = data[i + 1 - period..=i]
            .iter()
            .filter_map(Observation::valid_close)
            .collect();
        (!window.is_empty()).then_some(window)
    })
}

/// Simple Moving Average of closes, averaging only the valid closes of each window
pub fn sma(data: &[Observation], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    valid_windows(data, period).map(|window| round2(mean(&window))).collect()
}

/// Exponential Moving Average.
///
/// Seeded with the mean of the first `period` values; every step is rounded
/// to cents before feeding the next one.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let value = |v: f64| if v.is_finite() { v } else { 0.0 };
    let multiplier = 2.0 / (period as f64 + 1.0);

    let seed = data[..period].iter().map(|&v| value(v)).sum::<f64>() / period as f64;
    let mut result = Vec::with_capacity(data.len() - period + 1);
    result.push(round2(seed));

    for &raw in &data[period..] {
        let prev = result[result.len() - 1];
        result.push(round2(value(raw) * multiplier + prev * (1.0 - multiplier)));
    }

    result
}

/// Relative Strength Index.
///
/// Each output averages the gains and losses of one window of `period`
/// consecutive close-to-close changes over the full window length.
pub fn rsi(data: &[Observation], period: usize) -> Vec<f64> {
    if period == 0 || data.len() <= period {
        return vec![];
    }

    let changes: Vec<f64> = data
        .windows(2)
        .map(|pair| match (pair[0].valid_close(), pair[1].valid_close()) {
            (Some(prev), Some(curr)) => curr - prev,
            _ => 0.0,
        })
        .collect();

    changes
        .windows(period)
        .map(|window| {
            let gains: f64 = window.iter().filter(|&&c| c > 0.0).sum();
            let losses: f64 = window.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum();
            let avg_gain = gains / period as f64;
            let avg_loss = losses / period as f64;

            if avg_loss == 0.0 {
                100.0
            } else {
                round2(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
            }
        })
        .collect()
}

/// MACD (Moving Average Convergence Divergence)
///
/// Every series is tail-aligned with the source: the signal line and the
/// histogram line up with the last `signal_line.len()` points of `macd_line`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[Observation], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    if fast_period == 0 || slow_period == 0 || signal_period == 0 || slow_period < fast_period {
        return MacdResult::default();
    }

    let prices = closes(data);
    let ema_fast = ema(&prices, fast_period);
    let ema_slow = ema(&prices, slow_period);
    if ema_slow.is_empty() {
        return MacdResult::default();
    }

    let offset = ema_fast.len() - ema_slow.len();
    let macd_line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, slow)| round2(ema_fast[i + offset] - slow))
        .collect();

    let signal_line = ema(&macd_line, signal_period);

    let hist_offset = macd_line.len() - signal_line.len();
    let histogram = signal_line
        .iter()
        .enumerate()
        .map(|(i, signal)| round2(macd_line[i + hist_offset] - signal))
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(data: &[Observation], period: usize, std_dev: f64) -> BollingerBands {
    if period == 0 || data.len() < period {
        return BollingerBands::default();
    }

    let mut bands = BollingerBands::default();
    for window in valid_windows(data, period) {
        // Deviation is taken around the rounded middle band, as reported
        let middle = round2(mean(&window));
        let sigma = population_std_dev(&window, middle);

        bands.upper.push(round2(middle + std_dev * sigma));
        bands.middle.push(middle);
        bands.lower.push(round2(middle - std_dev * sigma));
    }

    bands
}

/// Traded volume aggregated into one price bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeLevel {
    /// Bin midpoint
    pub price: f64,
    pub volume: f64,
}

/// Volume profile over `levels` equal-width price bins, lowest price first.
///
/// Bins are half-open `[lower, upper)`, so points closing exactly at the
/// highest price fall outside every bin. A flat price range yields
/// zero-width bins with no volume.
pub fn volume_profile(data: &[Observation], levels: usize) -> Vec<VolumeLevel> {
    let points: Vec<(f64, f64)> = data
        .iter()
        .filter_map(|o| match (o.valid_close(), o.valid_volume()) {
            (Some(close), Some(volume)) if close > 0.0 && volume > 0.0 => Some((close, volume)),
            _ => None,
        })
        .collect();

    if points.is_empty() || levels == 0 {
        return vec![];
    }

    let min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / levels as f64;

    (0..levels)
        .map(|level| {
            let lower = min + level as f64 * step;
            let upper = lower + step;
            let volume = points
                .iter()
                .filter(|(close, _)| *close >= lower && *close < upper)
                .map(|(_, volume)| volume)
                .sum();
            VolumeLevel {
                price: round2(lower + step / 2.0),
                volume,
            }
        })
        .collect()
}

use analysis_core::{EngineConfig, Observation};
use serde::{Deserialize, Serialize};

use crate::indicators::*;

/// Every indicator series for one sanitized sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSnapshot {
    pub source_len: usize,
    pub sma_short: Vec<f64>,
    pub sma_long: Vec<f64>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: MacdResult,
    pub bollinger: BollingerBands,
    pub volume_profile: Vec<VolumeLevel>,
    pub latest: LatestReadings,
}

/// Last value of each series, absent when the series is empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReadings {
    pub close: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

pub struct TechnicalAnalysisEngine {
    config: EngineConfig,
}

impl TechnicalAnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute all indicators. The independent series are evaluated in
    /// parallel; each one only reads `data`.
    pub fn snapshot(&self, data: &[Observation]) -> TechnicalSnapshot {
        let c = &self.config;

        let ((sma_short, sma_long), (rsi_values, bollinger)) = rayon::join(
            || rayon::join(|| sma(data, c.sma_short_period), || sma(data, c.sma_long_period)),
            || {
                rayon::join(
                    || rsi(data, c.rsi_period),
                    || bollinger_bands(data, c.bollinger_period, c.bollinger_std_dev),
                )
            },
        );

        let ((ema_fast, ema_slow), (macd_result, profile)) = rayon::join(
            || {
                let prices = closes(data);
                (ema(&prices, c.ema_fast_period), ema(&prices, c.ema_slow_period))
            },
            || {
                rayon::join(
                    || macd(data, c.ema_fast_period, c.ema_slow_period, c.macd_signal_period),
                    || volume_profile(data, c.volume_profile_levels),
                )
            },
        );

        let latest = LatestReadings {
            close: data.last().and_then(Observation::valid_close),
            sma_short: sma_short.last().copied(),
            sma_long: sma_long.last().copied(),
            rsi: rsi_values.last().copied(),
            macd: macd_result.macd_line.last().copied(),
            macd_signal: macd_result.signal_line.last().copied(),
            macd_histogram: macd_result.histogram.last().copied(),
            bollinger_upper: bollinger.upper.last().copied(),
            bollinger_lower: bollinger.lower.last().copied(),
        };

        tracing::debug!(
            points = data.len(),
            rsi_len = rsi_values.len(),
            macd_len = macd_result.macd_line.len(),
            bollinger_len = bollinger.middle.len(),
            "computed technical snapshot"
        );

        TechnicalSnapshot {
            source_len: data.len(),
            sma_short,
            sma_long,
            ema_fast,
            ema_slow,
            rsi: rsi_values,
            macd: macd_result,
            bollinger,
            volume_profile: profile,
            latest,
        }
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

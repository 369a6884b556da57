use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Tunable constants of the analysis engine. Defaults are the standard
/// indicator settings the recommendation rules were calibrated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub macd_signal_period: usize,
    pub volume_profile_levels: usize,
    /// Trailing points used for the price-change statistic
    pub trend_window: usize,
    pub dcf: DcfParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            sma_short_period: 20,
            sma_long_period: 50,
            ema_fast_period: 12,
            ema_slow_period: 26,
            macd_signal_period: 9,
            volume_profile_levels: 10,
            trend_window: 20,
            dcf: DcfParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("bollinger_period", self.bollinger_period),
            ("sma_short_period", self.sma_short_period),
            ("sma_long_period", self.sma_long_period),
            ("ema_fast_period", self.ema_fast_period),
            ("ema_slow_period", self.ema_slow_period),
            ("macd_signal_period", self.macd_signal_period),
            ("volume_profile_levels", self.volume_profile_levels),
            ("trend_window", self.trend_window),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(AnalysisError::InvalidData(format!("{name} must be at least 1")));
            }
        }
        if self.ema_fast_period > self.ema_slow_period {
            return Err(AnalysisError::InvalidData(
                "ema_fast_period must not exceed ema_slow_period".to_string(),
            ));
        }
        if !self.bollinger_std_dev.is_finite() || self.bollinger_std_dev < 0.0 {
            return Err(AnalysisError::InvalidData(
                "bollinger_std_dev must be a non-negative number".to_string(),
            ));
        }
        self.dcf.validate()
    }
}

/// Discounted-earnings projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DcfParams {
    pub growth_rate: f64,
    pub discount_rate: f64,
    pub terminal_multiple: f64,
    pub years: u32,
}

impl Default for DcfParams {
    fn default() -> Self {
        Self {
            growth_rate: 0.07,
            discount_rate: 0.09,
            terminal_multiple: 15.0,
            years: 10,
        }
    }
}

impl DcfParams {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(AnalysisError::InvalidData("discount_rate must be greater than -1".to_string()));
        }
        if !self.growth_rate.is_finite() || !self.terminal_multiple.is_finite() {
            return Err(AnalysisError::InvalidData("DCF parameters must be finite".to_string()));
        }
        if self.years == 0 {
            return Err(AnalysisError::InvalidData("years must be at least 1".to_string()));
        }
        Ok(())
    }
}

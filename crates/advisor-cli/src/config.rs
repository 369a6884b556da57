use std::env;
use std::str::FromStr;

use analysis_core::EngineConfig;
use anyhow::{Context, Result};

/// Build the engine configuration from `ADVISOR_*` environment variables.
/// Unset variables keep their defaults.
pub fn from_env() -> Result<EngineConfig> {
    from_lookup(|key| env::var(key).ok())
}

pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<EngineConfig> {
    let defaults = EngineConfig::default();

    let mut config = EngineConfig {
        rsi_period: read(&lookup, "ADVISOR_RSI_PERIOD", defaults.rsi_period)?,
        bollinger_period: read(&lookup, "ADVISOR_BOLLINGER_PERIOD", defaults.bollinger_period)?,
        bollinger_std_dev: read(&lookup, "ADVISOR_BOLLINGER_STD_DEV", defaults.bollinger_std_dev)?,
        volume_profile_levels: read(&lookup, "ADVISOR_VOLUME_LEVELS", defaults.volume_profile_levels)?,
        trend_window: read(&lookup, "ADVISOR_TREND_WINDOW", defaults.trend_window)?,
        ..defaults
    };
    config.dcf.growth_rate = read(&lookup, "ADVISOR_DCF_GROWTH", config.dcf.growth_rate)?;
    config.dcf.discount_rate = read(&lookup, "ADVISOR_DCF_DISCOUNT", config.dcf.discount_rate)?;
    config.dcf.terminal_multiple =
        read(&lookup, "ADVISOR_DCF_TERMINAL_MULTIPLE", config.dcf.terminal_multiple)?;

    config.validate().context("invalid advisor configuration")?;
    Ok(config)
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid value: {raw:?}")),
        _ => Ok(default),
    }
}

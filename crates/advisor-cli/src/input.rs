use std::fs;
use std::path::Path;

use analysis_core::FundamentalsRecord;
use anyhow::{Context, Result};
use fundamental_analysis::DividendPoint;
use serde::Deserialize;
use serde_json::Value;

/// Payload of the `analyze` command. Observations stay raw JSON so that
/// malformed entries reach the sanitizer instead of failing the decode.
#[derive(Debug, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub observations: Vec<Value>,
    #[serde(default)]
    pub fundamentals: Option<FundamentalsRecord>,
}

pub fn read_analysis_input(path: &Path) -> Result<AnalysisInput> {
    let text = read(path)?;
    parse_analysis_input(&text).with_context(|| format!("failed to decode {}", path.display()))
}

pub fn parse_analysis_input(text: &str) -> Result<AnalysisInput> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_dividend_history(path: &Path) -> Result<Vec<DividendPoint>> {
    let text = read(path)?;
    serde_json::from_str(&text).with_context(|| format!("failed to decode {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observations_with_fundamentals() {
        let input = parse_analysis_input(
            r#"{
                "observations": [
                    {"date": "2024-01-02", "close": 101.5, "volume": 1200},
                    null,
                    {"date": "2024-01-03", "close": "n/a"}
                ],
                "fundamentals": {
                    "pe": 16.8, "eps": 4.2, "roe": 0.15, "debtToEquity": 0.45,
                    "currentRatio": 2.1, "quickRatio": 1.7, "profitMargin": 0.14,
                    "dividendYield": 0.025
                }
            }"#,
        )
        .unwrap();

        assert_eq!(input.observations.len(), 3);
        assert!(input.observations[1].is_null());
        let fundamentals = input.fundamentals.unwrap();
        assert_eq!(fundamentals.debt_to_equity, 0.45);
        assert_eq!(fundamentals.dividend_yield, 0.025);
    }

    #[test]
    fn test_fundamentals_optional() {
        let input = parse_analysis_input(r#"{"observations": []}"#).unwrap();
        assert!(input.observations.is_empty());
        assert!(input.fundamentals.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_analysis_input("{\"observations\": [").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_dividend_history(Path::new("/nonexistent/dividends.json")).unwrap_err();
        assert!(err.to_string().contains("dividends.json"));
    }
}

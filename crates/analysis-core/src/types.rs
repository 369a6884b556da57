use serde::{Deserialize, Serialize};

use crate::numeric::numeric;

/// A single dated observation: a price/volume bar in market mode, or a scored
/// document in document mode. Every numeric field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Document sentiment in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
    /// Confidence of the sentiment reading in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl Observation {
    /// Market observation with only a date and a closing price.
    pub fn with_close(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            close: Some(close),
            ..Default::default()
        }
    }

    /// Document observation with only a date and a sentiment reading.
    pub fn with_sentiment(date: impl Into<String>, sentiment: f64) -> Self {
        Self {
            date: date.into(),
            sentiment: Some(sentiment),
            ..Default::default()
        }
    }

    pub fn valid_close(&self) -> Option<f64> {
        numeric(self.close)
    }

    pub fn valid_volume(&self) -> Option<f64> {
        numeric(self.volume)
    }

    pub fn valid_sentiment(&self) -> Option<f64> {
        numeric(self.sentiment)
    }

    pub fn valid_confidence(&self) -> Option<f64> {
        numeric(self.confidence)
    }
}

/// Whether an input sequence carries prices or document sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Market,
    Document,
}

impl DataMode {
    /// `Market` when any observation has a usable close, `Document` when only
    /// sentiment readings are present. Must be called on unsanitized input,
    /// since sanitization copies sentiment into `close`.
    pub fn detect(observations: &[Observation]) -> Self {
        if observations.iter().any(|o| o.valid_close().is_some()) {
            DataMode::Market
        } else if observations.iter().any(|o| o.valid_sentiment().is_some()) {
            DataMode::Document
        } else {
            DataMode::Market
        }
    }
}

/// Company fundamentals snapshot. Ratios are fractions (0.15 = 15%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsRecord {
    pub pe: f64,
    pub eps: f64,
    pub roe: f64,
    pub debt_to_equity: f64,
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub profit_margin: f64,
    pub dividend_yield: f64,
}

/// Fundamental sub-scores, each in [0, 10]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub value_score: f64,
    pub growth_score: f64,
    pub stability_score: f64,
    pub overall_score: f64,
}

/// Five-way investment recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationKind {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl RecommendationKind {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            RecommendationKind::StrongBuy
        } else if score > 0.3 {
            RecommendationKind::Buy
        } else if score < -0.8 {
            RecommendationKind::StrongSell
        } else if score < -0.3 {
            RecommendationKind::Sell
        } else {
            RecommendationKind::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::StrongBuy => "STRONG BUY",
            RecommendationKind::Buy => "BUY",
            RecommendationKind::Hold => "HOLD",
            RecommendationKind::Sell => "SELL",
            RecommendationKind::StrongSell => "STRONG SELL",
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final recommendation with its supporting and opposing evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub recommendation: RecommendationKind,
    /// 0.3 to 0.9
    pub confidence: f64,
    pub positive_points: Vec<String>,
    pub negative_points: Vec<String>,
    pub summary: String,
}

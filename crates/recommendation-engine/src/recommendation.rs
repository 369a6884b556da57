use analysis_core::{
    evaluate_chains, AnalysisError, EngineConfig, FundamentalsRecord, Observation, Polarity, Recommendation,
    RecommendationKind, Rule, RuleChain, ValueFormat,
};
use fundamental_analysis::FundamentalAnalysisEngine;
use technical_analysis::rsi;

const BASE_CONFIDENCE: f64 = 0.5;
const MIN_CONFIDENCE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 0.9;
/// RSI reading used when the sequence is too short for one
const NEUTRAL_RSI: f64 = 50.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
/// Directional score shift applied at RSI extremes
const RSI_TILT: f64 = 0.2;

/// Inputs the confidence rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationSignals {
    pub overall_score: f64,
    pub pe: f64,
    pub debt_to_equity: f64,
    pub dividend_yield: f64,
    /// Percent change over the trailing window
    pub price_change: f64,
    pub rsi: f64,
}

impl RecommendationSignals {
    /// Fundamentals contribute their 0-10 score, price change its percent
    /// move, and RSI extremes tilt the result against the prevailing move.
    pub fn directional_score(&self) -> f64 {
        let mut score = self.overall_score / 10.0 + self.price_change / 100.0;
        if self.rsi > RSI_OVERBOUGHT {
            score -= RSI_TILT;
        } else if self.rsi < RSI_OVERSOLD {
            score += RSI_TILT;
        }
        score
    }
}

type Chain = RuleChain<RecommendationSignals>;

/// Confidence adjustments, one chain per evidence category
pub const CONFIDENCE_RULES: &[Chain] = &[
    Chain {
        metric: "overall_score",
        extract: |s| s.overall_score,
        format: ValueFormat::Score,
        rules: &[
            Rule::new(|v| v > 7.0, 0.10, "Strong fundamental score"),
            Rule::new(|v| v > 5.0, 0.05, "Solid fundamental score"),
            Rule::new(|v| v < 4.0, -0.10, "Weak fundamental score"),
        ],
    },
    Chain {
        metric: "pe",
        extract: |s| s.pe,
        format: ValueFormat::Ratio,
        rules: &[
            Rule::new(|pe| pe > 0.0 && pe < 15.0, 0.05, "Attractive P/E ratio"),
            Rule::new(|pe| pe > 30.0, -0.05, "High P/E ratio"),
        ],
    },
    Chain {
        metric: "debt_to_equity",
        extract: |s| s.debt_to_equity,
        format: ValueFormat::Ratio,
        rules: &[
            Rule::new(|d| d < 0.5, 0.05, "Low debt-to-equity ratio"),
            Rule::new(|d| d > 1.2, -0.05, "High debt-to-equity ratio"),
        ],
    },
    Chain {
        metric: "dividend_yield",
        extract: |s| s.dividend_yield,
        format: ValueFormat::Percent,
        rules: &[Rule::new(|y| y > 0.04, 0.05, "Attractive dividend yield")],
    },
    Chain {
        metric: "price_change",
        extract: |s| s.price_change,
        format: ValueFormat::SignedPercent,
        rules: &[
            Rule::new(|p| p > 10.0, 0.10, "Strong upward price momentum"),
            Rule::new(|p| p > 5.0, 0.05, "Positive price momentum"),
            Rule::new(|p| p < -10.0, -0.10, "Sharp price decline"),
            Rule::new(|p| p < -5.0, -0.05, "Negative price momentum"),
        ],
    },
    Chain {
        metric: "rsi",
        extract: |s| s.rsi,
        format: ValueFormat::Plain,
        rules: &[
            Rule::new(|r| r > RSI_OVERBOUGHT, -0.10, "RSI indicates overbought conditions"),
            Rule::new(|r| r < RSI_OVERSOLD, 0.10, "RSI indicates oversold conditions"),
        ],
    },
];

/// Percent change between the first and last close of the trailing
/// `window` points; 0 when either close is unusable or the first is zero.
pub fn price_change(data: &[Observation], window: usize) -> f64 {
    let recent = &data[data.len() - window.min(data.len())..];
    match (
        recent.first().and_then(Observation::valid_close),
        recent.last().and_then(Observation::valid_close),
    ) {
        (Some(first), Some(last)) if first != 0.0 => (last / first - 1.0) * 100.0,
        _ => 0.0,
    }
}

fn summary(kind: RecommendationKind, positives: usize, negatives: usize, confidence: f64) -> String {
    format!(
        "Based on {} positive and {} negative factors, we {} this stock with {}% confidence.",
        positives,
        negatives,
        kind.as_str().to_lowercase(),
        (confidence * 100.0).round() as i64
    )
}

fn insufficient_data() -> Recommendation {
    Recommendation {
        recommendation: RecommendationKind::Hold,
        confidence: BASE_CONFIDENCE,
        positive_points: Vec::new(),
        negative_points: vec!["Insufficient data for analysis".to_string()],
        summary: "Not enough data to form a recommendation. Holding until more data is available.".to_string(),
    }
}

fn analysis_error() -> Recommendation {
    Recommendation {
        recommendation: RecommendationKind::Hold,
        confidence: BASE_CONFIDENCE,
        positive_points: Vec::new(),
        negative_points: vec!["Error during analysis".to_string()],
        summary: "The analysis could not be completed. Holding until the data can be re-evaluated.".to_string(),
    }
}

pub struct RecommendationEngine {
    config: EngineConfig,
    fundamentals: FundamentalAnalysisEngine,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            fundamentals: FundamentalAnalysisEngine::new(),
        }
    }

    /// Combine fundamentals, trailing price change and RSI into a
    /// recommendation. Never fails: missing input yields an "insufficient
    /// data" HOLD and a failed computation an "error" HOLD.
    pub fn recommend(&self, data: &[Observation], fundamentals: Option<&FundamentalsRecord>) -> Recommendation {
        let fundamentals = match fundamentals {
            Some(f) if !data.is_empty() => f,
            _ => {
                tracing::warn!(
                    points = data.len(),
                    has_fundamentals = fundamentals.is_some(),
                    "insufficient data for recommendation"
                );
                return insufficient_data();
            }
        };

        match self.try_recommend(data, fundamentals) {
            Ok(recommendation) => recommendation,
            Err(e) => {
                tracing::warn!("recommendation failed, falling back to HOLD: {}", e);
                analysis_error()
            }
        }
    }

    /// The inputs the rules see for this sequence and fundamentals.
    pub fn signals(
        &self,
        data: &[Observation],
        fundamentals: &FundamentalsRecord,
    ) -> Result<RecommendationSignals, AnalysisError> {
        let overall_score = self.fundamentals.score(fundamentals).overall_score;
        let price_change = price_change(data, self.config.trend_window);
        let rsi = rsi(data, self.config.rsi_period).last().copied().unwrap_or(NEUTRAL_RSI);

        Ok(RecommendationSignals {
            overall_score: AnalysisError::ensure_finite("overall score", overall_score)?,
            pe: fundamentals.pe,
            debt_to_equity: fundamentals.debt_to_equity,
            dividend_yield: fundamentals.dividend_yield,
            price_change: AnalysisError::ensure_finite("price change", price_change)?,
            rsi: AnalysisError::ensure_finite("rsi", rsi)?,
        })
    }

    fn try_recommend(
        &self,
        data: &[Observation],
        fundamentals: &FundamentalsRecord,
    ) -> Result<Recommendation, AnalysisError> {
        let signals = self.signals(data, fundamentals)?;

        let mut confidence = BASE_CONFIDENCE;
        let mut positive_points = Vec::new();
        let mut negative_points = Vec::new();
        for firing in evaluate_chains(CONFIDENCE_RULES, &signals) {
            confidence += firing.adjustment;
            match firing.polarity() {
                Polarity::Positive => positive_points.push(firing.evidence()),
                Polarity::Negative => negative_points.push(firing.evidence()),
            }
        }
        let confidence = confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

        let score = AnalysisError::ensure_finite("directional score", signals.directional_score())?;
        let recommendation = RecommendationKind::from_score(score);

        tracing::debug!(
            overall_score = signals.overall_score,
            price_change = signals.price_change,
            rsi = signals.rsi,
            score,
            confidence,
            "recommendation computed"
        );

        Ok(Recommendation {
            recommendation,
            confidence,
            summary: summary(recommendation, positive_points.len(), negative_points.len(), confidence),
            positive_points,
            negative_points,
        })
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn prices(closes: &[f64]) -> Vec<Observation> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Observation {
                date: format!("2024-01-{:02}", i + 1),
                close: Some(close),
                volume: Some(500_000.0),
                ..Default::default()
            })
            .collect()
    }

    fn sample() -> FundamentalsRecord {
        FundamentalsRecord {
            pe: 16.8,
            eps: 4.2,
            roe: 0.15,
            debt_to_equity: 0.45,
            current_ratio: 2.1,
            quick_ratio: 1.7,
            profit_margin: 0.14,
            dividend_yield: 0.025,
        }
    }

    /// Scores 2.2 overall, the lowest the scorer can produce
    fn weak() -> FundamentalsRecord {
        FundamentalsRecord {
            pe: 10_000.0,
            eps: -3.0,
            roe: -0.5,
            debt_to_equity: 5.0,
            current_ratio: 0.2,
            quick_ratio: 0.1,
            profit_margin: -0.4,
            dividend_yield: 0.0,
        }
    }

    #[test]
    fn test_empty_sequence_is_insufficient_data() {
        let rec = RecommendationEngine::default().recommend(&[], Some(&sample()));

        assert_eq!(rec.recommendation, RecommendationKind::Hold);
        assert_eq!(rec.confidence, 0.5);
        assert!(rec.positive_points.is_empty());
        assert_eq!(rec.negative_points, vec!["Insufficient data for analysis".to_string()]);
    }

    #[test]
    fn test_missing_fundamentals_is_insufficient_data() {
        let rec = RecommendationEngine::default().recommend(&prices(&[10.0, 11.0]), None);
        assert_eq!(rec, insufficient_data());
    }

    #[test]
    fn test_uptrend_recommends_buy() {
        let data = prices(&(100..=130).map(f64::from).collect::<Vec<_>>());
        let rec = RecommendationEngine::default().recommend(&data, Some(&sample()));

        assert_eq!(rec.recommendation, RecommendationKind::Buy);
        assert_abs_diff_eq!(rec.confidence, 0.65, epsilon = 1e-9);
        assert_eq!(
            rec.positive_points,
            vec![
                "Strong fundamental score (7.2/10)".to_string(),
                "Low debt-to-equity ratio (0.45)".to_string(),
                "Strong upward price momentum (+17.1%)".to_string(),
            ]
        );
        assert_eq!(rec.negative_points, vec!["RSI indicates overbought conditions (100.0)".to_string()]);
        assert_eq!(
            rec.summary,
            "Based on 3 positive and 1 negative factors, we buy this stock with 65% confidence."
        );
    }

    #[test]
    fn test_flat_prices_have_no_momentum() {
        let engine = RecommendationEngine::default();
        let data = prices(&[50.0; 10]);

        let signals = engine.signals(&data, &sample()).unwrap();
        assert_eq!(signals.price_change, 0.0);
        assert_eq!(signals.rsi, NEUTRAL_RSI);

        // Without momentum the fundamentals decide alone. The sample scores 7.2,
        // so the composite is 0.72 and the result is BUY rather than the HOLD a
        // flat chart might suggest; only weak fundamentals bring it down to HOLD.
        assert_eq!(engine.recommend(&data, Some(&sample())).recommendation, RecommendationKind::Buy);
        let rec = engine.recommend(&data, Some(&weak()));
        assert_eq!(rec.recommendation, RecommendationKind::Hold);
        assert_abs_diff_eq!(rec.confidence, MIN_CONFIDENCE, epsilon = 1e-9);
    }

    #[test]
    fn test_crash_recommends_sell() {
        let mut closes = vec![100.0; 12];
        closes.extend([80.0, 60.0, 45.0, 40.0]);
        closes.extend((0..15).map(|i| if i % 2 == 0 { 41.0 } else { 40.0 }));
        let rec = RecommendationEngine::default().recommend(&prices(&closes), Some(&weak()));

        assert_eq!(rec.recommendation, RecommendationKind::Sell);
        assert_eq!(rec.confidence, MIN_CONFIDENCE);
        assert!(rec.positive_points.is_empty());
        assert_eq!(rec.negative_points.len(), 4);
        assert_eq!(rec.negative_points[3], "Sharp price decline (-59.0%)");
        assert!(rec.summary.contains("we sell this stock with 30% confidence"));
    }

    #[test]
    fn test_overbought_collapse_recommends_strong_sell() {
        let mut closes = vec![100.0; 12];
        closes.extend([50.0, 20.0, 5.0, 1.0]);
        closes.extend((1..=15).map(|i| 1.0 + 0.1 * i as f64));
        let rec = RecommendationEngine::default().recommend(&prices(&closes), Some(&weak()));

        assert_eq!(rec.recommendation, RecommendationKind::StrongSell);
        assert!(rec.negative_points.iter().any(|p| p.contains("overbought")));
        assert!(rec.summary.contains("we strong sell this stock"));
    }

    #[test]
    fn test_oversold_adds_positive_evidence() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64 * 0.2).collect();
        let rec = RecommendationEngine::default().recommend(&prices(&closes), Some(&sample()));

        assert!(rec.positive_points.iter().any(|p| p.contains("oversold")));
        // 0.72 - 3.8% + 0.2
        assert_eq!(rec.recommendation, RecommendationKind::StrongBuy);
    }

    #[test]
    fn test_attractive_valuation_and_yield() {
        let cheap = FundamentalsRecord { pe: 12.0, dividend_yield: 0.05, ..sample() };
        let rec = RecommendationEngine::default().recommend(&prices(&[20.0; 5]), Some(&cheap));

        assert!(rec.positive_points.contains(&"Attractive P/E ratio (12.00)".to_string()));
        assert!(rec.positive_points.contains(&"Attractive dividend yield (5.0%)".to_string()));
    }

    #[test]
    fn test_negative_pe_is_not_attractive() {
        let loss_maker = FundamentalsRecord { pe: -8.0, ..sample() };
        let rec = RecommendationEngine::default().recommend(&prices(&[20.0; 5]), Some(&loss_maker));
        assert!(!rec.positive_points.iter().any(|p| p.contains("P/E")));
    }

    #[test]
    fn test_overflowing_price_change_falls_back() {
        let data = prices(&[1e-300, f64::MAX]);
        let rec = RecommendationEngine::default().recommend(&data, Some(&sample()));

        assert_eq!(rec.recommendation, RecommendationKind::Hold);
        assert_eq!(rec.confidence, 0.5);
        assert_eq!(rec.negative_points, vec!["Error during analysis".to_string()]);
    }

    #[test]
    fn test_price_change_window() {
        let data = prices(&(100..=130).map(f64::from).collect::<Vec<_>>());
        assert_abs_diff_eq!(price_change(&data, 20), (130.0 / 111.0 - 1.0) * 100.0);
        assert_abs_diff_eq!(price_change(&data, 100), 30.0, epsilon = 1e-9);
        assert_eq!(price_change(&data[..1], 20), 0.0);
        assert_eq!(price_change(&prices(&[0.0, 5.0]), 20), 0.0);

        let mut gaps = prices(&[10.0, 12.0]);
        gaps[0].close = None;
        assert_eq!(price_change(&gaps, 20), 0.0);
    }

    proptest! {
        #[test]
        fn prop_confidence_bounded(
            closes in prop::collection::vec(0.01f64..10_000.0, 1..60),
            pe in -100.0f64..200.0, de in 0.0f64..5.0, dy in 0.0f64..0.2,
            roe in -0.5f64..0.5, margin in -0.5f64..0.5,
        ) {
            let fundamentals = FundamentalsRecord { pe, debt_to_equity: de, dividend_yield: dy, roe, profit_margin: margin, ..sample() };
            let rec = RecommendationEngine::default().recommend(&prices(&closes), Some(&fundamentals));
            prop_assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&rec.confidence));
            prop_assert!(rec.summary.starts_with("Based on"));
        }
    }
}

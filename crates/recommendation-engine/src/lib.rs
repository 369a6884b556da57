use analysis_core::{
    observations_from_values, sanitize, DataMode, EngineConfig, FundamentalsRecord, Observation,
    Recommendation, ScoreSet,
};
use chrono::{DateTime, Utc};
use fundamental_analysis::{intrinsic_value, FundamentalAnalysisEngine};
use sentiment_analysis::{SentimentAnalysisEngine, SentimentSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use technical_analysis::{TechnicalAnalysisEngine, TechnicalSnapshot};

pub mod recommendation;
pub use recommendation::{price_change, RecommendationEngine, RecommendationSignals, CONFIDENCE_RULES};

/// Everything derived from one observation sequence and fundamentals snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub mode: DataMode,
    /// Length of the sanitized sequence
    pub observations: usize,
    pub indicators: TechnicalSnapshot,
    /// Absent when no fundamentals were supplied
    pub scores: Option<ScoreSet>,
    pub sentiment: SentimentSummary,
    pub recommendation: Recommendation,
    /// Discounted earnings estimate, only for positive EPS
    pub intrinsic_value: Option<f64>,
}

pub struct AnalysisEngine {
    config: EngineConfig,
    technical_analyzer: TechnicalAnalysisEngine,
    fundamental_analyzer: FundamentalAnalysisEngine,
    sentiment_analyzer: SentimentAnalysisEngine,
    recommender: RecommendationEngine,
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            technical_analyzer: TechnicalAnalysisEngine::new(config.clone()),
            fundamental_analyzer: FundamentalAnalysisEngine::new(),
            sentiment_analyzer: SentimentAnalysisEngine::new(),
            recommender: RecommendationEngine::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over raw JSON observations.
    pub fn analyze_values(&self, raw: &[Value], fundamentals: Option<&FundamentalsRecord>) -> AnalysisReport {
        self.analyze(&observations_from_values(raw), fundamentals)
    }

    /// Sanitize, compute indicators, summarize sentiment, score fundamentals
    /// and recommend.
    pub fn analyze(&self, raw: &[Observation], fundamentals: Option<&FundamentalsRecord>) -> AnalysisReport {
        let mode = DataMode::detect(raw);
        tracing::info!(
            "Starting analysis of {} observations (mode: {:?}, fundamentals: {})",
            raw.len(),
            mode,
            fundamentals.is_some()
        );

        let data = sanitize(raw);

        let indicators = self.technical_analyzer.snapshot(&data);
        let sentiment = self.sentiment_analyzer.summarize(&data);
        let scores = fundamentals.map(|f| self.fundamental_analyzer.score(f));
        let recommendation = self.recommender.recommend(&data, fundamentals);
        let intrinsic_value = fundamentals
            .filter(|f| f.eps > 0.0)
            .map(|f| intrinsic_value(f.eps, &self.config.dcf));

        tracing::info!(
            "Analysis complete: {} ({:.0}% confidence)",
            recommendation.recommendation,
            recommendation.confidence * 100.0
        );

        AnalysisReport {
            generated_at: Utc::now(),
            mode,
            observations: data.len(),
            indicators,
            scores,
            sentiment,
            recommendation,
            intrinsic_value,
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

//! Sentiment Summarizer
//!
//! Reduces the `sentiment` readings of an observation sequence to an overall
//! level, a direction of change, and the topics that come up most often.

use std::collections::HashMap;

use analysis_core::{mean, parse_date, AnalysisError, Observation};
use serde::{Deserialize, Serialize};

/// Change in sentiment between the first and second half of the sequence
const TREND_THRESHOLD: f64 = 0.1;
/// Points needed before a trend is reported
const MIN_TREND_POINTS: usize = 3;
const TOP_KEYWORDS: usize = 3;

/// Direction sentiment is moving in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Improving,
    Stable,
    Declining,
}

impl SentimentTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentTrend::Improving => "improving",
            SentimentTrend::Stable => "stable",
            SentimentTrend::Declining => "declining",
        }
    }

    fn insight(&self) -> &'static str {
        match self {
            SentimentTrend::Improving => "Sentiment is improving over the analyzed period",
            SentimentTrend::Stable => "Sentiment has remained stable over the analyzed period",
            SentimentTrend::Declining => "Sentiment is declining over the analyzed period",
        }
    }
}

/// Summary of the sentiment readings in a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    /// Mean sentiment of qualifying points (0 to 1)
    pub overall_sentiment: f64,
    pub trend: SentimentTrend,
    /// Narrative observations, most important first
    pub insights: Vec<String>,
    /// Most frequent keywords, most frequent first
    pub key_topics: Vec<String>,
    /// Number of points carrying a sentiment reading
    pub data_points: usize,
    /// Mean reading confidence, when any point reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f64>,
}

impl SentimentSummary {
    fn neutral(insight: &str) -> Self {
        Self {
            overall_sentiment: 0.5,
            trend: SentimentTrend::Stable,
            insights: vec![insight.to_string()],
            key_topics: Vec::new(),
            data_points: 0,
            average_confidence: None,
        }
    }
}

pub struct SentimentAnalysisEngine;

impl SentimentAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a sanitized sequence. Always returns a usable summary:
    /// neutral when no point carries sentiment, and a neutral error summary
    /// when the readings cannot be aggregated.
    pub fn summarize(&self, data: &[Observation]) -> SentimentSummary {
        match self.try_summarize(data) {
            Ok(Some(summary)) => summary,
            Ok(None) => {
                tracing::warn!("no sentiment readings in {} observations, using neutral summary", data.len());
                SentimentSummary::neutral("No sentiment data available for analysis")
            }
            Err(e) => {
                tracing::warn!("sentiment summary failed: {}", e);
                SentimentSummary::neutral("Error analyzing sentiment data")
            }
        }
    }

    fn try_summarize(&self, data: &[Observation]) -> Result<Option<SentimentSummary>, AnalysisError> {
        let mut points: Vec<&Observation> = data.iter().filter(|o| o.valid_sentiment().is_some()).collect();
        if points.is_empty() {
            return Ok(None);
        }

        // Sort chronologically when every date is understood; otherwise keep input order
        if points.iter().all(|o| parse_date(&o.date).is_some()) {
            points.sort_by_key(|o| parse_date(&o.date));
        }

        let sentiments: Vec<f64> = points.iter().filter_map(|o| o.valid_sentiment()).collect();
        let overall_sentiment = AnalysisError::ensure_finite("overall sentiment", mean(&sentiments))?;
        let trend = trend_of(&sentiments)?;

        let confidences: Vec<f64> = points.iter().filter_map(|o| o.valid_confidence()).collect();
        let average_confidence = (!confidences.is_empty()).then(|| mean(&confidences));

        let key_topics = top_keywords(&points, TOP_KEYWORDS);

        let mut insights = vec![level_insight(overall_sentiment).to_string(), trend.insight().to_string()];
        if !key_topics.is_empty() {
            insights.push(format!("Key topics: {}", key_topics.join(", ")));
        }

        tracing::debug!(
            points = sentiments.len(),
            overall_sentiment,
            trend = trend.as_str(),
            "summarized sentiment"
        );

        Ok(Some(SentimentSummary {
            overall_sentiment,
            trend,
            insights,
            key_topics,
            data_points: sentiments.len(),
            average_confidence,
        }))
    }
}

impl Default for SentimentAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare the mean of the first half with the mean of the second half.
fn trend_of(sentiments: &[f64]) -> Result<SentimentTrend, AnalysisError> {
    if sentiments.len() < MIN_TREND_POINTS {
        return Ok(SentimentTrend::Stable);
    }

    let (first, second) = sentiments.split_at(sentiments.len() / 2);
    let change = AnalysisError::ensure_finite("sentiment change", mean(second) - mean(first))?;

    Ok(if change > TREND_THRESHOLD {
        SentimentTrend::Improving
    } else if change < -TREND_THRESHOLD {
        SentimentTrend::Declining
    } else {
        SentimentTrend::Stable
    })
}

fn level_insight(overall: f64) -> &'static str {
    if overall > 0.7 {
        "Strongly positive sentiment across the analyzed documents"
    } else if overall > 0.55 {
        "Moderately positive sentiment overall"
    } else if overall < 0.35 {
        "Negative sentiment detected, exercise caution"
    } else {
        "Neutral sentiment overall"
    }
}

/// Most frequent keywords; ties keep the order keywords were first seen in.
fn top_keywords(points: &[&Observation], limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for keyword in points.iter().flat_map(|o| o.keywords.iter()) {
        let i = *index.entry(keyword.as_str()).or_insert_with(|| {
            counts.push((keyword.as_str(), 0));
            counts.len() - 1
        });
        counts[i].1 += 1;
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(k, _)| k.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn documents(sentiments: &[f64]) -> Vec<Observation> {
        sentiments
            .iter()
            .enumerate()
            .map(|(i, &s)| Observation::with_sentiment(format!("2024-03-{:02}", i + 1), s))
            .collect()
    }

    #[test]
    fn test_improving_trend() {
        let summary = SentimentAnalysisEngine::new().summarize(&documents(&[0.2, 0.3, 0.8, 0.85, 0.9]));

        assert_eq!(summary.trend, SentimentTrend::Improving);
        assert_abs_diff_eq!(summary.overall_sentiment, 0.61, epsilon = 1e-9);
        assert_eq!(summary.data_points, 5);
        assert!(summary.insights.iter().any(|i| i.contains("improving")));
        assert!(summary.insights[0].starts_with("Moderately positive"));
    }

    #[test]
    fn test_declining_and_stable_trends() {
        let engine = SentimentAnalysisEngine::new();
        assert_eq!(engine.summarize(&documents(&[0.9, 0.8, 0.3, 0.2])).trend, SentimentTrend::Declining);
        assert_eq!(engine.summarize(&documents(&[0.5, 0.55, 0.52, 0.58])).trend, SentimentTrend::Stable);
    }

    #[test]
    fn test_trend_needs_three_points() {
        let summary = SentimentAnalysisEngine::new().summarize(&documents(&[0.1, 0.9]));
        assert_eq!(summary.trend, SentimentTrend::Stable);
        assert_abs_diff_eq!(summary.overall_sentiment, 0.5);
    }

    #[test]
    fn test_sorts_by_date_before_trend() {
        let mut docs = documents(&[0.2, 0.3, 0.8, 0.85, 0.9]);
        docs.reverse();
        let summary = SentimentAnalysisEngine::new().summarize(&docs);
        assert_eq!(summary.trend, SentimentTrend::Improving);
    }

    #[test]
    fn test_no_sentiment_gives_neutral_default() {
        let data = vec![Observation::with_close("2024-01-01", 10.0)];
        let summary = SentimentAnalysisEngine::new().summarize(&data);

        assert_eq!(summary.overall_sentiment, 0.5);
        assert_eq!(summary.trend, SentimentTrend::Stable);
        assert_eq!(summary.insights.len(), 1);
        assert_eq!(summary.data_points, 0);
    }

    #[test]
    fn test_overflowing_readings_fall_back() {
        let summary = SentimentAnalysisEngine::new().summarize(&documents(&[f64::MAX, f64::MAX]));
        assert_eq!(summary.overall_sentiment, 0.5);
        assert_eq!(summary.insights, vec!["Error analyzing sentiment data".to_string()]);
    }

    #[test]
    fn test_level_insights() {
        assert!(level_insight(0.8).starts_with("Strongly positive"));
        assert!(level_insight(0.6).starts_with("Moderately positive"));
        assert!(level_insight(0.2).starts_with("Negative"));
        assert!(level_insight(0.5).starts_with("Neutral"));
    }

    #[test]
    fn test_key_topics_by_frequency_then_first_seen() {
        let mut docs = documents(&[0.6, 0.7, 0.65]);
        docs[0].keywords = vec!["earnings".into(), "guidance".into()];
        docs[1].keywords = vec!["chips".into(), "guidance".into(), "ai".into()];
        docs[2].keywords = vec!["ai".into(), "earnings".into(), "chips".into()];
        docs[2].confidence = Some(0.9);
        docs[1].confidence = Some(0.7);

        let summary = SentimentAnalysisEngine::new().summarize(&docs);

        assert_eq!(summary.key_topics, vec!["earnings", "guidance", "chips"]);
        assert_eq!(summary.insights.last().unwrap(), "Key topics: earnings, guidance, chips");
        assert_abs_diff_eq!(summary.average_confidence.unwrap(), 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_keywords_ignored_on_points_without_sentiment() {
        let mut docs = documents(&[0.6]);
        let mut price = Observation::with_close("2024-03-02", 10.0);
        price.keywords = vec!["ignored".into()];
        docs.push(price);

        let summary = SentimentAnalysisEngine::new().summarize(&docs);
        assert!(summary.key_topics.is_empty());
        assert_eq!(summary.insights.len(), 2);
    }
}

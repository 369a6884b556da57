use analysis_core::{
    evaluate_chains, round_to, score_from_chains, Firing, FundamentalsRecord, Rule, RuleChain, ScoreSet,
    ValueFormat,
};

pub mod valuation;
pub use valuation::{dividend_growth_rating, intrinsic_value, DividendGrowthRating, DividendPoint, DividendRating};

/// Neutral starting point of every sub-score
pub const BASELINE_SCORE: f64 = 5.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

type Chain = RuleChain<FundamentalsRecord>;

/// Valuation: cheap earnings, earnings power and cash returned to holders.
/// The two EPS chains stack.
pub const VALUE_RULES: &[Chain] = &[
    Chain {
        metric: "pe",
        extract: |f| f.pe,
        format: ValueFormat::Ratio,
        rules: &[
            Rule::new(|pe| pe < 10.0, 2.0, "Deep value P/E"),
            Rule::new(|pe| pe < 15.0, 1.0, "Low P/E"),
            Rule::new(|pe| pe > 50.0, -2.0, "Extreme P/E"),
            Rule::new(|pe| pe > 30.0, -1.0, "High P/E"),
        ],
    },
    Chain {
        metric: "eps",
        extract: |f| f.eps,
        format: ValueFormat::Ratio,
        rules: &[Rule::new(|eps| eps > 5.0, 1.0, "Solid EPS")],
    },
    Chain {
        metric: "eps",
        extract: |f| f.eps,
        format: ValueFormat::Ratio,
        rules: &[Rule::new(|eps| eps > 10.0, 0.5, "Exceptional EPS")],
    },
    Chain {
        metric: "dividend_yield",
        extract: |f| f.dividend_yield,
        format: ValueFormat::Percent,
        rules: &[
            Rule::new(|y| y > 0.05, 1.5, "High dividend yield"),
            Rule::new(|y| y > 0.03, 1.0, "Healthy dividend yield"),
            Rule::new(|y| y > 0.01, 0.5, "Modest dividend yield"),
        ],
    },
];

/// Growth: return on equity and profitability. Negative margins are checked
/// before thin ones.
pub const GROWTH_RULES: &[Chain] = &[
    Chain {
        metric: "roe",
        extract: |f| f.roe,
        format: ValueFormat::Percent,
        rules: &[
            Rule::new(|roe| roe > 0.20, 2.0, "Excellent ROE"),
            Rule::new(|roe| roe > 0.15, 1.5, "Strong ROE"),
            Rule::new(|roe| roe > 0.10, 1.0, "Decent ROE"),
            Rule::new(|roe| roe < 0.05, -1.0, "Weak ROE"),
        ],
    },
    Chain {
        metric: "profit_margin",
        extract: |f| f.profit_margin,
        format: ValueFormat::Percent,
        rules: &[
            Rule::new(|m| m > 0.20, 2.0, "High profit margin"),
            Rule::new(|m| m > 0.10, 1.0, "Solid profit margin"),
            Rule::new(|m| m < 0.0, -1.5, "Unprofitable"),
            Rule::new(|m| m < 0.05, -0.5, "Thin profit margin"),
        ],
    },
];

/// Stability: leverage and short-term liquidity
pub const STABILITY_RULES: &[Chain] = &[
    Chain {
        metric: "debt_to_equity",
        extract: |f| f.debt_to_equity,
        format: ValueFormat::Ratio,
        rules: &[
            Rule::new(|d| d < 0.3, 2.0, "Minimal leverage"),
            Rule::new(|d| d < 0.5, 1.0, "Low leverage"),
            Rule::new(|d| d > 1.5, -2.0, "Heavy leverage"),
            Rule::new(|d| d > 1.0, -1.0, "Elevated leverage"),
        ],
    },
    Chain {
        metric: "current_ratio",
        extract: |f| f.current_ratio,
        format: ValueFormat::Ratio,
        rules: &[
            Rule::new(|r| r > 2.0, 1.5, "Strong current ratio"),
            Rule::new(|r| r > 1.5, 1.0, "Healthy current ratio"),
            Rule::new(|r| r < 1.0, -1.0, "Weak current ratio"),
        ],
    },
    Chain {
        metric: "quick_ratio",
        extract: |f| f.quick_ratio,
        format: ValueFormat::Ratio,
        rules: &[
            Rule::new(|r| r > 1.5, 1.5, "Strong quick ratio"),
            Rule::new(|r| r > 1.0, 1.0, "Healthy quick ratio"),
            Rule::new(|r| r < 0.7, -1.0, "Weak quick ratio"),
        ],
    },
];

pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn value_score(&self, fundamentals: &FundamentalsRecord) -> f64 {
        score_from_chains(VALUE_RULES, fundamentals, BASELINE_SCORE, MIN_SCORE, MAX_SCORE)
    }

    pub fn growth_score(&self, fundamentals: &FundamentalsRecord) -> f64 {
        score_from_chains(GROWTH_RULES, fundamentals, BASELINE_SCORE, MIN_SCORE, MAX_SCORE)
    }

    pub fn stability_score(&self, fundamentals: &FundamentalsRecord) -> f64 {
        score_from_chains(STABILITY_RULES, fundamentals, BASELINE_SCORE, MIN_SCORE, MAX_SCORE)
    }

    /// Value, growth and stability sub-scores plus their mean (one decimal).
    pub fn score(&self, fundamentals: &FundamentalsRecord) -> ScoreSet {
        let value_score = self.value_score(fundamentals);
        let growth_score = self.growth_score(fundamentals);
        let stability_score = self.stability_score(fundamentals);
        let overall_score = round_to((value_score + growth_score + stability_score) / 3.0, 1);

        tracing::debug!(value_score, growth_score, stability_score, overall_score, "scored fundamentals");

        ScoreSet {
            value_score,
            growth_score,
            stability_score,
            overall_score,
        }
    }

    /// Every rule that fired across the three categories, in evaluation order.
    pub fn explain(&self, fundamentals: &FundamentalsRecord) -> Vec<Firing> {
        [VALUE_RULES, GROWTH_RULES, STABILITY_RULES]
            .iter()
            .flat_map(|chains| evaluate_chains(chains, fundamentals))
            .collect()
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

//! Declarative threshold tables.
//!
//! A [`RuleChain`] is an ordered if/else-if chain over one metric: the first
//! rule whose predicate holds fires and the rest of the chain is skipped.
//! Chains are evaluated in declaration order and never interact, so a metric
//! that stacks several independent bonuses is written as several chains.

use serde::{Deserialize, Serialize};

/// One threshold rule: predicate, additive adjustment and evidence label.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub when: fn(f64) -> bool,
    pub adjustment: f64,
    pub label: &'static str,
}

impl Rule {
    pub const fn new(when: fn(f64) -> bool, adjustment: f64, label: &'static str) -> Self {
        Self { when, adjustment, label }
    }
}

/// How a metric value is rendered inside an evidence string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// `7.2/10`
    Score,
    /// `16.80`
    Ratio,
    /// fraction rendered as `2.5%`
    Percent,
    /// percentage points rendered as `+17.1%`
    SignedPercent,
    /// `72.4`
    Plain,
}

impl ValueFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            ValueFormat::Score => format!("{value:.1}/10"),
            ValueFormat::Ratio => format!("{value:.2}"),
            ValueFormat::Percent => format!("{:.1}%", value * 100.0),
            ValueFormat::SignedPercent => format!("{value:+.1}%"),
            ValueFormat::Plain => format!("{value:.1}"),
        }
    }
}

/// An ordered chain of mutually exclusive rules over a metric of `T`.
#[derive(Debug, Clone, Copy)]
pub struct RuleChain<T> {
    pub metric: &'static str,
    pub extract: fn(&T) -> f64,
    pub format: ValueFormat,
    pub rules: &'static [Rule],
}

impl<T> RuleChain<T> {
    /// First matching rule for `input`, if any.
    pub fn evaluate(&self, input: &T) -> Option<Firing> {
        let value = (self.extract)(input);
        self.rules.iter().find(|rule| (rule.when)(value)).map(|rule| Firing {
            metric: self.metric,
            label: rule.label,
            adjustment: rule.adjustment,
            value,
            format: self.format,
        })
    }
}

/// A rule that fired, with the metric value that triggered it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    pub metric: &'static str,
    pub label: &'static str,
    pub adjustment: f64,
    pub value: f64,
    pub format: ValueFormat,
}

impl Firing {
    pub fn polarity(&self) -> Polarity {
        if self.adjustment >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    /// Human-readable evidence, e.g. `Low debt-to-equity ratio (0.45)`.
    pub fn evidence(&self) -> String {
        format!("{} ({})", self.label, self.format.render(self.value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Evaluate every chain in order and collect what fired.
pub fn evaluate_chains<T>(chains: &[RuleChain<T>], input: &T) -> Vec<Firing> {
    chains.iter().filter_map(|chain| chain.evaluate(input)).collect()
}

/// `baseline` plus the sum of all fired adjustments, clamped to `[min, max]`.
pub fn score_from_chains<T>(chains: &[RuleChain<T>], input: &T, baseline: f64, min: f64, max: f64) -> f64 {
    let total = evaluate_chains(chains, input)
        .iter()
        .fold(baseline, |acc, firing| acc + firing.adjustment);
    total.clamp(min, max)
}

//! Intrinsic value and dividend growth helpers.

use analysis_core::{round2, DcfParams};
use serde::{Deserialize, Serialize};

/// Discounted earnings estimate: `years` of EPS growing at `growth_rate`,
/// discounted at `discount_rate`, plus a terminal value of the final year's
/// EPS times `terminal_multiple`, discounted back the same way.
pub fn intrinsic_value(eps: f64, params: &DcfParams) -> f64 {
    let growth = 1.0 + params.growth_rate;
    let discount = 1.0 + params.discount_rate;

    let projected: f64 = (1..=params.years as i32)
        .map(|year| eps * growth.powi(year) / discount.powi(year))
        .sum();

    let horizon = params.years as i32;
    let terminal = eps * growth.powi(horizon) * params.terminal_multiple / discount.powi(horizon);

    round2(projected + terminal)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendPoint {
    pub year: i32,
    pub dividend: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendGrowthRating {
    pub cagr: f64,
    /// CAGR capped at 15%
    pub sustainable_rate: f64,
    pub rating: DividendRating,
}

impl DividendGrowthRating {
    fn poor() -> Self {
        Self {
            cagr: 0.0,
            sustainable_rate: 0.0,
            rating: DividendRating::Poor,
        }
    }
}

const SUSTAINABLE_CAP: f64 = 0.15;

/// Rate a chronological dividend history by its compound annual growth.
pub fn dividend_growth_rating(history: &[DividendPoint]) -> DividendGrowthRating {
    let (first, last) = match (history.first(), history.last()) {
        (Some(first), Some(last)) if history.len() >= 2 => (first, last),
        _ => return DividendGrowthRating::poor(),
    };
    if !(first.dividend > 0.0) || !(last.dividend >= 0.0) || !last.dividend.is_finite() {
        return DividendGrowthRating::poor();
    }

    let span = i64::from(last.year) - i64::from(first.year);
    let years = if span > 0 { span as f64 } else { (history.len() - 1) as f64 };
    let cagr = (last.dividend / first.dividend).powf(1.0 / years) - 1.0;
    if !cagr.is_finite() {
        return DividendGrowthRating::poor();
    }

    let rating = if cagr > 0.08 {
        DividendRating::Excellent
    } else if cagr > 0.05 {
        DividendRating::Good
    } else if cagr > 0.02 {
        DividendRating::Fair
    } else {
        DividendRating::Poor
    };

    DividendGrowthRating {
        cagr,
        sustainable_rate: cagr.min(SUSTAINABLE_CAP),
        rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn history(points: &[(i32, f64)]) -> Vec<DividendPoint> {
        points.iter().map(|&(year, dividend)| DividendPoint { year, dividend }).collect()
    }

    #[test]
    fn test_intrinsic_value_defaults() {
        assert_eq!(intrinsic_value(4.2, &DcfParams::default()), 90.34);
    }

    #[test]
    fn test_intrinsic_value_scales_with_eps() {
        let params = DcfParams::default();
        assert_eq!(intrinsic_value(0.0, &params), 0.0);
        assert!(intrinsic_value(-2.0, &params) < 0.0);
        assert!(intrinsic_value(8.4, &params) > intrinsic_value(4.2, &params));
    }

    #[test]
    fn test_intrinsic_value_no_growth_no_discount() {
        let params = DcfParams { growth_rate: 0.0, discount_rate: 0.0, terminal_multiple: 10.0, years: 5 };
        assert_eq!(intrinsic_value(2.0, &params), 30.0);
    }

    #[test]
    fn test_dividend_rating_good() {
        let rating = dividend_growth_rating(&history(&[(2018, 1.0), (2020, 1.2), (2023, 1.5)]));
        assert_abs_diff_eq!(rating.cagr, 0.0844717, epsilon = 1e-6);
        assert_eq!(rating.rating, DividendRating::Excellent);
        assert_eq!(rating.sustainable_rate, rating.cagr);
    }

    #[test]
    fn test_dividend_rating_caps_sustainable_rate() {
        let rating = dividend_growth_rating(&history(&[(2019, 1.0), (2023, 2.0)]));
        assert_abs_diff_eq!(rating.cagr, 0.189207, epsilon = 1e-6);
        assert_eq!(rating.sustainable_rate, 0.15);
        assert_eq!(rating.rating, DividendRating::Excellent);
    }

    #[test]
    fn test_dividend_rating_bands() {
        let rate = |end: f64| dividend_growth_rating(&history(&[(2022, 1.0), (2023, end)])).rating;
        assert_eq!(rate(1.06), DividendRating::Good);
        assert_eq!(rate(1.03), DividendRating::Fair);
        assert_eq!(rate(1.01), DividendRating::Poor);
        assert_eq!(rate(0.9), DividendRating::Poor);
    }

    #[test]
    fn test_dividend_rating_degenerate_history() {
        assert_eq!(dividend_growth_rating(&[]), DividendGrowthRating::poor());
        assert_eq!(dividend_growth_rating(&history(&[(2023, 1.0)])), DividendGrowthRating::poor());
        assert_eq!(
            dividend_growth_rating(&history(&[(2020, 0.0), (2023, 1.0)])),
            DividendGrowthRating::poor()
        );
    }

    #[test]
    fn test_dividend_rating_negative_final_dividend() {
        let rating = dividend_growth_rating(&history(&[(2020, 1.0), (2023, -0.5)]));
        assert_eq!(rating, DividendGrowthRating::poor());
        assert_eq!(rating.sustainable_rate, 0.0);
    }

    #[test]
    fn test_dividend_rating_extreme_years() {
        let rating = dividend_growth_rating(&history(&[(-2_000_000_000, 1.0), (2_000_000_000, 2.0)]));
        assert!(rating.cagr.is_finite());
        assert!(rating.cagr > 0.0 && rating.cagr < 1e-8);
        assert_eq!(rating.rating, DividendRating::Poor);
    }

    #[test]
    fn test_dividend_rating_overflowing_growth_is_poor() {
        let rating = dividend_growth_rating(&history(&[(2022, 1e-300), (2023, f64::MAX)]));
        assert_eq!(rating, DividendGrowthRating::poor());
    }

    #[test]
    fn test_dividend_rating_same_year_uses_point_count() {
        let rating = dividend_growth_rating(&history(&[(2023, 1.0), (2023, 1.1), (2023, 1.21)]));
        assert_abs_diff_eq!(rating.cagr, 0.1, epsilon = 1e-9);
    }
}

// src/domain/insights.rs
//
// Display statistics derived from already-fetched properties.

use crate::domain::property::{ComparableView, PropertyView};
use crate::domain::status::PropertyStatus;

/// Four-step rating shared by investment scores and floor-plan quality scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreLevel::Excellent
        } else if score >= 60.0 {
            ScoreLevel::Good
        } else if score >= 40.0 {
            ScoreLevel::Fair
        } else {
            ScoreLevel::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "Excellent",
            ScoreLevel::Good => "Good",
            ScoreLevel::Fair => "Fair",
            ScoreLevel::Poor => "Poor",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "score score-excellent",
            ScoreLevel::Good => "score score-good",
            ScoreLevel::Fair => "score score-fair",
            ScoreLevel::Poor => "score score-poor",
        }
    }
}

/// Price per square foot, when both inputs are known.
pub fn ppsf(price: f64, sqft: f64) -> Option<f64> {
    (price > 0.0 && sqft > 0.0).then(|| price / sqft)
}

pub fn property_ppsf(p: &PropertyView) -> Option<f64> {
    ppsf(p.price(), p.square_footage)
}

pub fn comparable_ppsf(c: &ComparableView) -> Option<f64> {
    ppsf(c.sale_price, c.square_feet)
}

/// Mean PPSF over the properties that have both a price and a size.
pub fn average_ppsf(properties: &[PropertyView]) -> Option<f64> {
    mean(properties.iter().filter_map(property_ppsf))
}

pub fn average_investment_score(properties: &[PropertyView]) -> Option<f64> {
    mean(
        properties
            .iter()
            .filter_map(|p| p.insights.investment.as_ref())
            .map(|inv| inv.score)
            .filter(|s| *s > 0.0),
    )
}

/// (status, count) in pipeline order; statuses with no properties are omitted.
pub fn status_counts(properties: &[PropertyView]) -> Vec<(PropertyStatus, usize)> {
    let mut counts: Vec<(PropertyStatus, usize)> = Vec::new();
    for p in properties {
        match counts.iter_mut().find(|(s, _)| *s == p.status) {
            Some((_, n)) => *n += 1,
            None => counts.push((p.status.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.0.rank().cmp(&a.0.rank()).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    counts
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioStats {
    pub total: usize,
    pub complete: usize,
    pub in_progress: usize,
    pub failed: usize,
    pub average_ppsf: Option<f64>,
    pub average_investment_score: Option<f64>,
    pub total_estimated_value: f64,
}

pub fn portfolio_stats(properties: &[PropertyView]) -> PortfolioStats {
    PortfolioStats {
        total: properties.len(),
        complete: properties
            .iter()
            .filter(|p| p.status == PropertyStatus::Complete)
            .count(),
        in_progress: properties.iter().filter(|p| !p.status.is_terminal()).count(),
        failed: properties.iter().filter(|p| p.status.is_failure()).count(),
        average_ppsf: average_ppsf(properties),
        average_investment_score: average_investment_score(properties),
        total_estimated_value: properties.iter().map(PropertyView::price).sum(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// `$1,250,000`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        format!("-${out}")
    } else {
        format!("${out}")
    }
}

/// Whole numbers print without a decimal point; others with one place.
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

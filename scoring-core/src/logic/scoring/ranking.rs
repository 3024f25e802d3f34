//! Priority ranking
//!
//! Descending by score, missing scores last, ties keep input order.
//! Unscored rows carry their raw total risk as composite score, so the same
//! ordering doubles as the non-ML fallback ranking.

use std::cmp::Ordering;

use crate::logic::features::FeatureRow;
use super::types::AugmentedRow;

/// Stable descending sort on an optional score
pub fn rank_by<T, F>(items: &mut [T], score: F)
where
    F: Fn(&T) -> Option<f64>,
{
    items.sort_by(|a, b| compare_desc(score(a), score(b)));
}

fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.filter(|v| !v.is_nan());
    let b = b.filter(|v| !v.is_nan());

    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn rank_by_composite(rows: &mut [AugmentedRow]) {
    rank_by(rows, |r| r.composite_score);
}

/// Fallback when ML is unavailable: raw total risk, highest first
pub fn rank_by_total_risk(rows: &mut [FeatureRow]) {
    rank_by(rows, FeatureRow::total_risk);
}

/// The `n` highest composite scores, ranked
pub fn top_n(rows: &[AugmentedRow], n: usize) -> Vec<AugmentedRow> {
    let mut ranked = rows.to_vec();
    rank_by_composite(&mut ranked);
    ranked.truncate(n);
    ranked
}

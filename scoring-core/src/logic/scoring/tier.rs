//! Priority tiers
//!
//! Bins over the composite score, left-exclusive and right-inclusive:
//! `(-inf, 5] Baixa`, `(5, 8] Média`, `(8, 11] Alta`, `(11, inf) Crítica`.
//! A score of exactly 0 falls in Baixa.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper (inclusive) edges of Baixa, Média and Alta
pub const TIER_EDGES: [f64; 3] = [5.0, 8.0, 11.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityTier {
    #[serde(rename = "Baixa")]
    Baixa,
    #[serde(rename = "Média")]
    Media,
    #[serde(rename = "Alta")]
    Alta,
    #[serde(rename = "Crítica")]
    Critica,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 4] = [
        PriorityTier::Baixa,
        PriorityTier::Media,
        PriorityTier::Alta,
        PriorityTier::Critica,
    ];

    /// Tier for a finite composite score
    pub fn from_score(score: f64) -> Self {
        debug_assert!(!score.is_nan(), "tier of NaN score");

        if score <= TIER_EDGES[0] {
            PriorityTier::Baixa
        } else if score <= TIER_EDGES[1] {
            PriorityTier::Media
        } else if score <= TIER_EDGES[2] {
            PriorityTier::Alta
        } else {
            PriorityTier::Critica
        }
    }

    /// `None` when the score is missing or not finite
    pub fn classify(score: Option<f64>) -> Option<Self> {
        score.filter(|s| s.is_finite()).map(Self::from_score)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::Baixa => "Baixa",
            PriorityTier::Media => "Média",
            PriorityTier::Alta => "Alta",
            PriorityTier::Critica => "Crítica",
        }
    }

    /// Dashboard color for charts
    pub fn color(&self) -> &'static str {
        match self {
            PriorityTier::Baixa => "#689f38",
            PriorityTier::Media => "#fbc02d",
            PriorityTier::Alta => "#f57c00",
            PriorityTier::Critica => "#d32f2f",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_edges_are_right_inclusive() {
        assert_eq!(PriorityTier::from_score(5.0), PriorityTier::Baixa);
        assert_eq!(PriorityTier::from_score(5.0001), PriorityTier::Media);
        assert_eq!(PriorityTier::from_score(8.0), PriorityTier::Media);
        assert_eq!(PriorityTier::from_score(8.5), PriorityTier::Alta);
        assert_eq!(PriorityTier::from_score(11.0), PriorityTier::Alta);
        assert_eq!(PriorityTier::from_score(11.01), PriorityTier::Critica);
        assert_eq!(PriorityTier::from_score(150.0), PriorityTier::Critica);
    }

    #[test]
    fn test_zero_and_negative_are_baixa() {
        assert_eq!(PriorityTier::from_score(0.0), PriorityTier::Baixa);
        assert_eq!(PriorityTier::from_score(-2.0), PriorityTier::Baixa);
    }

    #[test]
    fn test_ordering() {
        assert!(PriorityTier::Baixa < PriorityTier::Media);
        assert!(PriorityTier::Media < PriorityTier::Alta);
        assert!(PriorityTier::Alta < PriorityTier::Critica);
    }

    #[test]
    fn test_classify_missing() {
        assert_eq!(PriorityTier::classify(None), None);
        assert_eq!(PriorityTier::classify(Some(f64::NAN)), None);
        assert_eq!(PriorityTier::classify(Some(9.0)), Some(PriorityTier::Alta));
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_string(&PriorityTier::ALL).unwrap();
        assert_eq!(json, r#"["Baixa","Média","Alta","Crítica"]"#);
        let back: PriorityTier = serde_json::from_str(r#""Crítica""#).unwrap();
        assert_eq!(back, PriorityTier::Critica);
    }
}

//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the scoring schema**
//!
//! Names are the warehouse column names of the aggregated indicator view.
//! Add, remove or reorder a feature → increment FEATURE_VERSION.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Required features, in matrix column order
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Risk scores (0-2) ===
    "score_risco_total",      // 0: Consolidated total risk score
    "score_equacao_contabil", // 1: Accounting-equation inconsistency score
    "score_neaf",             // 2: NEAF indication score

    // === Size (3-4) ===
    "ativo_milhoes",          // 3: Total assets, R$ millions
    "receita_milhoes",        // 4: Net revenue, R$ millions

    // === Ratios (5-7) ===
    "liquidez",               // 5: Current liquidity ratio
    "endividamento",          // 6: General leverage ratio
    "margem_liquida",         // 7: Net margin, percent
];

/// Total number of features
/// Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 8;

/// Column of the total risk score; re-added to the composite score
pub const TOTAL_RISK_INDEX: usize = 0;

/// Column name of the total risk score
pub const TOTAL_RISK_FEATURE: &str = "score_risco_total";

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version and ordered feature names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout description for API responses and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

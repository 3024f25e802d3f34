//! ECD Scoring - Risk prioritization engine for accounting filings
//!
//! Fits an isolation forest and k-means on each batch of company
//! indicators and turns the result into a composite score and a
//! priority tier. Pure and in-memory; nothing is persisted between calls.

pub mod constants;
pub mod logic;

pub use logic::config::ScoringConfig;
pub use logic::features::{FeatureRow, LayoutInfo, RowId, FEATURE_LAYOUT};
pub use logic::scoring::{
    augment, fit_and_score, rank_by_composite, rank_by_total_risk, score_batch, top_n,
    AugmentedRow, ModelSummary, PriorityTier, SchemaError, ScoredRow, ScoringEngine,
    ScoringError, ScoringOutcome,
};

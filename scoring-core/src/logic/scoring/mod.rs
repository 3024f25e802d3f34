//! Scoring Module - Composite risk score and priority tiers
//!
//! # Architecture
//! - `engine.rs`: `fit_and_score`, `score_batch`, `ScoringEngine`
//! - `types.rs`: `ScoredRow`, `AugmentedRow`
//! - `tier.rs`: `PriorityTier` bins
//! - `augment.rs`: row-id realignment, `ScoringOutcome`
//! - `ranking.rs`: top-N and fallback ordering
//! - `summary.rs`: metric-card counts
//!
//! # Failure Strategy
//! Too few complete rows → `InsufficientData`; `score_batch` turns that into
//! a `Skipped` outcome so callers can rank by raw risk instead.

pub mod augment;
pub mod engine;
pub mod error;
pub mod ranking;
pub mod summary;
pub mod tier;
pub mod types;

pub use augment::{augment, ScoringOutcome};
pub use engine::{fit_and_score, score_batch, ScoringEngine};
pub use error::{SchemaError, ScoringError};
pub use ranking::{rank_by, rank_by_composite, rank_by_total_risk, top_n};
pub use summary::ModelSummary;
pub use tier::PriorityTier;
pub use types::{AugmentedRow, ScoredRow};

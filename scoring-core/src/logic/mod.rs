//! Logic Module - Scoring pipeline
//!
//! - `config` - options for one scoring call
//! - `features/` - input schema and complete-case extraction
//! - `model/` - scaler, isolation forest, k-means
//! - `scoring/` - composite score, tiers, realignment, ranking

pub mod config;
pub mod features;
pub mod model;
pub mod scoring;

//! Features Module - Input schema for the scoring engine
//!
//! `layout` fixes which indicators are required and in which column order;
//! `vector` holds the row type and the complete-case filter.

pub mod layout;
pub mod vector;


pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, TOTAL_RISK_FEATURE};
pub use vector::{extract_complete_cases, CompleteCases, FeatureRow, RowId};

//! Core orchestration logic.
//!
//! This module contains:
//! - Aggregator: Track discovery and curated/catalog merging
//! - Orchestrator: Per-track download and materialization

pub mod aggregator;
pub mod orchestrator;

// Re-export commonly used types
pub use aggregator::{
    Aggregation, FilterRules, MetadataAggregator, PlaylistListing, SourceStatus,
    MAX_DURATION_SECS, MIN_DURATION_SECS, RESTRICTED_KEYWORDS,
};
pub use orchestrator::Orchestrator;

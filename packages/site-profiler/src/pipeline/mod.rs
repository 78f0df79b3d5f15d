//! The profiling pipeline.
//!
//! - [`classify`] - heuristic website type scoring
//! - [`discover`] - priority secondary page selection
//! - [`merge`] - folding secondary records into the primary one
//! - [`score`] - completeness scoring
//! - [`profiler`] - the orchestrator tying them together

pub mod classify;
pub mod discover;
pub mod merge;
pub mod profiler;
pub mod score;

pub use classify::{classify, MIN_SIGNAL_SCORE};
pub use discover::{discover, CrawlPlan, MAX_SECONDARY_PAGES, PRIORITY_KEYWORDS};
pub use merge::{merge, SecondaryPage};
pub use profiler::Profiler;
pub use score::score_completeness;

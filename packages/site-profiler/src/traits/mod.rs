//! Core trait abstractions for the profiler.
//!
//! These traits are the seams where network access lives: swapping them for
//! the doubles in [`crate::testing`] makes the whole pipeline deterministic.

pub mod extractor;
pub mod fetcher;
pub mod renderer;

//! Storage implementations.

pub mod memory;

pub use memory::{cache_key, normalize_url, ResultCache, DEFAULT_TTL};

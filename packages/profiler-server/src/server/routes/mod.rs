pub mod cache;
pub mod health;
pub mod scrape;

pub use cache::{cache_clear_handler, cache_stats_handler};
pub use health::health_handler;
pub use scrape::scrape_handler;

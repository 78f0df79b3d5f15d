//! HTTP surface for the site profiler.
//!
//! - `POST /scrape` - profile a URL
//! - `GET /cache`, `DELETE /cache` - inspect and clear cached profiles
//! - `GET /health` - liveness plus renderer availability

pub mod config;
pub mod server;

pub use config::{RendererKind, ServerConfig};

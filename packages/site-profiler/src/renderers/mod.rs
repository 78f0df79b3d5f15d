//! Headless rendering backends.
//!
//! - `BrowserlessRenderer` - remote Browserless `/content` API
//! - `ChromeRenderer` - local headless Chromium, one process per render
//! - `RenderPool` - probe-once, bounded session pool the pipeline talks to

mod browserless;
mod chrome;
mod pool;

pub use browserless::BrowserlessRenderer;
pub use chrome::ChromeRenderer;
pub use pool::{RenderPool, RenderSession, RendererStatus};

pub use crate::traits::renderer::{RenderOptions, Renderer};

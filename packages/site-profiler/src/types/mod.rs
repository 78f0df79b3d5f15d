pub mod classification;
pub mod config;
pub mod profile;
pub mod record;

//! Media-site scraping: search, details, episode lists, and stream resolution
//! over HTML pages and metadata-API JSON.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod provider;
pub mod site;
pub mod telemetry;
pub mod tmdb;

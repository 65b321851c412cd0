use std::time::Duration;

use crate::extract::DEFAULT_IMAGE_BASE;
use crate::fetch::HttpFetcherConfig;
use crate::site::profile::BROWSER_USER_AGENT;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug)]
pub struct ScraperConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub image_base: String,
    pub language: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: std::env::var("TMDB_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(base) = std::env::var("TMDB_BASE_URL") {
            cfg.tmdb_base_url = base;
        }
        if let Ok(image) = std::env::var("TMDB_IMAGE_BASE") {
            cfg.image_base = image;
        }
        if let Ok(lang) = std::env::var("TMDB_LANGUAGE") {
            cfg.language = lang;
        }
        if let Ok(timeout) = std::env::var("SCRAPE_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.timeout = Duration::from_secs(parsed);
            }
        }
        if let Ok(ua) = std::env::var("SCRAPE_USER_AGENT") {
            cfg.user_agent = ua;
        }
        cfg
    }

    pub fn http(&self) -> HttpFetcherConfig {
        HttpFetcherConfig { timeout: self.timeout, user_agent: self.user_agent.clone() }
    }
}

//! The four-operation scraper contract a host invokes with plain strings.
//!
//! Providers glue the injected [`Fetcher`] to the [`Extractor`]. Each
//! operation is total: fetch or decode failures are logged and turn into the
//! operation's empty value.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::ScraperConfig;
use crate::extract::{DetailRecord, EpisodeRef, Extractor, MediaKind, SearchHit, StreamSource};
use crate::fetch::{FetchRequest, Fetcher};
use crate::site::{Backend, SiteProfile};
use crate::tmdb::{TmdbClient, TmdbConfig};

mod html;
mod tmdb;

pub use html::HtmlProvider;
pub use tmdb::{SyntheticRef, TmdbProvider};

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, kind: Option<MediaKind>) -> Vec<SearchHit>;

    /// `None` only when the page or API could not be reached at all.
    async fn details(&self, url: &str) -> Option<DetailRecord>;

    async fn episodes(&self, url: &str) -> Vec<EpisodeRef>;

    async fn stream(&self, url: &str) -> Option<StreamSource>;
}

/// Picks the provider for a profile's backend; the fetcher is resolved once here.
pub fn build(profile: SiteProfile, cfg: &ScraperConfig, fetcher: Arc<dyn Fetcher>) -> Arc<dyn Provider> {
    let extractor = Extractor::new(profile).with_image_base(cfg.image_base.clone());
    match extractor.profile().backend {
        Backend::Html => Arc::new(HtmlProvider::new(extractor, fetcher)),
        Backend::Tmdb => {
            let tmdb = TmdbClient::new(fetcher.clone(), TmdbConfig::from(cfg));
            Arc::new(TmdbProvider::new(extractor, tmdb, fetcher))
        }
    }
}

/// GETs a page with the profile's headers; non-2xx is an error.
async fn fetch_page(fetcher: &dyn Fetcher, profile: &SiteProfile, url: &str) -> Result<String> {
    let req = FetchRequest::get(url).with_headers(&profile.headers);
    let resp = fetcher.fetch(req).await.with_context(|| format!("fetching {url}"))?;
    resp.into_text().with_context(|| format!("reading {url}"))
}

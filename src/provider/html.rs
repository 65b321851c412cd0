use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::Instrument;

use crate::extract::{DetailRecord, EpisodeRef, Extractor, MediaKind, SearchHit, StreamSource};
use crate::fetch::Fetcher;
use crate::telemetry;
use crate::telemetry::ops::details::Phase as DetailsPhase;
use crate::telemetry::ops::episodes::Phase as EpisodesPhase;
use crate::telemetry::ops::search::Phase as SearchPhase;
use crate::telemetry::ops::stream::Phase as StreamPhase;

use super::Provider;

/// Scrapes a site's own pages for every operation.
pub struct HtmlProvider {
    extractor: Extractor,
    fetcher: Arc<dyn Fetcher>,
}

impl HtmlProvider {
    pub fn new(extractor: Extractor, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { extractor, fetcher }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        super::fetch_page(self.fetcher.as_ref(), self.extractor.profile(), url).await
    }
}

#[async_trait]
impl Provider for HtmlProvider {
    fn name(&self) -> &str { &self.extractor.profile().name }

    async fn search(&self, query: &str, kind: Option<MediaKind>) -> Vec<SearchHit> {
        let log = telemetry::search();
        let root = log.root_span_kv([("site", self.name().to_string()), ("query", query.to_string())]);
        if query.trim().is_empty() {
            return Vec::new();
        }

        let url = self.extractor.profile().search_url(query);
        let fetched = self
            .fetch_page(&url)
            .instrument(log.span_kv(&SearchPhase::Fetch, [("url", url.clone())]))
            .instrument(root.clone())
            .await;
        let html = match fetched {
            Ok(h) => h,
            Err(e) => { log.degraded(&url, &e); return Vec::new(); }
        };

        let _g = root.enter();
        let hits = { let _s = log.span(&SearchPhase::Extract).entered(); self.extractor.search(&html, kind) };
        log.hits(self.name(), hits.len());
        hits
    }

    async fn details(&self, url: &str) -> Option<DetailRecord> {
        let log = telemetry::details();
        let root = log.root_span_kv([("url", url.to_string())]);
        let fetched = self
            .fetch_page(url)
            .instrument(log.span(&DetailsPhase::Fetch))
            .instrument(root.clone())
            .await;
        let html = match fetched {
            Ok(h) => h,
            Err(e) => { log.degraded(url, &e); return None; }
        };

        let _g = root.enter();
        let _s = log.span(&DetailsPhase::Extract).entered();
        Some(self.extractor.details(&html))
    }

    async fn episodes(&self, url: &str) -> Vec<EpisodeRef> {
        let log = telemetry::episodes();
        let root = log.root_span_kv([("url", url.to_string())]);
        let fetched = self
            .fetch_page(url)
            .instrument(log.span(&EpisodesPhase::Fetch))
            .instrument(root.clone())
            .await;
        let html = match fetched {
            Ok(h) => h,
            Err(e) => { log.degraded(url, &e); return Vec::new(); }
        };

        let _g = root.enter();
        let eps = { let _s = log.span(&EpisodesPhase::Extract).entered(); self.extractor.episodes(&html) };
        log.episodes(self.name(), eps.len());
        eps
    }

    async fn stream(&self, url: &str) -> Option<StreamSource> {
        let log = telemetry::stream();
        let root = log.root_span_kv([("url", url.to_string())]);
        let fetched = self
            .fetch_page(url)
            .instrument(log.span(&StreamPhase::Fetch))
            .instrument(root.clone())
            .await;
        let html = match fetched {
            Ok(h) => h,
            Err(e) => { log.degraded(url, &e); return None; }
        };

        let _g = root.enter();
        let found = { let _s = log.span(&StreamPhase::Extract).entered(); self.extractor.stream(&html) };
        if found.is_none() {
            log.info_kv("no playable source", [("url", url.to_string())]);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::StreamKind;
    use crate::fetch::MockFetcher;
    use crate::site::SiteProfile;

    fn provider(mock: Arc<MockFetcher>) -> HtmlProvider {
        HtmlProvider::new(Extractor::new(SiteProfile::willow()), mock)
    }

    #[tokio::test]
    async fn search_fetches_query_url() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_ok(r#"<a href="/movies/3-heat"><h2>Heat</h2></a>"#);
        let hits = provider(mock.clone()).search("heat 1995", None).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Heat");
        assert_eq!(hits[0].target_url, "https://willow.arlen.icu/movies/3-heat");
        assert_eq!(mock.urls(), vec!["https://willow.arlen.icu/search?q=heat+1995"]);
    }

    #[tokio::test]
    async fn blank_query_skips_network() {
        let mock = Arc::new(MockFetcher::new());
        assert!(provider(mock.clone()).search("  ", None).await.is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_failures_degrade_to_empty() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_status(500);
        mock.push_status(404);
        mock.push_status(502);
        let p = provider(mock.clone());
        assert!(p.search("x", None).await.is_empty());
        assert!(p.details("https://willow.arlen.icu/movies/1-x").await.is_none());
        assert!(p.episodes("https://willow.arlen.icu/series/1-x").await.is_empty());
        // queue is dry, so this one is a transport error
        assert!(p.stream("https://willow.arlen.icu/movies/1-x").await.is_none());
        assert_eq!(mock.calls().len(), 4);
    }

    #[tokio::test]
    async fn details_and_stream_from_pages() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_ok(r#"<h1>Heat</h1><p class="summary">Cops and robbers.</p><span class="year">1995</span>"#);
        mock.push_ok(r#"<video src="/media/heat.mp4"></video>"#);
        let p = provider(mock);
        let rec = p.details("https://willow.arlen.icu/movies/3-heat").await.unwrap();
        assert_eq!(rec.synopsis, "Cops and robbers.");
        assert_eq!(rec.release_info, "1995");
        let s = p.stream("https://willow.arlen.icu/movies/3-heat").await.unwrap();
        assert_eq!(s.target_url, "https://willow.arlen.icu/media/heat.mp4");
        assert_eq!(s.kind, StreamKind::Direct);
    }

    #[tokio::test]
    async fn profile_headers_travel_with_requests() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_ok("<p>nothing</p>");
        let mut profile = SiteProfile::willow();
        profile.headers = vec![("Referer".into(), "https://willow.arlen.icu/".into())];
        let p = HtmlProvider::new(Extractor::new(profile), mock.clone());
        assert!(p.stream("https://willow.arlen.icu/movies/1-x").await.is_none());
        assert_eq!(mock.calls()[0].headers, vec![("Referer".to_string(), "https://willow.arlen.icu/".to_string())]);
    }
}

use std::sync::{Arc, LazyLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::Instrument;

use crate::extract::episodes::finalize;
use crate::extract::normalize::absolute_url;
use crate::extract::{DetailRecord, EpisodeRef, Extractor, MediaKind, SearchHit, StreamKind, StreamSource};
use crate::fetch::Fetcher;
use crate::telemetry;
use crate::telemetry::ops::details::Phase as DetailsPhase;
use crate::telemetry::ops::episodes::Phase as EpisodesPhase;
use crate::telemetry::ops::search::Phase as SearchPhase;
use crate::telemetry::ops::stream::Phase as StreamPhase;
use crate::tmdb::{detail_record, TmdbClient};

use super::Provider;

static SYNTHETIC_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/tmdb/(movie|tv)/(\d+)(?:/(\d+)/(\d+))?/?$").expect("synthetic url regex should compile")
});

const FULL_MOVIE: &str = "Full Movie";

/// A `{base}/tmdb/{movie|tv}/{id}[/{season}/{episode}]` target minted by search and episodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SyntheticRef {
    pub kind: MediaKind,
    pub id: u64,
    pub episode: Option<(u32, u32)>,
}

impl SyntheticRef {
    pub fn parse(url: &str) -> Option<Self> {
        let caps = SYNTHETIC_URL.captures(url.trim())?;
        let kind = MediaKind::from_api_str(caps.get(1)?.as_str())?;
        let id = caps.get(2)?.as_str().parse().ok()?;
        let episode = match (caps.get(3), caps.get(4)) {
            (Some(s), Some(e)) => Some((s.as_str().parse().ok()?, e.as_str().parse().ok()?)),
            _ => None,
        };
        Some(SyntheticRef { kind, id, episode })
    }

    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match self.episode {
            Some((s, e)) => format!("{base}/tmdb/{}/{}/{s}/{e}", self.kind.as_api_str(), self.id),
            None => format!("{base}/tmdb/{}/{}", self.kind.as_api_str(), self.id),
        }
    }
}

/// Metadata from TMDB, players from the site's mirror pages.
pub struct TmdbProvider {
    extractor: Extractor,
    tmdb: TmdbClient,
    fetcher: Arc<dyn Fetcher>,
}

impl TmdbProvider {
    pub fn new(extractor: Extractor, tmdb: TmdbClient, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { extractor, tmdb, fetcher }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        super::fetch_page(self.fetcher.as_ref(), self.extractor.profile(), url).await
    }

    async fn try_details(&self, url: &str) -> Result<DetailRecord> {
        let log = telemetry::details();
        let synthetic = { let _s = log.span(&DetailsPhase::Resolve).entered(); SyntheticRef::parse(url) };
        match synthetic {
            Some(r) => {
                let d = self.tmdb.details(r.kind, r.id).instrument(log.span(&DetailsPhase::Fetch)).await?;
                Ok(detail_record(&d))
            }
            None => {
                let html = self.fetch_page(url).instrument(log.span(&DetailsPhase::Fetch)).await?;
                let _s = log.span(&DetailsPhase::Extract).entered();
                Ok(self.extractor.details(&html))
            }
        }
    }

    async fn try_episodes(&self, url: &str) -> Result<Vec<EpisodeRef>> {
        let log = telemetry::episodes();
        let synthetic = { let _s = log.span(&EpisodesPhase::Resolve).entered(); SyntheticRef::parse(url) };
        let Some(r) = synthetic else {
            let html = self.fetch_page(url).instrument(log.span(&EpisodesPhase::Fetch)).await?;
            let _s = log.span(&EpisodesPhase::Extract).entered();
            return Ok(self.extractor.episodes(&html));
        };
        if r.kind == MediaKind::Movie {
            let season = self.extractor.profile().episodes.season;
            return Ok(vec![EpisodeRef {
                target_url: url.trim().to_string(),
                index: 1,
                season,
                title: Some(FULL_MOVIE.to_string()),
            }]);
        }

        let season_no = self.extractor.profile().episodes.season;
        let season = self.tmdb.season(r.id, season_no).instrument(log.span(&EpisodesPhase::Fetch)).await?;
        let base = &self.extractor.profile().base_url;
        let eps = season
            .episodes
            .into_iter()
            .filter(|e| e.episode_number > 0)
            .map(|e| EpisodeRef {
                target_url: SyntheticRef { episode: Some((season_no, e.episode_number)), ..r }.url(base),
                index: e.episode_number,
                season: season_no,
                title: e.name.filter(|n| !n.trim().is_empty()),
            })
            .collect();
        Ok(finalize(eps))
    }

    /// Absolute URL of a content page on the mirror site itself, if `url` is one.
    fn own_content_page(&self, url: &str) -> Option<String> {
        let profile = self.extractor.profile();
        let base = profile.base_url.trim_end_matches('/').to_ascii_lowercase();
        let abs = absolute_url(url, &profile.base_url);
        let lower = abs.to_ascii_lowercase();
        let on_site = lower == base || lower.starts_with(&format!("{base}/"));
        (on_site && profile.kind_for(&abs[base.len()..]).is_some()).then_some(abs)
    }

    /// A mirror content page: fetch it and take its player.
    async fn try_page_stream(&self, url: &str) -> Result<Option<StreamSource>> {
        let log = telemetry::stream();
        let page = self.fetch_page(url).instrument(log.span(&StreamPhase::Fetch)).await?;
        let _s = log.span(&StreamPhase::Extract).entered();
        Ok(self.extractor.stream(&page))
    }

    /// Any other absolute http(s) URL is taken to be a player embed already.
    fn embed_passthrough(&self, url: &str) -> Option<StreamSource> {
        let lower = url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return None;
        }
        Some(StreamSource {
            target_url: url.to_string(),
            kind: StreamKind::Iframe,
            label: self.extractor.profile().stream.label.clone(),
        })
    }

    /// Title lookup, mirror search, content page, then the embedded player.
    async fn try_stream(&self, r: SyntheticRef) -> Result<Option<StreamSource>> {
        let log = telemetry::stream();
        let details = self.tmdb.details(r.kind, r.id).instrument(log.span(&StreamPhase::Resolve)).await?;
        let title = details.display_title().ok_or_else(|| anyhow!("no title for {} {}", r.kind.as_api_str(), r.id))?;

        let search_url = self.extractor.profile().search_url(title);
        let listing = self
            .fetch_page(&search_url)
            .instrument(log.span_kv(&StreamPhase::Lookup, [("url", search_url.clone())]))
            .await?;
        let Some(content_url) = self.extractor.first_content_link(&listing) else {
            log.info_kv("no mirror match", [("title", title.to_string())]);
            return Ok(None);
        };

        let page = self
            .fetch_page(&content_url)
            .instrument(log.span_kv(&StreamPhase::Fetch, [("url", content_url.clone())]))
            .await?;
        let found = { let _s = log.span(&StreamPhase::Extract).entered(); self.extractor.stream(&page) };
        Ok(found.map(|src| match r.episode {
            Some((s, e)) => StreamSource {
                target_url: format!("{}/{s}/{e}", src.target_url.trim_end_matches('/')),
                kind: StreamKind::Episode,
                label: src.label,
            },
            None => src,
        }))
    }
}

#[async_trait]
impl Provider for TmdbProvider {
    fn name(&self) -> &str { &self.extractor.profile().name }

    async fn search(&self, query: &str, kind: Option<MediaKind>) -> Vec<SearchHit> {
        let log = telemetry::search();
        let root = log.root_span_kv([("site", self.name().to_string()), ("query", query.to_string())]);
        if query.trim().is_empty() {
            return Vec::new();
        }

        let fetched = self
            .tmdb
            .search_multi(query)
            .instrument(log.span(&SearchPhase::Query))
            .instrument(root.clone())
            .await;
        let body = match fetched {
            Ok(b) => b,
            Err(e) => { log.degraded(query, &anyhow::Error::from(e)); return Vec::new(); }
        };

        let _g = root.enter();
        let hits = { let _s = log.span(&SearchPhase::Extract).entered(); self.extractor.search(&body, kind) };
        log.hits(self.name(), hits.len());
        hits
    }

    async fn details(&self, url: &str) -> Option<DetailRecord> {
        let log = telemetry::details();
        let root = log.root_span_kv([("url", url.to_string())]);
        match self.try_details(url).instrument(root).await {
            Ok(rec) => Some(rec),
            Err(e) => { log.degraded(url, &e); None }
        }
    }

    async fn episodes(&self, url: &str) -> Vec<EpisodeRef> {
        let log = telemetry::episodes();
        let root = log.root_span_kv([("url", url.to_string())]);
        match self.try_episodes(url).instrument(root).await {
            Ok(eps) => { log.episodes(self.name(), eps.len()); eps }
            Err(e) => { log.degraded(url, &e); Vec::new() }
        }
    }

    async fn stream(&self, url: &str) -> Option<StreamSource> {
        let log = telemetry::stream();
        let root = log.root_span_kv([("url", url.to_string())]);
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return None;
        }
        let resolved = match SyntheticRef::parse(trimmed) {
            Some(r) => self.try_stream(r).instrument(root).await,
            None => match self.own_content_page(trimmed) {
                Some(page_url) => self.try_page_stream(&page_url).instrument(root).await,
                None => Ok(self.embed_passthrough(trimmed)),
            },
        };
        match resolved {
            Ok(found) => found,
            Err(e) => { log.degraded(url, &e); None }
        }
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extract::types::{MediaKind, DEFAULT_PLAYER_LABEL};

/// Path fragment that marks a link as pointing at a detail page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentPath {
    pub marker: String,
    pub kind: MediaKind,
}

impl ContentPath {
    pub fn new(marker: &str, kind: MediaKind) -> Self {
        ContentPath { marker: marker.to_string(), kind }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSelectors {
    /// `{base}` and `{query}` / `{slug}` are substituted.
    pub url_template: String,
    /// Restricts strategy (a) to anchors matching this selector when set.
    pub anchor: Option<String>,
    pub title: Vec<String>,
    pub year: Vec<String>,
    pub image_attrs: Vec<String>,
    pub max_text_candidates: usize,
}

impl Default for SearchSelectors {
    fn default() -> Self {
        SearchSelectors {
            url_template: "{base}/search?q={query}".into(),
            anchor: None,
            title: strings(&["h1", "h2", "h3", "h4", "h5", "h6", ".title", "[class*=\"title\"]"]),
            year: strings(&[".year", "time", ".date"]),
            image_attrs: strings(&["data-src", "data-lazy-src", "src"]),
            max_text_candidates: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub description: Vec<String>,
    pub alternate_title: Vec<String>,
    pub release: Vec<String>,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        DetailSelectors {
            description: strings(&[
                ".description", ".overview", ".synopsis", ".plot", ".summary",
                "meta[name=\"description\"]", "meta[property=\"og:description\"]",
                ".content p",
            ]),
            alternate_title: strings(&["h1", "h2", ".title", ".movie-title", ".series-title"]),
            release: strings(&[".year", ".date", ".release-date", "time", ".aired"]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonGrid {
    pub season_item: String,
    pub episode_item: String,
    pub player: String,
}

impl Default for SeasonGrid {
    fn default() -> Self {
        SeasonGrid {
            season_item: ".ss-item[data-id]".into(),
            episode_item: ".eps-item[data-s-id][data-number]".into(),
            player: "iframe#iframe-embed".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeSelectors {
    pub links: Vec<String>,
    pub season: u32,
    pub season_grid: Option<SeasonGrid>,
}

impl Default for EpisodeSelectors {
    fn default() -> Self {
        EpisodeSelectors {
            links: strings(&[
                "a[href*=\"/series/\"][href*=\"/1/\"]",
                "a[href*=\"/episodes/\"]",
                ".episode a",
                ".episode-item a",
                ".episode-list a",
            ]),
            season: 1,
            season_grid: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSelectors {
    pub media: Vec<String>,
    pub media_attrs: Vec<String>,
    pub iframes: Vec<String>,
    pub meta: Vec<String>,
    pub label: String,
}

impl Default for StreamSelectors {
    fn default() -> Self {
        StreamSelectors {
            media: strings(&[
                "video source", "video", "source[src]",
                "[data-src*=\".m3u8\"]", "[data-src*=\".mp4\"]",
            ]),
            media_attrs: strings(&["src", "data-src", "data-lazy-src"]),
            iframes: strings(&["iframe[src*=\"embed\"]", "iframe[src*=\"player\"]"]),
            meta: strings(&[
                "meta[property=\"og:video:secure_url\"]",
                "meta[property=\"og:video:url\"]",
                "meta[property=\"og:video\"]",
                "meta[name=\"twitter:player:stream\"]",
            ]),
            label: DEFAULT_PLAYER_LABEL.into(),
        }
    }
}

/// Where search/details/episodes come from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Html,
    Tmdb,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub backend: Backend,
    pub content_paths: Vec<ContentPath>,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub search: SearchSelectors,
    #[serde(default)]
    pub details: DetailSelectors,
    #[serde(default)]
    pub episodes: EpisodeSelectors,
    #[serde(default)]
    pub stream: StreamSelectors,
}

impl SiteProfile {
    /// Directly scraped site with `/movies/<id>-<slug>` and `/series/<id>-<slug>` pages.
    pub fn willow() -> Self {
        SiteProfile {
            name: "willow".into(),
            base_url: "https://willow.arlen.icu".into(),
            backend: Backend::Html,
            content_paths: vec![
                ContentPath::new("/movies/", MediaKind::Movie),
                ContentPath::new("/series/", MediaKind::Series),
            ],
            headers: Vec::new(),
            search: SearchSelectors::default(),
            details: DetailSelectors::default(),
            episodes: EpisodeSelectors::default(),
            stream: StreamSelectors::default(),
        }
    }

    /// TMDB-backed proxy: metadata comes from the API, players from the mirror site.
    pub fn flixer() -> Self {
        let mut stream = StreamSelectors::default();
        stream.iframes.insert(0, "iframe#iframe-embed".into());
        stream.label = "VidSrc Player".into();
        SiteProfile {
            name: "flixer".into(),
            base_url: "https://flixer.su".into(),
            backend: Backend::Tmdb,
            content_paths: vec![
                ContentPath::new("/movie/", MediaKind::Movie),
                ContentPath::new("/tv/", MediaKind::Series),
            ],
            headers: vec![("User-Agent".into(), BROWSER_USER_AGENT.into())],
            search: SearchSelectors {
                url_template: "{base}/search/{slug}".into(),
                anchor: Some("a.film-poster-ahref".into()),
                ..SearchSelectors::default()
            },
            details: DetailSelectors::default(),
            episodes: EpisodeSelectors {
                season_grid: Some(SeasonGrid::default()),
                ..EpisodeSelectors::default()
            },
            stream,
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "willow" => Some(Self::willow()),
            "flixer" => Some(Self::flixer()),
            _ => None,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading site profile {}", path.display()))?;
        let profile: SiteProfile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing site profile {}", path.display()))?;
        Ok(profile)
    }

    /// Media kind implied by the first content marker found in `href`.
    pub fn kind_for(&self, href: &str) -> Option<MediaKind> {
        let lower = href.to_ascii_lowercase();
        self.content_paths
            .iter()
            .find(|p| lower.contains(&p.marker.to_ascii_lowercase()))
            .map(|p| p.kind)
    }

    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
        self.search
            .url_template
            .replace("{base}", self.base_url.trim_end_matches('/'))
            .replace("{query}", &encoded)
            .replace("{slug}", &crate::extract::normalize::slugify(query))
    }
}

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

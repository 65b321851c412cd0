use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::extract::cascade::{first_non_empty, Strategy};
use crate::extract::normalize::{absolute_url, clean_title, title_from_path};
use crate::extract::page::{descendant, first_attr, parent_element, text_of, Page};
use crate::extract::types::{MediaKind, SearchHit};
use crate::site::SiteProfile;
use crate::tmdb::types::SearchResponse;

static PLAUSIBLE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9\s\-:.'()]+$").expect("plausible title regex should compile")
});
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year regex should compile"));

pub fn looks_like_json(document: &str) -> bool {
    matches!(document.trim_start().chars().next(), Some('{') | Some('['))
}

/// Maps a metadata-API search response into hits of the accepted kinds.
pub fn from_json(document: &str, profile: &SiteProfile, image_base: &str, kind: Option<MediaKind>) -> Vec<SearchHit> {
    let resp: SearchResponse = match serde_json::from_str(document) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "search response is not valid json");
            return Vec::new();
        }
    };
    let base = profile.base_url.trim_end_matches('/');
    let mut out = Vec::new();
    for item in resp.results {
        let Some(item_kind) = item.media_type.as_deref().and_then(MediaKind::from_api_str) else { continue };
        if kind.is_some_and(|k| k != item_kind) { continue; }
        let Some(id) = item.id else { continue };
        let title = match item_kind {
            MediaKind::Movie => item.title.as_deref().or(item.name.as_deref()),
            MediaKind::Series => item.name.as_deref().or(item.title.as_deref()),
        };
        let title = clean_title(title.unwrap_or_default());
        if title.is_empty() { continue; }
        let date = item.release_date.as_deref().or(item.first_air_date.as_deref()).unwrap_or_default();
        let image_url = match item.poster_path.as_deref() {
            Some(p) if !p.is_empty() => format!("{}{}", image_base.trim_end_matches('/'), p),
            _ => String::new(),
        };
        out.push(SearchHit {
            title,
            image_url,
            target_url: format!("{base}/tmdb/{}/{id}", item_kind.as_api_str()),
            year: year_from_date(date),
            media_kind: item_kind,
        });
    }
    out
}

/// `2020-05-01` -> `2020`; anything without a leading 4-char component is dropped.
pub fn year_from_date(date: &str) -> Option<String> {
    let head = date.split(['-', '/', '.']).next().unwrap_or_default().trim();
    let year: String = head.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) { Some(year) } else { None }
}

pub fn from_html(page: &Page<'_>) -> Vec<SearchHit> {
    let strategies = [
        Strategy::new("content-anchors", content_anchors as fn(&Page<'_>) -> Option<Vec<SearchHit>>),
        Strategy::new("any-content-link", any_content_link),
        Strategy::new("text-lines", text_lines),
    ];
    first_non_empty(page, &strategies)
}

/// Strategy (a): structural match on anchors pointing at detail pages.
fn content_anchors(page: &Page<'_>) -> Option<Vec<SearchHit>> {
    let profile = page.profile;
    let selector = match &profile.search.anchor {
        Some(sel) => sel.clone(),
        None => profile
            .content_paths
            .iter()
            .map(|p| format!("a[href*=\"{}\"]", p.marker))
            .collect::<Vec<_>>()
            .join(", "),
    };
    if selector.is_empty() { return None; }
    let title_sel = profile.search.title.join(", ");

    let mut hits = Vec::new();
    for link in page.select_all(&selector) {
        let Some(href) = link.value().attr("href").map(str::trim).filter(|h| !h.is_empty()) else { continue };
        let title_el = descendant(&link, &title_sel)
            .or_else(|| parent_element(&link).and_then(|p| descendant(&p, &title_sel)));
        let title = match title_el {
            Some(el) => text_of(&el),
            None => strict_path_title(profile, href).unwrap_or_default(),
        };
        let title = clean_title(&title);
        if title.is_empty() { continue; }

        let image = descendant(&link, "img")
            .and_then(|img| first_attr(&img, &profile.search.image_attrs))
            .unwrap_or_default();
        let year = profile
            .search
            .year
            .iter()
            .filter_map(|s| descendant(&link, s))
            .find_map(|el| YEAR.find(&text_of(&el)).map(|m| m.as_str().to_string()));

        hits.push(SearchHit {
            title,
            image_url: absolute_url(&image, page.base()),
            target_url: absolute_url(href, page.base()),
            year,
            media_kind: kind_of(page, href),
        });
    }
    Some(hits)
}

/// Only `/<marker>/<id>-<slug>` paths are trusted to carry a title in strategy (a).
fn strict_path_title(profile: &SiteProfile, href: &str) -> Option<String> {
    profile.content_paths.iter().find_map(|p| {
        let lower = href.to_ascii_lowercase();
        let idx = lower.find(&p.marker.to_ascii_lowercase())?;
        let rest = &href[idx + p.marker.len()..];
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 || !rest[digits..].starts_with('-') { return None; }
        title_from_path(href, &p.marker)
    })
}

/// Strategy (b): every link whose href mentions a content marker.
fn any_content_link(page: &Page<'_>) -> Option<Vec<SearchHit>> {
    let profile = page.profile;
    let mut hits = Vec::new();
    for link in page.select_all("a[href]") {
        let Some(href) = link.value().attr("href").map(str::trim) else { continue };
        let Some(path) = profile
            .content_paths
            .iter()
            .find(|p| href.to_ascii_lowercase().contains(&p.marker.to_ascii_lowercase()))
        else { continue };

        let text = clean_title(&text_of(&link));
        let title = if text.is_empty() {
            title_from_path(href, &path.marker).unwrap_or_default()
        } else {
            text
        };
        if title.is_empty() { continue; }

        let image = descendant(&link, "img")
            .and_then(|img| first_attr(&img, &profile.search.image_attrs))
            .unwrap_or_default();
        hits.push(SearchHit {
            title,
            image_url: absolute_url(&image, page.base()),
            target_url: absolute_url(href, page.base()),
            year: None,
            media_kind: path.kind,
        });
    }
    Some(hits)
}

/// Strategy (c): low-confidence scan of text lines that look like titles.
fn text_lines(page: &Page<'_>) -> Option<Vec<SearchHit>> {
    let profile = page.profile;
    let cap = profile.search.max_text_candidates;
    let mut hits = Vec::new();
    for line in page.visible_text_lines() {
        if hits.len() >= cap { break; }
        let n = line.chars().count();
        if n <= 3 || n >= 100 || !PLAUSIBLE_TITLE.is_match(&line) { continue; }
        let encoded: String = url::form_urlencoded::byte_serialize(line.as_bytes()).collect();
        hits.push(SearchHit {
            title: clean_title(&line),
            image_url: String::new(),
            target_url: format!("{}/search?q={encoded}", profile.base_url.trim_end_matches('/')),
            year: None,
            media_kind: page.kind.unwrap_or(MediaKind::Movie),
        });
    }
    Some(hits)
}

/// First link to a detail page: the profile's anchor selector, else any content link.
pub fn first_content_link(page: &Page<'_>) -> Option<String> {
    let href_of = |el: &scraper::ElementRef<'_>| {
        el.value().attr("href").map(str::trim).filter(|h| !h.is_empty()).map(str::to_string)
    };
    let structured = page
        .profile
        .search
        .anchor
        .as_deref()
        .and_then(|sel| page.select_all(sel).iter().find_map(href_of));
    let href = structured.or_else(|| {
        page.select_all("a[href]")
            .iter()
            .filter_map(href_of)
            .find(|h| page.profile.kind_for(h).is_some())
    })?;
    Some(absolute_url(&href, page.base()))
}

fn kind_of(page: &Page<'_>, href: &str) -> MediaKind {
    page.profile
        .kind_for(href)
        .or(page.kind)
        .unwrap_or(MediaKind::Movie)
}

/// Drops repeats by target URL, or by lower-cased title when the URL is empty.
pub fn dedupe(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|h| {
            let key = if h.target_url.is_empty() {
                format!("title:{}", h.title.to_lowercase())
            } else {
                format!("url:{}", h.target_url.trim_end_matches('/'))
            };
            seen.insert(key)
        })
        .collect()
}

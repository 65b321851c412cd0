use std::sync::LazyLock;

use regex::Regex;

use crate::extract::cascade::{first_some, Strategy};
use crate::extract::normalize::absolute_url;
use crate::extract::page::{first_attr, Page};
use crate::extract::types::{StreamKind, StreamSource};

static SCRIPT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"["']([^"']*\.m3u8[^"']*)["']"#,
        r#"["']([^"']*\.mp4[^"']*)["']"#,
        r#"(?i)\b(?:src|url|file)["']?\s*[:=]\s*["']([^"']+)["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("script stream regex should compile"))
    .collect()
});
static PAGE_MEDIA_URL: LazyLock<Regex> = LazyLock::new(|| {
    // the extension must end the URL path; `video.mp4.jpg` is an image
    Regex::new(r#"(https?://[^\s"'<>]+?\.(?:m3u8|mp4)(?:[?#][^\s"'<>]*)?)(?:$|[\s"'<>])"#)
        .expect("page media url regex should compile")
});

pub fn from_html(page: &Page<'_>) -> Option<StreamSource> {
    let strategies = [
        Strategy::new("media-element", media_element as fn(&Page<'_>) -> Option<StreamSource>),
        Strategy::new("player-iframe", player_iframe),
        Strategy::new("inline-script", inline_script),
        Strategy::new("video-meta", video_meta),
        Strategy::new("page-scan", page_scan),
    ];
    first_some(page, &strategies)
}

pub fn is_media_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains(".m3u8") || lower.contains(".mp4")
}

fn source(page: &Page<'_>, url: &str, kind: StreamKind) -> Option<StreamSource> {
    let target_url = absolute_url(url, page.base());
    if target_url.is_empty() { return None; }
    Some(StreamSource { target_url, kind, label: page.profile.stream.label.clone() })
}

/// (a) `<video>`/`<source>` and lazy data-src media carriers.
fn media_element(page: &Page<'_>) -> Option<StreamSource> {
    let sel = &page.profile.stream;
    sel.media.iter().find_map(|s| {
        let el = page.select_first(s)?;
        let url = first_attr(&el, &sel.media_attrs)?;
        source(page, &url, StreamKind::Direct)
    })
}

/// (b) iframe whose src carries an embed/player marker.
fn player_iframe(page: &Page<'_>) -> Option<StreamSource> {
    page.profile.stream.iframes.iter().find_map(|s| {
        let el = page.select_first(s)?;
        let url = el.value().attr("src").map(str::trim).filter(|u| !u.is_empty())?;
        source(page, url, StreamKind::Iframe)
    })
}

/// (c) quoted media URLs or `src:`/`url:`/`file:` assignments inside inline scripts.
fn inline_script(page: &Page<'_>) -> Option<StreamSource> {
    for script in page.select_all("script") {
        let body = script.text().collect::<String>();
        if body.trim().is_empty() { continue; }
        for pattern in SCRIPT_PATTERNS.iter() {
            let hit = pattern
                .captures_iter(&body)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().replace("\\/", "/"))
                .find(|u| is_media_url(u));
            if let Some(url) = hit {
                return source(page, &url, StreamKind::Direct);
            }
        }
    }
    None
}

/// (d) `og:video` style meta tags.
fn video_meta(page: &Page<'_>) -> Option<StreamSource> {
    page.profile.stream.meta.iter().find_map(|s| {
        let el = page.select_first(s)?;
        let url = el.value().attr("content").map(str::trim).filter(|u| !u.is_empty())?;
        let kind = if is_media_url(url) { StreamKind::Direct } else { StreamKind::Iframe };
        source(page, url, kind)
    })
}

/// (e) any absolute media URL anywhere in the raw text.
fn page_scan(page: &Page<'_>) -> Option<StreamSource> {
    let m = PAGE_MEDIA_URL.captures(page.raw)?.get(1)?;
    source(page, m.as_str(), StreamKind::Direct)
}

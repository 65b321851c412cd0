use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::extract::cascade::{first_non_empty, Strategy};
use crate::extract::normalize::{absolute_url, clean_title};
use crate::extract::page::{descendant, text_of, Page};
use crate::extract::types::EpisodeRef;

static SERIES_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/series/\d+-[^/]+/(\d+)/(\d+)").expect("series path regex should compile")
});
static EPISODE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:episode|ep\.?)\s*(\d+)|^(\d+)$").expect("episode text regex should compile")
});
static SEASON_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)season\s*(\d+)").expect("season text regex should compile"));

pub fn from_html(page: &Page<'_>) -> Vec<EpisodeRef> {
    let strategies = [
        Strategy::new("episode-links", episode_links as fn(&Page<'_>) -> Option<Vec<EpisodeRef>>),
        Strategy::new("season-grid", season_grid),
    ];
    finalize(first_non_empty(page, &strategies))
}

/// Unique indices, first occurrence kept, ascending.
pub fn finalize(episodes: Vec<EpisodeRef>) -> Vec<EpisodeRef> {
    let mut seen = HashSet::new();
    let mut out: Vec<EpisodeRef> = episodes.into_iter().filter(|e| seen.insert(e.index)).collect();
    out.sort_by_key(|e| e.index);
    out
}

/// `(season, episode)` from `/series/<id>-<slug>/<season>/<episode>`, else the
/// episode alone from the link text.
pub fn parse_index(href: &str, text: &str) -> Option<(Option<u32>, u32)> {
    if let Some(caps) = SERIES_PATH.captures(href) {
        if let Ok(n) = caps[2].parse::<u32>() {
            return Some((caps[1].parse().ok(), n));
        }
    }
    let caps = EPISODE_TEXT.captures(text.trim())?;
    let n = caps.get(1).or_else(|| caps.get(2))?.as_str().parse().ok()?;
    Some((None, n))
}

fn episode_links(page: &Page<'_>) -> Option<Vec<EpisodeRef>> {
    let season = page.profile.episodes.season;
    for selector in &page.profile.episodes.links {
        let links = page.select_all(selector);
        if links.is_empty() { continue; }

        let mut explicit = Vec::new();
        let mut positional = Vec::new();
        for (pos, link) in links.iter().enumerate() {
            let Some(href) = link.value().attr("href").map(str::trim).filter(|h| !h.is_empty()) else { continue };
            let text = text_of(link);
            let parsed = parse_index(href, &text);
            let index = parsed.map(|(_, n)| n).unwrap_or(pos as u32 + 1);
            if index == 0 { continue; }
            let title = clean_title(&text);
            let ep = EpisodeRef {
                target_url: absolute_url(href, page.base()),
                index,
                season: parsed.and_then(|(s, _)| s).unwrap_or(season),
                title: (!title.is_empty()).then_some(title),
            };
            if parsed.is_some() { explicit.push(ep) } else { positional.push(ep) }
        }
        // explicit indices go first so finalize never drops one for a positional guess
        explicit.extend(positional);
        // first selector that matches anything decides, even if every link was unusable
        return Some(explicit);
    }
    None
}

/// Season headers carry `data-id`; episode items point back via `data-s-id`.
fn season_grid(page: &Page<'_>) -> Option<Vec<EpisodeRef>> {
    let grid = page.profile.episodes.season_grid.as_ref()?;
    let wanted = page.profile.episodes.season;
    let player = page
        .select_first(&grid.player)
        .and_then(|el| el.value().attr("src").map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())?;
    let player = absolute_url(&player, page.base());

    let season_id = page.select_all(&grid.season_item).into_iter().find_map(|el| {
        let n: u32 = SEASON_TEXT.captures(&text_of(&el))?[1].parse().ok()?;
        (n == wanted).then(|| el.value().attr("data-id").map(str::to_string)).flatten()
    })?;

    let mut out = Vec::new();
    for item in page.select_all(&grid.episode_item) {
        if item.value().attr("data-s-id") != Some(season_id.as_str()) { continue; }
        let Some(index) = item.value().attr("data-number").and_then(|n| n.trim().parse::<u32>().ok()) else { continue };
        if index == 0 { continue; }
        let name = descendant(&item, ".episode-name, .name")
            .map(|el| clean_title(&text_of(&el)))
            .filter(|s| !s.is_empty());
        out.push(EpisodeRef {
            target_url: format!("{}/{wanted}/{index}", player.trim_end_matches('/')),
            index,
            season: wanted,
            title: Some(name.unwrap_or_else(|| format!("Season {wanted} Episode {index}"))),
        });
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteProfile;

    fn episodes(html: &str, profile: &SiteProfile) -> Vec<EpisodeRef> {
        let page = Page::parse(html, profile, None);
        from_html(&page)
    }

    #[test]
    fn sorted_by_url_index() {
        let profile = SiteProfile::willow();
        let html = r#"<div>
            <a href="/series/7-dark/1/3">Three</a>
            <a href="/series/7-dark/1/1">One</a>
            <a href="/series/7-dark/1/2">Two</a>
        </div>"#;
        let eps = episodes(html, &profile);
        let idx: Vec<u32> = eps.iter().map(|e| e.index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
        assert_eq!(eps[0].target_url, "https://willow.arlen.icu/series/7-dark/1/1");
        assert_eq!(eps[0].title.as_deref(), Some("One"));
    }

    #[test]
    fn index_from_text_then_position() {
        let profile = SiteProfile::willow();
        let html = r#"<ul class="episode-list">
            <li><a href="/watch/a">Episode 4</a></li>
            <li><a href="/watch/b">Ep. 2</a></li>
            <li><a href="/watch/c">Finale</a></li>
            <li><a href="/watch/d"> 9 </a></li>
        </ul>"#;
        let eps = episodes(html, &profile);
        let idx: Vec<u32> = eps.iter().map(|e| e.index).collect();
        // "Finale" is third in the matched set
        assert_eq!(idx, vec![2, 3, 4, 9]);
        assert_eq!(eps[1].title.as_deref(), Some("Finale"));
    }

    #[test]
    fn duplicate_indices_keep_first() {
        let profile = SiteProfile::willow();
        let html = r#"<a href="/episodes/x">Episode 1</a><a href="/episodes/y">Episode 1</a>"#;
        let eps = episodes(html, &profile);
        assert_eq!(eps.len(), 1);
        assert_eq!(eps[0].target_url, "https://willow.arlen.icu/episodes/x");
    }

    #[test]
    fn first_matching_selector_wins() {
        let profile = SiteProfile::willow();
        let html = r#"<a href="/episodes/only">Episode 5</a>
            <div class="episode"><a href="/elsewhere">Episode 1</a></div>"#;
        let eps = episodes(html, &profile);
        assert_eq!(eps.len(), 1);
        assert_eq!(eps[0].index, 5);
    }

    #[test]
    fn season_grid_builds_player_urls() {
        let profile = SiteProfile::flixer();
        let html = r#"<html><body>
            <iframe id="iframe-embed" src="https://vidsrc.test/embed/tv/tt123"></iframe>
            <div class="ss-item" data-id="55"> Season 1 </div>
            <div class="ss-item" data-id="56"> Season 2 </div>
            <div class="eps-item active" data-s-id="55" data-number="2"></div>
            <div class="eps-item" data-s-id="55" data-number="1"></div>
            <div class="eps-item" data-s-id="56" data-number="1"></div>
        </body></html>"#;
        let eps = episodes(html, &profile);
        assert_eq!(eps.len(), 2);
        assert_eq!(eps[0].target_url, "https://vidsrc.test/embed/tv/tt123/1/1");
        assert_eq!(eps[0].title.as_deref(), Some("Season 1 Episode 1"));
        assert_eq!(eps[1].index, 2);
    }

    #[test]
    fn no_links_no_episodes() {
        let profile = SiteProfile::willow();
        assert!(episodes("<p>nothing</p>", &profile).is_empty());
    }

    #[test]
    fn parse_index_variants() {
        assert_eq!(parse_index("/series/1-x/2/14", "Episode 3"), Some((Some(2), 14)));
        assert_eq!(parse_index("/x", "EP 7"), Some((None, 7)));
        assert_eq!(parse_index("/x", "12"), Some((None, 12)));
        assert_eq!(parse_index("/x", "Trailer"), None);
    }

    #[test]
    fn numbered_episode_beats_positional_guess() {
        let profile = SiteProfile::willow();
        let html = r#"<ul class="episode-list">
            <li><a href="/watch/e1">Episode 1</a></li>
            <li><a href="/watch/bonus">Bonus</a></li>
            <li><a href="/watch/e2">Episode 2</a></li>
        </ul>"#;
        let eps = episodes(html, &profile);
        let got: Vec<(u32, &str)> = eps.iter().map(|e| (e.index, e.target_url.as_str())).collect();
        assert_eq!(got, vec![
            (1, "https://willow.arlen.icu/watch/e1"),
            (2, "https://willow.arlen.icu/watch/e2"),
        ]);
    }

    #[test]
    fn season_comes_from_series_path() {
        let profile = SiteProfile::willow();
        let html = r#"<div class="episode"><a href="/series/7-dark/2/3">Three</a></div>"#;
        let eps = episodes(html, &profile);
        assert_eq!(eps.len(), 1);
        assert_eq!((eps[0].season, eps[0].index), (2, 3));
    }
}

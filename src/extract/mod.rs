//! Document-level extraction: turns a fetched HTML or JSON body into records.
//!
//! Every entry point is total. Strategies that cannot run (bad selector, bad
//! JSON) simply miss, and a document nothing matches yields an empty result.

use crate::extract::page::Page;
use crate::site::SiteProfile;

pub mod cascade;
pub mod details;
pub mod episodes;
pub mod normalize;
pub mod page;
pub mod search;
pub mod stream;
pub mod types;

pub use types::{DetailRecord, EpisodeRef, MediaKind, SearchHit, StreamKind, StreamSource};

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Clone, Debug)]
pub struct Extractor {
    profile: SiteProfile,
    image_base: String,
}

impl Extractor {
    pub fn new(profile: SiteProfile) -> Self {
        Extractor { profile, image_base: DEFAULT_IMAGE_BASE.to_string() }
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    pub fn profile(&self) -> &SiteProfile { &self.profile }

    /// Search hits from a metadata-API JSON response or a results page.
    pub fn search(&self, document: &str, kind: Option<MediaKind>) -> Vec<SearchHit> {
        if document.trim().is_empty() {
            return Vec::new();
        }
        let hits = if search::looks_like_json(document) {
            search::from_json(document, &self.profile, &self.image_base, kind)
        } else {
            let page = Page::parse(document, &self.profile, kind);
            search::from_html(&page)
        };
        let hits = search::dedupe(hits);
        tracing::debug!(site = %self.profile.name, hits = hits.len(), "search extracted");
        hits
    }

    /// Absolute URL of the first detail-page link, for hopping from a results page.
    pub fn first_content_link(&self, document: &str) -> Option<String> {
        let page = Page::parse(document, &self.profile, None);
        search::first_content_link(&page)
    }

    pub fn details(&self, document: &str) -> DetailRecord {
        let page = Page::parse(document, &self.profile, None);
        details::from_html(&page)
    }

    pub fn episodes(&self, document: &str) -> Vec<EpisodeRef> {
        if document.trim().is_empty() {
            return Vec::new();
        }
        let page = Page::parse(document, &self.profile, Some(MediaKind::Series));
        let eps = episodes::from_html(&page);
        tracing::debug!(site = %self.profile.name, episodes = eps.len(), "episodes extracted");
        eps
    }

    /// First playable source, or `None` when nothing on the page looks playable.
    pub fn stream(&self, document: &str) -> Option<StreamSource> {
        if document.trim().is_empty() {
            return None;
        }
        let page = Page::parse(document, &self.profile, None);
        stream::from_html(&page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::types::NO_DESCRIPTION;

    #[test]
    fn search_json_end_to_end() {
        let prefix = "https://img.test/t/p/w342";
        let ex = Extractor::new(SiteProfile::flixer()).with_image_base(prefix);
        let doc = r#"{"results":[{"id":1,"media_type":"movie","title":"X","release_date":"2020-05-01","poster_path":"/p.jpg"}]}"#;
        let hits = ex.search(doc, Some(MediaKind::Movie));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "X");
        assert_eq!(hits[0].year.as_deref(), Some("2020"));
        assert_eq!(hits[0].image_url, format!("{prefix}/p.jpg"));
    }

    #[test]
    fn search_dedupes_title_case() {
        let ex = Extractor::new(SiteProfile::willow());
        let html = r#"<a href="/movies/1-alien"><h3>Alien</h3></a><a href="/movies/1-alien"><h3>ALIEN</h3></a>"#;
        let hits = ex.search(html, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Alien");
    }

    #[test]
    fn blank_documents_are_empty() {
        let ex = Extractor::new(SiteProfile::willow());
        assert!(ex.search("   ", None).is_empty());
        assert!(ex.episodes("").is_empty());
        assert!(ex.stream("").is_none());
        assert_eq!(ex.details("").synopsis, NO_DESCRIPTION);
    }

    #[test]
    fn episodes_any_permutation_sorted() {
        let ex = Extractor::new(SiteProfile::willow());
        for order in [[1, 2, 3], [1, 3, 2], [2, 1, 3], [2, 3, 1], [3, 1, 2], [3, 2, 1]] {
            let html: String = order
                .iter()
                .map(|n| format!(r#"<a href="/episodes/{n}">Episode {n}</a>"#))
                .collect();
            let idx: Vec<u32> = ex.episodes(&html).iter().map(|e| e.index).collect();
            assert_eq!(idx, vec![1, 2, 3]);
        }
    }
}

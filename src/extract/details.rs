use std::sync::LazyLock;

use regex::Regex;

use crate::extract::normalize::{clean_title, collapse_whitespace};
use crate::extract::page::{text_of, Page};
use crate::extract::types::DetailRecord;

static RELEASE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("release year regex should compile"));

pub fn from_html(page: &Page<'_>) -> DetailRecord {
    let sel = &page.profile.details;
    DetailRecord::from_parts(
        first_text(page, &sel.description).map(|s| collapse_whitespace(&s)),
        first_text(page, &sel.alternate_title).map(|s| clean_title(&s)),
        release_year(page, &sel.release),
    )
}

/// First candidate yielding non-empty trimmed text; `meta` elements read `content`.
fn first_text(page: &Page<'_>, candidates: &[String]) -> Option<String> {
    candidates.iter().find_map(|c| {
        let el = page.select_first(c)?;
        let text = if el.value().name() == "meta" {
            el.value().attr("content").unwrap_or_default().trim().to_string()
        } else {
            text_of(&el)
        };
        (!text.is_empty()).then_some(text)
    })
}

fn release_year(page: &Page<'_>, candidates: &[String]) -> Option<String> {
    for c in candidates {
        let Some(el) = page.select_first(c) else { continue };
        let found = find_year(&text_of(&el))
            .or_else(|| el.value().attr("datetime").and_then(find_year));
        if found.is_some() { return found; }
    }
    page.select_first("title").and_then(|t| find_year(&text_of(&t)))
}

fn find_year(text: &str) -> Option<String> {
    RELEASE_YEAR.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::types::{NO_ALTERNATE_TITLE, NO_DESCRIPTION, UNKNOWN_RELEASE};
    use crate::site::SiteProfile;

    fn details(html: &str) -> DetailRecord {
        let profile = SiteProfile::willow();
        let page = Page::parse(html, &profile, None);
        from_html(&page)
    }

    #[test]
    fn reads_fields_in_candidate_order() {
        let rec = details(r#"<html><head><meta name="description" content="Meta text"></head><body>
            <h1>Blade  Runner</h1>
            <div class="synopsis">  A blade
               runner hunts replicants. </div>
            <span class="date">Released June 25, 1982</span>
        </body></html>"#);
        assert_eq!(rec.synopsis, "A blade runner hunts replicants.");
        assert_eq!(rec.alternate_title, "Blade Runner");
        assert_eq!(rec.release_info, "1982");
    }

    #[test]
    fn meta_description_when_no_block() {
        let rec = details(r#"<html><head><meta property="og:description" content=" From og "></head><body></body></html>"#);
        assert_eq!(rec.synopsis, "From og");
    }

    #[test]
    fn empty_candidates_are_skipped() {
        let rec = details(r#"<div class="description">   </div><div class="overview">Second</div>"#);
        assert_eq!(rec.synopsis, "Second");
    }

    #[test]
    fn sentinels_when_nothing_matches() {
        let rec = details("<html><body><p>nothing here</p></body></html>");
        assert_eq!(rec.synopsis, NO_DESCRIPTION);
        assert_eq!(rec.alternate_title, NO_ALTERNATE_TITLE);
        assert_eq!(rec.release_info, UNKNOWN_RELEASE);
    }

    #[test]
    fn year_from_datetime_attribute() {
        let rec = details(r#"<time datetime="2004-09-22">air date</time>"#);
        assert_eq!(rec.release_info, "2004");
    }

    #[test]
    fn year_outside_range_is_ignored_then_title_fallback() {
        let rec = details(r#"<html><head><title>Lost (2004) - Willow</title></head><body><span class="year">1850</span></body></html>"#);
        assert_eq!(rec.release_info, "2004");
    }
}

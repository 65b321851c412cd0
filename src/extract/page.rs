use scraper::{ElementRef, Html, Node, Selector};

use crate::extract::normalize::collapse_whitespace;
use crate::extract::types::MediaKind;
use crate::site::SiteProfile;

const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "title"];
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "tr", "td", "th", "table", "section", "article",
    "header", "footer", "nav", "main", "aside", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// A parsed document plus what the strategies need to interpret it.
pub struct Page<'a> {
    pub doc: Html,
    pub raw: &'a str,
    pub profile: &'a SiteProfile,
    pub kind: Option<MediaKind>,
}

impl<'a> Page<'a> {
    pub fn parse(raw: &'a str, profile: &'a SiteProfile, kind: Option<MediaKind>) -> Self {
        Page { doc: Html::parse_document(raw), raw, profile, kind }
    }

    pub fn base(&self) -> &str { &self.profile.base_url }

    /// All elements matching `selector`; an invalid selector matches nothing.
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(sel) => self.doc.select(&sel).collect(),
            Err(_) => {
                tracing::debug!(selector, "invalid selector skipped");
                Vec::new()
            }
        }
    }

    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.doc.select(&sel).next()
    }

    /// Visible document text split on newlines; inline markup stays within its line
    /// and block elements start a new one.
    pub fn visible_text_lines(&self) -> Vec<String> {
        let mut text = String::new();
        for node in self.doc.root_element().descendants() {
            match node.value() {
                Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => text.push('\n'),
                Node::Text(t) => {
                    let hidden = node
                        .parent()
                        .and_then(ElementRef::wrap)
                        .is_some_and(|p| HIDDEN_TAGS.contains(&p.value().name()));
                    if hidden { continue; }
                    let after_block = node
                        .prev_sibling()
                        .and_then(ElementRef::wrap)
                        .is_some_and(|el| BLOCK_TAGS.contains(&el.value().name()));
                    if after_block { text.push('\n'); }
                    text.push_str(t);
                }
                _ => {}
            }
        }
        text.split('\n')
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

pub fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First descendant of `el` matching `selector`.
pub fn descendant<'b>(el: &ElementRef<'b>, selector: &str) -> Option<ElementRef<'b>> {
    let sel = Selector::parse(selector).ok()?;
    el.select(&sel).next()
}

pub fn parent_element<'b>(el: &ElementRef<'b>) -> Option<ElementRef<'b>> {
    el.parent().and_then(ElementRef::wrap)
}

/// First non-empty attribute among `attrs`, in order.
pub fn first_attr(el: &ElementRef<'_>, attrs: &[String]) -> Option<String> {
    attrs
        .iter()
        .filter_map(|a| el.value().attr(a))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_text_skips_scripts() {
        let profile = SiteProfile::willow();
        let html = "<html><head><title>T</title><script>var x = 'Hidden Line';</script></head>\
                    <body><p>First Line</p><div>Second\nThird</div></body></html>";
        let page = Page::parse(html, &profile, None);
        assert_eq!(page.visible_text_lines(), vec!["First Line", "Second", "Third"]);
    }

    #[test]
    fn inline_markup_stays_on_one_line() {
        let profile = SiteProfile::willow();
        let page = Page::parse("<p>The <b>Dark</b> Knight</p><div><p>Heat</p>1995</div>", &profile, None);
        assert_eq!(page.visible_text_lines(), vec!["The Dark Knight", "Heat", "1995"]);
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let profile = SiteProfile::willow();
        let page = Page::parse("<p>x</p>", &profile, None);
        assert!(page.select_all("p:contains(x)").is_empty());
        assert!(page.select_first("[[").is_none());
    }

    #[test]
    fn first_attr_prefers_order() {
        let profile = SiteProfile::willow();
        let page = Page::parse(r#"<img src="eager.jpg" data-src="lazy.jpg">"#, &profile, None);
        let img = page.select_first("img").unwrap();
        let attrs = vec!["data-src".to_string(), "src".to_string()];
        assert_eq!(first_attr(&img, &attrs).as_deref(), Some("lazy.jpg"));
    }
}

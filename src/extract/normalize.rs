use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("numeric entity regex should compile"));
static SLUG_DROP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("slug filter regex should compile"));
static SLUG_SEP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]+").expect("slug separator regex should compile"));
static LEADING_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+-").expect("leading id regex should compile"));

/// Decodes the handful of entities sites leave in titles, repairs the
/// mis-decoded dash and collapses whitespace.
pub fn clean_title(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let s = raw.replace("â€“", "-").replace("â€”", "-");
    let s = NUMERIC_ENTITY.replace_all(&s, |caps: &regex::Captures| {
        let body = &caps[1];
        let code = match body.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => body.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32).map(String::from).unwrap_or_default()
    });
    // &amp; last so "&amp;lt;" stays "&lt;"
    let s = s
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    collapse_whitespace(&s)
}

/// Resolves `url` against `base` the way the scraped sites link things:
/// absolute stays, protocol-relative gets https, everything else hangs off base.
pub fn absolute_url(url: &str, base: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return url.to_string();
    }
    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{rest}");
    }
    let base = base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// Human-readable title from the path segment after `marker`,
/// e.g. `/movies/42-the-thing` -> `the thing`.
pub fn title_from_path(href: &str, marker: &str) -> Option<String> {
    let lower = href.to_ascii_lowercase();
    let start = lower.find(&marker.to_ascii_lowercase())? + marker.len();
    let segment = href[start..]
        .split(['/', '?', '#'])
        .find(|s| !s.is_empty())?;
    let segment = LEADING_ID.replace(segment, "");
    let title = collapse_whitespace(&segment.replace(['-', '_', '+'], " "));
    if title.is_empty() || title.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(title)
    }
}

pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = SLUG_DROP.replace_all(&lower, "");
    let slug = SLUG_SEP.replace_all(kept.trim(), "-");
    slug.trim_matches('-').to_string()
}

pub fn collapse_whitespace(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                if !buf.is_empty() { buf.push(' '); }
                in_ws = true;
            }
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    buf.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.test";

    #[test]
    fn absolute_url_forms() {
        assert_eq!(absolute_url("//x.com/a", BASE), "https://x.com/a");
        assert_eq!(absolute_url("/a", BASE), "https://example.test/a");
        assert_eq!(absolute_url("a", BASE), "https://example.test/a");
        assert_eq!(absolute_url("http://x.com/a", BASE), "http://x.com/a");
    }

    #[test]
    fn absolute_url_trailing_slash_base_and_empty() {
        assert_eq!(absolute_url("/a", "https://example.test/"), "https://example.test/a");
        assert_eq!(absolute_url("   ", BASE), "");
    }

    #[test]
    fn clean_title_decodes_entities() {
        assert_eq!(clean_title("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(clean_title("  &quot;Heat&quot;  "), "\"Heat\"");
        assert_eq!(clean_title("Ocean&#39;s Eleven"), "Ocean's Eleven");
        assert_eq!(clean_title("A â€“ B"), "A - B");
        assert_eq!(clean_title("&amp;lt;tag&amp;gt;"), "&lt;tag&gt;");
    }

    #[test]
    fn title_from_path_strips_id() {
        assert_eq!(title_from_path("/movies/42-the-thing", "/movies/").as_deref(), Some("the thing"));
        assert_eq!(title_from_path("https://x.test/series/7-dark/1/2", "/series/").as_deref(), Some("dark"));
        assert_eq!(title_from_path("/movies/123", "/movies/"), None);
        assert_eq!(title_from_path("/other/abc", "/movies/"), None);
    }

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("The Lord of the Rings: The Two Towers"), "the-lord-of-the-rings-the-two-towers");
        assert_eq!(slugify("Spider-Man -- Far  From Home!"), "spider-man-far-from-home");
    }

    #[test]
    fn collapse_ws() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}

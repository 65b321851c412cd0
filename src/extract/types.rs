use serde::{Deserialize, Serialize};

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_ALTERNATE_TITLE: &str = "N/A";
pub const UNKNOWN_RELEASE: &str = "Unknown";
pub const DEFAULT_PLAYER_LABEL: &str = "Default Player";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Discriminator used by the metadata API (`movie` / `tv`).
    pub fn as_api_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub image_url: String,
    pub target_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub media_kind: MediaKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailRecord {
    pub synopsis: String,
    pub alternate_title: String,
    pub release_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
}

impl DetailRecord {
    /// Builds a record from optional fields, substituting the sentinels.
    pub fn from_parts(
        synopsis: Option<String>,
        alternate_title: Option<String>,
        release_info: Option<String>,
    ) -> Self {
        fn or_sentinel(v: Option<String>, sentinel: &str) -> String {
            match v {
                Some(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => sentinel.to_string(),
            }
        }
        DetailRecord {
            synopsis: or_sentinel(synopsis, NO_DESCRIPTION),
            alternate_title: or_sentinel(alternate_title, NO_ALTERNATE_TITLE),
            release_info: or_sentinel(release_info, UNKNOWN_RELEASE),
            rating: None,
            genres: Vec::new(),
            runtime_minutes: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpisodeRef {
    pub target_url: String,
    pub index: u32,
    pub season: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Iframe,
    Direct,
    Episode,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreamSource {
    pub target_url: String,
    pub kind: StreamKind,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_record_fills_sentinels() {
        let rec = DetailRecord::from_parts(None, Some("   ".into()), Some(" 2001 ".into()));
        assert_eq!(rec.synopsis, NO_DESCRIPTION);
        assert_eq!(rec.alternate_title, NO_ALTERNATE_TITLE);
        assert_eq!(rec.release_info, "2001");
    }

    #[test]
    fn media_kind_api_names() {
        assert_eq!(MediaKind::Series.as_api_str(), "tv");
        assert_eq!(MediaKind::from_api_str("movie"), Some(MediaKind::Movie));
        assert_eq!(MediaKind::from_api_str("person"), None);
    }
}

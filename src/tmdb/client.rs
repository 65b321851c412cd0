use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ScraperConfig;
use crate::extract::search::year_from_date;
use crate::extract::types::{DetailRecord, MediaKind};
use crate::fetch::{FetchError, FetchRequest, Fetcher};

use super::types::{Details, Season};

#[derive(Clone, Debug)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: String,
}

impl From<&ScraperConfig> for TmdbConfig {
    fn from(cfg: &ScraperConfig) -> Self {
        TmdbConfig {
            api_key: cfg.tmdb_api_key.clone(),
            base_url: cfg.tmdb_base_url.clone(),
            language: cfg.language.clone(),
        }
    }
}

/// Read-only metadata API client over the injected fetcher.
#[derive(Clone)]
pub struct TmdbClient {
    fetcher: Arc<dyn Fetcher>,
    cfg: TmdbConfig,
}

impl TmdbClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, cfg: TmdbConfig) -> Self {
        Self { fetcher, cfg }
    }

    fn api_key(&self) -> Result<&str, TmdbError> {
        self.cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TmdbError::MissingApiKey)
    }

    fn endpoint(&self, path: &str, extra: &[(&str, &str)]) -> Result<String, TmdbError> {
        let key = self.api_key()?;
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("api_key", key);
        query.append_pair("language", &self.cfg.language);
        for (k, v) in extra {
            query.append_pair(k, v);
        }
        Ok(format!("{}/{}?{}", self.cfg.base_url.trim_end_matches('/'), path, query.finish()))
    }

    async fn get_text(&self, url: String) -> Result<String, TmdbError> {
        let resp = self.fetcher.fetch(FetchRequest::get(url)).await.map_err(TmdbError::Fetch)?;
        if !resp.ok() {
            return Err(TmdbError::Status(resp.status));
        }
        Ok(resp.text())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, TmdbError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(TmdbError::Decode)
    }

    /// Raw `search/multi` body; the extractor owns the mapping.
    pub async fn search_multi(&self, query: &str) -> Result<String, TmdbError> {
        let url = self.endpoint("search/multi", &[("query", query.trim())])?;
        self.get_text(url).await
    }

    pub async fn details(&self, kind: MediaKind, id: u64) -> Result<Details, TmdbError> {
        let url = self.endpoint(&format!("{}/{id}", kind.as_api_str()), &[])?;
        self.get_json(url).await
    }

    pub async fn season(&self, series_id: u64, season: u32) -> Result<Season, TmdbError> {
        let url = self.endpoint(&format!("tv/{series_id}/season/{season}"), &[])?;
        self.get_json(url).await
    }
}

pub fn detail_record(d: &Details) -> DetailRecord {
    let alternate = d.original_title.clone().or_else(|| d.original_name.clone());
    let release = d.release_date.as_deref().or(d.first_air_date.as_deref()).and_then(year_from_date);
    let mut rec = DetailRecord::from_parts(d.overview.clone(), alternate, release);
    rec.rating = d.vote_average;
    rec.genres = d.genres.iter().map(|g| g.name.clone()).collect();
    rec.runtime_minutes = d.runtime.or_else(|| d.episode_run_time.first().copied()).filter(|m| *m > 0);
    rec
}

#[derive(Debug)]
pub enum TmdbError {
    MissingApiKey,
    Fetch(FetchError),
    Status(u16),
    Decode(serde_json::Error),
}

impl std::fmt::Display for TmdbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TmdbError::MissingApiKey => write!(f, "TMDB_API_KEY is not set"),
            TmdbError::Fetch(err) => write!(f, "fetch failed: {err}"),
            TmdbError::Status(status) => write!(f, "api returned status {status}"),
            TmdbError::Decode(err) => write!(f, "decode error: {err}"),
        }
    }
}

impl std::error::Error for TmdbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TmdbError::Fetch(err) => Some(err),
            TmdbError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::extract::types::{NO_ALTERNATE_TITLE, UNKNOWN_RELEASE};

    fn client(mock: Arc<MockFetcher>, key: Option<&str>) -> TmdbClient {
        TmdbClient::new(mock, TmdbConfig {
            api_key: key.map(str::to_string),
            base_url: "https://api.tmdb.test/3/".into(),
            language: "en-US".into(),
        })
    }

    #[tokio::test]
    async fn search_builds_encoded_url() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_ok(r#"{"results":[]}"#);
        let body = client(mock.clone(), Some("k")).search_multi(" the thing ").await.unwrap();
        assert_eq!(body, r#"{"results":[]}"#);
        assert_eq!(
            mock.urls(),
            vec!["https://api.tmdb.test/3/search/multi?api_key=k&language=en-US&query=the+thing"]
        );
    }

    #[tokio::test]
    async fn missing_key_never_fetches() {
        let mock = Arc::new(MockFetcher::new());
        let err = client(mock.clone(), None).details(MediaKind::Movie, 1).await.unwrap_err();
        assert!(matches!(err, TmdbError::MissingApiKey));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_status(401);
        let err = client(mock, Some("k")).season(5, 1).await.unwrap_err();
        assert_eq!(format!("{err}"), "api returned status 401");
    }

    #[tokio::test]
    async fn details_map_to_record() {
        let mock = Arc::new(MockFetcher::new());
        mock.push_ok(r#"{"id": 603, "title": "The Matrix", "original_title": "The Matrix",
            "overview": "A hacker learns the truth.", "release_date": "1999-03-30",
            "vote_average": 8.2, "genres": [{"id": 28, "name": "Action"}], "runtime": 136}"#);
        let d = client(mock.clone(), Some("k")).details(MediaKind::Movie, 603).await.unwrap();
        assert!(mock.urls()[0].starts_with("https://api.tmdb.test/3/movie/603?api_key=k"));
        let rec = detail_record(&d);
        assert_eq!(rec.synopsis, "A hacker learns the truth.");
        assert_eq!(rec.release_info, "1999");
        assert_eq!(rec.genres, vec!["Action"]);
        assert_eq!(rec.runtime_minutes, Some(136));
        assert_eq!(rec.rating, Some(8.2));
    }

    #[test]
    fn sparse_details_use_sentinels() {
        let d: Details = serde_json::from_str(r#"{"id": 1, "name": "Show", "episode_run_time": [42]}"#).unwrap();
        let rec = detail_record(&d);
        assert_eq!(rec.alternate_title, NO_ALTERNATE_TITLE);
        assert_eq!(rec.release_info, UNKNOWN_RELEASE);
        assert_eq!(rec.runtime_minutes, Some(42));
    }

    #[test]
    fn series_release_is_first_air_year() {
        let d: Details = serde_json::from_str(r#"{"id": 2, "name": "Dark", "first_air_date": "2017-12-01"}"#).unwrap();
        assert_eq!(detail_record(&d).release_info, "2017");
    }
}

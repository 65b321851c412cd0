use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;

mod mock;

pub use mock::MockFetcher;

#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        FetchRequest { method: Method::GET, url: url.into(), headers: Vec::new(), body: None }
    }

    pub fn with_headers(mut self, headers: &[(String, String)]) -> Self {
        self.headers.extend(headers.iter().cloned());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        FetchResponse { status, body: body.into() }
    }

    pub fn ok(&self) -> bool { (200..300).contains(&self.status) }

    pub fn text(&self) -> String { String::from_utf8_lossy(&self.body).into_owned() }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(FetchError::Decode)
    }

    /// Body text for 2xx responses, `Status` error otherwise.
    pub fn into_text(self) -> Result<String, FetchError> {
        if !self.ok() { return Err(FetchError::Status(self.status)); }
        Ok(self.text())
    }
}

/// The single network capability the scrapers depend on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

#[derive(Clone, Debug)]
pub struct HttpFetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Clone)]
pub struct HttpFetcher {
    http: HttpClient,
}

impl HttpFetcher {
    pub fn new(cfg: &HttpFetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&cfg.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .default_headers(headers)
            .build()
            .map_err(FetchError::http)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut builder = self.http.request(request.method.clone(), &request.url);
        for (k, v) in &request.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|_| FetchError::InvalidHeader(k.clone()))?;
            let value = HeaderValue::from_str(v).map_err(|_| FetchError::InvalidHeader(k.clone()))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await.map_err(FetchError::http)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(FetchError::http)?;
        tracing::debug!(url = %request.url, status, bytes = body.len(), "fetched");
        Ok(FetchResponse { status, body })
    }
}

#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Timeout,
    Status(u16),
    InvalidHeader(String),
    Decode(serde_json::Error),
    MockQueueEmpty,
}

impl FetchError {
    fn http(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(err)
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "http error: {err}"),
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Status(status) => write!(f, "unexpected status {status}"),
            FetchError::InvalidHeader(name) => write!(f, "invalid header {name}"),
            FetchError::Decode(err) => write!(f, "decode error: {err}"),
            FetchError::MockQueueEmpty => write!(f, "mock fetcher response queue is empty"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(err) => Some(err),
            FetchError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_status_gate() {
        assert!(FetchResponse::new(204, "").ok());
        assert!(!FetchResponse::new(404, "nope").ok());
        let err = FetchResponse::new(503, "down").into_text().unwrap_err();
        assert_eq!(format!("{err}"), "unexpected status 503");
        assert_eq!(FetchResponse::new(200, "hi").into_text().unwrap(), "hi");
    }

    #[test]
    fn json_decode_errors_surface() {
        let resp = FetchResponse::new(200, "{");
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn request_builder_keeps_headers() {
        let req = FetchRequest::get("https://x.test").with_headers(&[("Referer".into(), "https://y.test".into())]);
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.headers.len(), 1);
    }
}

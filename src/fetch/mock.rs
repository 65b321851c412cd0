use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchError, FetchRequest, FetchResponse, Fetcher};

/// Replays queued responses in order and records every request.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<VecDeque<Result<FetchResponse, FetchError>>>,
    calls: Mutex<Vec<FetchRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, resp: Result<FetchResponse, FetchError>) {
        if let Ok(mut q) = self.responses.lock() {
            q.push_back(resp);
        }
    }

    pub fn push_ok(&self, body: &str) {
        self.push_response(Ok(FetchResponse::new(200, body.to_string())));
    }

    pub fn push_status(&self, status: u16) {
        self.push_response(Ok(FetchResponse::new(status, String::new())));
    }

    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or(Err(FetchError::MockQueueEmpty))
    }
}

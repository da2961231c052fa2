//! In-memory [`JsonFetcher`] used by unit tests to script API answers.

use crate::http::client::{ApiRequest, JsonFetcher};
use crate::http::error::{HttpError, TransportErrorKind};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers requests from a queue, in order, and records every request seen.
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: Mutex<VecDeque<Result<Value, HttpError>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn fail(self, error: HttpError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn fail_timeout(self) -> Self {
        self.fail(timeout_error())
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl JsonFetcher for ScriptedFetcher {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, HttpError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for {}", request.url))
    }
}

/// What [`crate::RetryClient`] reports once every timeout retry is spent.
pub fn timeout_error() -> HttpError {
    HttpError::Transport {
        url: "http://scripted.test".to_string(),
        attempts: 18,
        kind: TransportErrorKind::Timeout,
        message: "operation timed out".to_string(),
    }
}

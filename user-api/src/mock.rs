//! Scripted [`Requester`] for testing code built on this crate.
//!
//! Responses are queued up front and handed out in order; every request is recorded together
//! with the credential it was sent with, so tests can assert on exact parameters as well as on
//! requests that must never have been made.

use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::requester::{ApiRequest, Requester};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// One request observed by a [`MockRequester`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: ApiRequest,
    pub credential: Credential,
}

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<Result<Value>>,
    calls: Vec<RecordedCall>,
}

/// A [`Requester`] that answers from a queue instead of the network.
///
/// Clones share the same queue and call log.
#[derive(Debug, Clone, Default)]
pub struct MockRequester {
    state: Arc<Mutex<State>>,
}

impl MockRequester {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // a panicking test thread must not hide the calls made before it
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queues the outcome of the next unanswered request.
    pub fn respond(&self, response: Result<Value>) {
        self.state().responses.push_back(response);
    }

    /// Every request received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Number of received requests whose URL ends with `suffix`.
    pub fn calls_to(&self, suffix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.request.url.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl Requester for MockRequester {
    async fn send(&self, request: ApiRequest, credential: &Credential) -> Result<Value> {
        tracing::debug!(method = %request.method, url = %request.url, "mock request");
        let mut state = self.state();
        let url = request.url.clone();
        state.calls.push(RecordedCall {
            request,
            credential: credential.clone(),
        });
        state.responses.pop_front().unwrap_or_else(|| {
            Err(Error::Network {
                url,
                source: "no response queued in MockRequester".into(),
            })
        })
    }
}

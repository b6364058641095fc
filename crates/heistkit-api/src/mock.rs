//! In-memory client handle for tests of the access layer and of its callers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::client::GraphqlClient;
use crate::error::ClientError;
use crate::operation::{GraphqlRequest, GraphqlResponse};

/// Records every request and answers from a queue of canned responses.
///
/// With an empty queue it answers `{"data": null}`: single-entity queries then
/// yield `None` and mutations an empty payload, so tests can focus on the
/// variables that were sent.
#[derive(Debug, Default)]
pub struct MockClient {
    requests: Mutex<Vec<GraphqlRequest>>,
    responses: Mutex<VecDeque<Result<GraphqlResponse, ClientError>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response whose `data` is `data`.
    pub fn push_data(&self, data: Value) {
        self.push_response(GraphqlResponse::from_data(data));
    }

    pub fn push_response(&self, response: GraphqlResponse) {
        lock(&self.responses).push_back(Ok(response));
    }

    pub fn push_error(&self, error: ClientError) {
        lock(&self.responses).push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<GraphqlRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Variables of the last request, `Value::Null` when nothing was sent.
    pub fn last_variables(&self) -> Value {
        self.last_request()
            .map(|r| r.variables)
            .unwrap_or(Value::Null)
    }
}

impl GraphqlClient for MockClient {
    fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ClientError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok(GraphqlResponse::from_data(Value::Null)))
    }
}

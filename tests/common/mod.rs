//! Shared test helpers and mock requester.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use supportdesk::error::{ClientError, Result};
use supportdesk::transport::{Method, Requester};
use supportdesk::Client;

/// One call seen by [`MockRequester`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// A mock requester that records calls and returns canned responses in order.
#[derive(Default)]
pub struct MockRequester {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<Vec<Result<Value>>>,
}

impl MockRequester {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful JSON response.
    pub fn queue_response(&self, value: Value) {
        self.responses.lock().unwrap().push(Ok(value));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls()
            .pop()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Requester for MockRequester {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(Value::Null);
        }
        responses.remove(0)
    }
}

/// Client for account 1 backed by `mock`.
pub fn client(mock: &Arc<MockRequester>) -> Client {
    Client::with_requester(mock.clone(), 1)
}

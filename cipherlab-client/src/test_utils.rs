// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for mocking the computation service.
//!
//! [`MockBackend`] records every request and answers with JSON values queued up front. It can also
//! hold back the next request to an endpoint until released, which allows tests to change the
//! session while a request is still in flight.
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use cipherlab_core::Endpoint;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::backend::Backend;

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// RSA key pair response with the given modulus.
pub fn rsa_key_pair(modulus: &str) -> Value {
    json!({
        "modulus": modulus,
        "e": "17",
        "d": "2753",
        "block_size_pub": "1",
        "block_size_priv": "2",
    })
}

/// Menezes-Vanstone key pair response with the given private scalar.
pub fn mv_key_pair(x: &str) -> Value {
    let curve = json!({"a": -25, "b": 0, "prime": "259421157018863391010844302469063884861"});
    json!({
        "public_key": {
            "curve": curve,
            "generator": {
                "x": "152198469913648308717544634828661961231",
                "y": "50296851635441247077790719368115682846",
            },
            "y": {
                "x": "26370934085012164485153092381593646122",
                "y": "126290671313284822425335475919650022666",
            },
        },
        "private_key": {
            "curve": curve,
            "x": x,
        },
    })
}

#[derive(Debug)]
enum MockResponse {
    Value(Value),
    Failure,
}

#[derive(Debug, Default)]
struct MockState {
    unavailable: bool,
    responses: HashMap<Endpoint, VecDeque<MockResponse>>,
    requests: Vec<(Endpoint, Value)>,
    held: HashMap<Endpoint, oneshot::Receiver<()>>,
}

#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next request to this endpoint.
    pub fn respond(&self, endpoint: Endpoint, value: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(endpoint)
            .or_default()
            .push_back(MockResponse::Value(value));
    }

    /// Queues a failure for the next request to this endpoint.
    pub fn fail(&self, endpoint: Endpoint) {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(endpoint)
            .or_default()
            .push_back(MockResponse::Failure);
    }

    pub fn set_available(&self, available: bool) {
        self.state.lock().unwrap().unavailable = !available;
    }

    /// Holds back the next request to this endpoint until the returned handle is released.
    pub fn hold(&self, endpoint: Endpoint) -> HeldRequest {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().held.insert(endpoint, rx);
        HeldRequest(tx)
    }

    /// All requests in the order they were received.
    pub fn requests(&self) -> Vec<(Endpoint, Value)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(to, _)| *to == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

pub struct HeldRequest(oneshot::Sender<()>);

impl HeldRequest {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

impl Backend for MockBackend {
    type Error = MockError;

    async fn health(&self) -> Result<(), MockError> {
        if self.state.lock().unwrap().unavailable {
            return Err(MockError::Unavailable);
        }
        Ok(())
    }

    async fn post<Req, Res>(&self, endpoint: Endpoint, body: &Req) -> Result<Res, MockError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned + Send,
    {
        let body = serde_json::to_value(body)?;

        let held = {
            let mut state = self.state.lock().unwrap();
            state.requests.push((endpoint, body));
            state.held.remove(&endpoint)
        };

        if let Some(rx) = held {
            let _ = rx.await;
        }

        let response = {
            let mut state = self.state.lock().unwrap();
            if state.unavailable {
                return Err(MockError::Unavailable);
            }
            state
                .responses
                .get_mut(&endpoint)
                .and_then(|queue| queue.pop_front())
        };

        match response {
            Some(MockResponse::Value(value)) => Ok(serde_json::from_value(value)?),
            Some(MockResponse::Failure) => Err(MockError::Failed(endpoint)),
            None => Err(MockError::NoResponse(endpoint)),
        }
    }
}

#[derive(Debug, Error)]
pub enum MockError {
    #[error("computation service unavailable")]
    Unavailable,

    #[error("no response queued for {0}")]
    NoResponse(Endpoint),

    #[error("request to {0} failed")]
    Failed(Endpoint),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

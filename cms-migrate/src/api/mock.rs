//! Scripted `ContentApi` used by the engine tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::client::ContentApi;
use super::error::ApiError;
use super::operations::{GraphqlOperation, OperationKind};

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: OperationKind,
    pub name: String,
    pub variables: Value,
}

type Handler = Box<dyn Fn(&GraphqlOperation, &Value) -> Result<Value, ApiError> + Send + Sync>;

/// Records every request and answers it with a handler keyed by operation kind
pub struct MockContentApi {
    calls: Mutex<Vec<RecordedCall>>,
    handlers: Vec<(OperationKind, Handler)>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    latency: Option<std::time::Duration>,
}

impl MockContentApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handlers: Vec::new(),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            latency: None,
        }
    }

    /// Answer `kind` requests with `handler`
    pub fn on<F>(mut self, kind: OperationKind, handler: F) -> Self
    where
        F: Fn(&GraphqlOperation, &Value) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
        self
    }

    /// Hold every request open for `latency` so overlapping calls can be observed
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: OperationKind) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentApi for MockContentApi {
    async fn request(
        &self,
        operation: &GraphqlOperation,
        variables: Value,
    ) -> Result<Value, ApiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        self.calls.lock().unwrap().push(RecordedCall {
            kind: operation.kind(),
            name: operation.name().to_string(),
            variables: variables.clone(),
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let result = match self.handlers.iter().find(|(kind, _)| *kind == operation.kind()) {
            Some((_, handler)) => handler(operation, &variables),
            None => Err(ApiError::transport(
                format!("no handler for {}", operation.name()),
                None,
            )),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

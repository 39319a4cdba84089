#![allow(dead_code)]

use async_trait::async_trait;
use connectors::http::{error::TransportError, transport::BatchTransport};
use engine_core::{notify::RecordingNotifier, session::ImportSession, submit::Submitter};
use model::schema::resource::{ImportSchema, Resource};
use serde_json::{Value as Json, json};
use std::{
    collections::VecDeque,
    io::Write,
    sync::{Arc, Mutex},
};
use tempfile::NamedTempFile;

pub mod utils;

/// A recorded POST.
#[derive(Debug, Clone)]
pub struct Call {
    pub path: String,
    pub body: Json,
}

/// In-memory backend. Answers from a queue of scripted responses, falling
/// back to `{}` once the queue runs dry, and keeps every call it receives.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<Json, TransportError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripted(responses: Vec<Result<Json, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// The usual `{ results: {...} }` envelope of a batch endpoint.
    pub fn batch_answer(success: u64, failed: u64, errors: Json) -> Result<Json, TransportError> {
        Ok(json!({
            "results": { "success": success, "failed": failed, "errors": errors }
        }))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl BatchTransport for FakeTransport {
    async fn post_json(&self, path: &str, body: &Json) -> Result<Json, TransportError> {
        self.calls.lock().expect("calls lock").push(Call {
            path: path.to_string(),
            body: body.clone(),
        });
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

/// A session for `resource` wired to a recording notifier.
pub fn open_session(resource: Resource) -> (ImportSession, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let session = ImportSession::new(ImportSchema::for_resource(resource), notifier.clone());
    (session, notifier)
}

pub fn submitter(transport: &Arc<FakeTransport>) -> Submitter {
    Submitter::new(transport.clone())
}

/// Writes `contents` to a temp file carrying `suffix` so format detection by
/// extension works.
pub fn temp_input(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

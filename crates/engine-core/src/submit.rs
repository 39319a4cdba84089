use crate::error::SubmitError;
use connectors::http::transport::BatchTransport;
use model::{
    execution::{
        batch_result::{BatchResult, RowError},
        strategy::SubmitStrategy,
    },
    records::batch::RecordBatch,
};
use serde_json::Value as Json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Sends a record batch to the backend with either strategy.
#[derive(Clone)]
pub struct Submitter {
    transport: Arc<dyn BatchTransport>,
}

impl Submitter {
    pub fn new(transport: Arc<dyn BatchTransport>) -> Self {
        Submitter { transport }
    }

    pub async fn submit(
        &self,
        batch: &RecordBatch,
        strategy: SubmitStrategy,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, SubmitError> {
        if batch.is_empty() {
            return Err(SubmitError::EmptyBatch);
        }

        info!(
            "Submitting batch {} ({} {} record(s), {strategy})",
            batch.id,
            batch.len(),
            batch.resource
        );

        match strategy {
            SubmitStrategy::Batch => self.submit_batch(batch, cancel).await,
            SubmitStrategy::Sequential => self.submit_sequential(batch, cancel).await,
        }
    }

    /// One call with every record; the server does the partitioning.
    async fn submit_batch(
        &self,
        batch: &RecordBatch,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, SubmitError> {
        let body = batch.to_body();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(SubmitError::Cancelled),
            response = self.transport.post_json(batch.resource.batch_path(), &body) => response?,
        };

        if let Some(message) = application_error(&response) {
            warn!("Batch {} rejected: {message}", batch.id);
            return Err(SubmitError::Rejected(message));
        }

        let result = BatchResult::from_response(&response, batch.resource.identifying_field())?;
        info!(
            "Batch {} done: success={}, failed={}",
            batch.id, result.success, result.failed
        );
        Ok(result)
    }

    /// One awaited call per record, in input order.
    ///
    /// Every iteration is isolated: an application or transport failure is
    /// recorded against its row and the loop moves on. Only cancellation
    /// stops it.
    async fn submit_sequential(
        &self,
        batch: &RecordBatch,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, SubmitError> {
        let path = batch.resource.single_path();
        let id_field = batch.resource.identifying_field();
        let mut result = BatchResult::default();

        for record in &batch.records {
            if cancel.is_cancelled() {
                return Err(SubmitError::Cancelled);
            }

            let key = record.get(id_field).map(|v| v.to_string());
            let row = record.index + 1;
            let body = record.to_json();

            let response = tokio::select! {
                _ = cancel.cancelled() => return Err(SubmitError::Cancelled),
                response = self.transport.post_json(path, &body) => response,
            };

            match response {
                Ok(response) => match application_error(&response) {
                    Some(message) => {
                        debug!("Row {row} rejected: {message}");
                        result.record_failure(RowError::application(key, message).at_row(row));
                    }
                    None => result.record_success(),
                },
                Err(err) => {
                    warn!("Row {row} not delivered: {err}");
                    result.record_failure(RowError::transport(key, err.to_string()).at_row(row));
                }
            }
        }

        info!(
            "Sequential submit of batch {} done: success={}, failed={}",
            batch.id, result.success, result.failed
        );
        Ok(result)
    }
}

/// Extracts `{ "error": ... }` from a response, if present and non-empty.
fn application_error(response: &Json) -> Option<String> {
    match response.get("error")? {
        Json::Null => None,
        Json::String(s) if s.trim().is_empty() => None,
        Json::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::http::error::TransportError;
    use model::{
        execution::batch_result::FailureKind, records::record::ValidatedRecord,
        schema::resource::Resource,
    };
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays scripted responses and records every call.
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<Json, TransportError>>>,
        calls: Mutex<Vec<(String, Json)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<Json, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Json)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchTransport for ScriptedTransport {
        async fn post_json(&self, path: &str, body: &Json) -> Result<Json, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    fn enrollment_batch(rolls: &[&str]) -> RecordBatch {
        let records = rolls
            .iter()
            .enumerate()
            .map(|(i, roll)| {
                ValidatedRecord::new(i)
                    .with("roll_number", *roll)
                    .with("course_code", "CS101")
                    .with("semester_id", 5)
            })
            .collect();
        RecordBatch::new(Resource::Enrollments, records)
    }

    #[tokio::test]
    async fn test_batch_strategy_single_call() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "results": { "success": 2, "failed": 0, "errors": [] }
        }))]);
        let submitter = Submitter::new(transport.clone());

        let result = submitter
            .submit(
                &enrollment_batch(&["A", "B"]),
                SubmitStrategy::Batch,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.success, 2);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/enrollment/bulk-enrollments");
        assert_eq!(calls[0].1["enrollments"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_strategy_top_level_error() {
        let transport = ScriptedTransport::new(vec![Ok(json!({ "error": "Unauthorized" }))]);
        let submitter = Submitter::new(transport);

        let err = submitter
            .submit(
                &enrollment_batch(&["A"]),
                SubmitStrategy::Batch,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(ref m) if m == "Unauthorized"));
    }

    #[tokio::test]
    async fn test_batch_strategy_transport_failure() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Status {
            status: 503,
            body: "unavailable".into(),
        })]);
        let submitter = Submitter::new(transport);

        let err = submitter
            .submit(
                &enrollment_batch(&["A"]),
                SubmitStrategy::Batch,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }

    #[tokio::test]
    async fn test_sequential_continues_past_failures_in_order() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "enrollment_id": 1 })),
            Ok(json!({ "error": "Already enrolled" })),
            Err(TransportError::Decode("eof".into())),
            Ok(json!({ "enrollment_id": 4 })),
        ]);
        let submitter = Submitter::new(transport.clone());

        let result = submitter
            .submit(
                &enrollment_batch(&["A", "B", "C", "D"]),
                SubmitStrategy::Sequential,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 2);
        assert_eq!(result.errors[0].key.as_deref(), Some("B"));
        assert_eq!(result.errors[0].row, Some(2));
        assert_eq!(result.errors[0].kind, FailureKind::Application);
        assert_eq!(result.errors[1].key.as_deref(), Some("C"));
        assert_eq!(result.errors[1].kind, FailureKind::Transport);

        let order = transport
            .calls()
            .iter()
            .map(|(path, body)| {
                assert_eq!(path, "/enrollment/enroll");
                body["roll_number"].as_str().unwrap().to_string()
            })
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_sequential_stops_when_cancelled() {
        let transport = ScriptedTransport::new(vec![]);
        let submitter = Submitter::new(transport.clone());
        let token = CancellationToken::new();
        token.cancel();

        let err = submitter
            .submit(&enrollment_batch(&["A", "B"]), SubmitStrategy::Sequential, &token)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Cancelled));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_never_calls_transport() {
        let transport = ScriptedTransport::new(vec![]);
        let submitter = Submitter::new(transport.clone());

        let err = submitter
            .submit(
                &RecordBatch::new(Resource::Grades, Vec::new()),
                SubmitStrategy::Batch,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::EmptyBatch));
        assert!(transport.calls().is_empty());
    }
}

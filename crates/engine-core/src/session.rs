use crate::{
    error::{SessionError, SubmitError},
    notify::Notifier,
    preview::{PreviewSlice, PreviewStore},
    report::{ReconciliationReport, Reporter},
    submit::Submitter,
    validate::Validator,
};
use connectors::file::{input::RawInput, parse_rows};
use model::{
    core::identifiers::SessionId,
    execution::{batch_result::BatchResult, rejected_row::RejectedRow, strategy::SubmitStrategy},
    records::batch::RecordBatch,
    schema::resource::ImportSchema,
};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Empty,
    Parsed,
    Previewing,
    Submitting,
    Reported,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Empty => "Empty",
            SessionState::Parsed => "Parsed",
            SessionState::Previewing => "Previewing",
            SessionState::Submitting => "Submitting",
            SessionState::Reported => "Reported",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts from one `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub parsed: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Records checked out of the preview for one submission.
#[derive(Debug)]
pub struct SubmitTicket {
    pub batch: RecordBatch,
    pub strategy: SubmitStrategy,
    pub token: CancellationToken,
}

/// Screen-scoped holder of parsed records and the latest report.
///
/// Lifecycle: `Empty -> Parsed -> Previewing -> Submitting -> Reported`, with
/// `Reported -> Parsed` on re-import and `Previewing -> Empty` on cancel.
/// Closing the session cancels its token; a result that arrives afterwards
/// is dropped.
pub struct ImportSession {
    id: SessionId,
    schema: ImportSchema,
    notifier: Arc<dyn Notifier>,
    state: SessionState,
    store: PreviewStore,
    rejected: Vec<RejectedRow>,
    report: Option<ReconciliationReport>,
    token: CancellationToken,
}

impl ImportSession {
    pub fn new(schema: ImportSchema, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_token(schema, notifier, CancellationToken::new())
    }

    /// Ties the session's lifetime to `token`; pass a child of a wider
    /// shutdown token so that cancelling the parent closes the session.
    pub fn with_token(
        schema: ImportSchema,
        notifier: Arc<dyn Notifier>,
        token: CancellationToken,
    ) -> Self {
        let id = SessionId::generate();
        debug!("Opened import session {id} for '{}'", schema.resource);
        ImportSession {
            id,
            schema,
            notifier,
            state: SessionState::Empty,
            store: PreviewStore::new(),
            rejected: Vec::new(),
            report: None,
            token,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn schema(&self) -> &ImportSchema {
        &self.schema
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn report(&self) -> Option<&ReconciliationReport> {
        self.report.as_ref()
    }

    /// Handle for tearing the session down from outside, e.g. a signal
    /// handler.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Parses and validates `input`, replacing whatever the session held.
    ///
    /// A parse error is notified, leaves the session `Empty`, and nothing
    /// reaches the preview.
    pub fn load(&mut self, input: &RawInput) -> Result<LoadSummary, SessionError> {
        self.ensure_open()?;
        if self.state == SessionState::Submitting {
            return Err(SessionError::InFlight);
        }

        self.clear();
        let rows = match parse_rows(input, &self.schema) {
            Ok(rows) => rows,
            Err(err) => {
                self.notifier.error(&err.to_string());
                return Err(err.into());
            }
        };

        let validation = Validator::new(&self.schema).validate(&rows);
        let summary = LoadSummary {
            parsed: rows.len(),
            accepted: validation.records.len(),
            rejected: validation.rejected.len(),
        };
        if summary.rejected > 0 {
            warn!(
                "Session {}: {} of {} row(s) failed validation",
                self.id, summary.rejected, summary.parsed
            );
        }

        self.store.replace(validation.records);
        self.rejected = validation.rejected;
        self.state = SessionState::Parsed;
        info!(
            "Session {}: {} record(s) ready for preview",
            self.id, summary.accepted
        );
        Ok(summary)
    }

    pub fn preview(&mut self, limit: usize) -> Result<PreviewSlice<'_>, SessionError> {
        self.ensure_open()?;
        match self.state {
            SessionState::Parsed | SessionState::Previewing => {
                self.state = SessionState::Previewing;
                Ok(self.store.slice(limit))
            }
            state => Err(SessionError::InvalidState {
                action: "preview",
                state,
            }),
        }
    }

    /// Drops the pending records without submitting.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Parsed | SessionState::Previewing => {
                self.clear();
                Ok(())
            }
            state => Err(SessionError::InvalidState {
                action: "cancel",
                state,
            }),
        }
    }

    /// Back to `Empty`, as when the screen is reopened.
    ///
    /// Refused while a submission is out, so its outcome cannot land on a
    /// fresh import.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Submitting {
            return Err(SessionError::InFlight);
        }
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.store.clear();
        self.rejected.clear();
        self.report = None;
        self.state = SessionState::Empty;
    }

    /// Checks the preview out for submission.
    ///
    /// An empty preview is refused before any request is made. While a
    /// ticket is out, further submissions are refused.
    pub fn begin_submit(&mut self, strategy: SubmitStrategy) -> Result<SubmitTicket, SessionError> {
        self.ensure_open()?;
        match self.state {
            SessionState::Previewing => {}
            SessionState::Submitting => return Err(SessionError::InFlight),
            state => {
                return Err(SessionError::InvalidState {
                    action: "submit",
                    state,
                });
            }
        }

        if self.store.is_empty() {
            self.notifier.error(&SessionError::EmptyBatch.to_string());
            return Err(SessionError::EmptyBatch);
        }

        let batch = RecordBatch::new(self.schema.resource, self.store.take());
        self.state = SessionState::Submitting;
        Ok(SubmitTicket {
            batch,
            strategy,
            token: self.token.clone(),
        })
    }

    /// Applies the outcome of a submission.
    ///
    /// Returns `Ok(None)` when the session was closed in the meantime; the
    /// outcome is discarded and nobody is notified. On a terminal error the
    /// records go back to the preview so the user can resubmit by hand.
    pub fn finish(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<BatchResult, SubmitError>,
    ) -> Result<Option<&ReconciliationReport>, SessionError> {
        if self.is_closed() {
            debug!(
                "Session {} closed, dropping outcome of batch {}",
                self.id, ticket.batch.id
            );
            return Ok(None);
        }

        match outcome {
            Ok(result) => {
                let reporter = Reporter::new(self.schema.resource, ticket.strategy);
                let report = reporter.reconcile(&result, &ticket.batch.records);
                self.notifier.success(&report.summary());
                self.report = Some(report);
                self.state = SessionState::Reported;
                Ok(self.report.as_ref())
            }
            Err(err) => {
                self.notifier.error(&err.to_string());
                self.store.replace(ticket.batch.records);
                self.state = SessionState::Previewing;
                Err(err.into())
            }
        }
    }

    /// `begin_submit`, the network call, then `finish`.
    pub async fn submit(
        &mut self,
        submitter: &Submitter,
        strategy: SubmitStrategy,
    ) -> Result<&ReconciliationReport, SessionError> {
        let ticket = self.begin_submit(strategy)?;
        let outcome = submitter
            .submit(&ticket.batch, ticket.strategy, &ticket.token)
            .await;
        self.finish(ticket, outcome)?.ok_or(SessionError::Closed)
    }

    /// Tears the session down. Any in-flight submission is cancelled and its
    /// result ignored.
    pub fn close(&mut self) {
        self.token.cancel();
        self.store.clear();
        debug!("Closed import session {}", self.id);
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notice, RecordingNotifier};
    use connectors::file::input::InputFormat;
    use model::execution::batch_result::RowError;

    fn session(schema: ImportSchema) -> (ImportSession, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (ImportSession::new(schema, notifier.clone()), notifier)
    }

    fn grades_csv() -> RawInput {
        RawInput::new(
            InputFormat::Csv,
            "roll_number,course_code,semester_id,grade\nX1,C1,3,A\nX2,C1,3,B\n",
        )
    }

    #[test]
    fn test_load_then_preview_transitions() {
        let (mut session, _) = session(ImportSchema::grades());
        assert_eq!(session.state(), SessionState::Empty);

        let summary = session.load(&grades_csv()).unwrap();
        assert_eq!(summary.accepted, 2);
        assert_eq!(session.state(), SessionState::Parsed);

        let slice = session.preview(10).unwrap();
        assert_eq!(slice.total, 2);
        assert_eq!(session.state(), SessionState::Previewing);
    }

    #[test]
    fn test_parse_error_notifies_and_stays_empty() {
        let (mut session, notifier) = session(ImportSchema::grades());
        let err = session
            .load(&RawInput::new(InputFormat::Json, "[{"))
            .unwrap_err();

        assert!(matches!(err, SessionError::Parse(_)));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.is_empty());
        assert_eq!(notifier.errors().len(), 1);
    }

    #[test]
    fn test_cancel_returns_to_empty() {
        let (mut session, _) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();
        session.cancel().unwrap();

        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.is_empty());
    }

    #[test]
    fn test_submit_requires_preview() {
        let (mut session, _) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();

        let err = session.begin_submit(SubmitStrategy::Batch).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                state: SessionState::Parsed,
                ..
            }
        ));
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let (mut session, _) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();

        let ticket = session.begin_submit(SubmitStrategy::Batch).unwrap();
        assert_eq!(ticket.batch.len(), 2);
        assert!(matches!(
            session.begin_submit(SubmitStrategy::Batch),
            Err(SessionError::InFlight)
        ));
        assert!(matches!(
            session.load(&grades_csv()),
            Err(SessionError::InFlight)
        ));
    }

    #[test]
    fn test_reset_refused_while_in_flight() {
        let (mut session, _) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();
        let ticket = session.begin_submit(SubmitStrategy::Batch).unwrap();

        assert!(matches!(session.reset(), Err(SessionError::InFlight)));
        assert_eq!(session.state(), SessionState::Submitting);

        session
            .finish(ticket, Ok(BatchResult::default()))
            .unwrap();
        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.report().is_none());
    }

    #[test]
    fn test_finish_builds_report_and_notifies() {
        let (mut session, notifier) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();
        let ticket = session.begin_submit(SubmitStrategy::Batch).unwrap();

        let result = BatchResult {
            success: 1,
            failed: 1,
            errors: vec![RowError::application(Some("X2".into()), "not found")],
        };
        let report = session.finish(ticket, Ok(result)).unwrap().unwrap();
        assert_eq!(report.success(), 1);
        assert_eq!(session.state(), SessionState::Reported);
        assert!(matches!(notifier.notices()[0], Notice::Success(_)));
    }

    #[test]
    fn test_failed_submit_restores_preview() {
        let (mut session, notifier) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();
        let ticket = session.begin_submit(SubmitStrategy::Batch).unwrap();

        let err = session
            .finish(ticket, Err(SubmitError::Rejected("Course locked".into())))
            .unwrap_err();
        assert!(matches!(err, SessionError::Submit(_)));
        assert_eq!(session.state(), SessionState::Previewing);
        assert_eq!(session.len(), 2);
        assert_eq!(notifier.errors(), vec!["Rejected by server: Course locked"]);
    }

    #[test]
    fn test_outcome_after_close_is_dropped() {
        let (mut session, notifier) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();
        let ticket = session.begin_submit(SubmitStrategy::Batch).unwrap();

        session.close();
        let applied = session
            .finish(ticket, Ok(BatchResult::default()))
            .unwrap();

        assert!(applied.is_none());
        assert!(session.report().is_none());
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_parent_token_closes_session() {
        let parent = CancellationToken::new();
        let mut session = ImportSession::with_token(
            ImportSchema::grades(),
            Arc::new(RecordingNotifier::new()),
            parent.child_token(),
        );
        session.load(&grades_csv()).unwrap();

        parent.cancel();
        assert!(session.is_closed());
        assert!(matches!(session.preview(10), Err(SessionError::Closed)));
    }

    #[test]
    fn test_reimport_after_report_replaces_everything() {
        let (mut session, _) = session(ImportSchema::grades());
        session.load(&grades_csv()).unwrap();
        session.preview(10).unwrap();
        let ticket = session.begin_submit(SubmitStrategy::Batch).unwrap();
        session
            .finish(
                ticket,
                Ok(BatchResult {
                    success: 2,
                    failed: 0,
                    errors: Vec::new(),
                }),
            )
            .unwrap();

        let input = RawInput::new(
            InputFormat::Csv,
            "roll_number,course_code,semester_id,grade\nY9,C7,1,C\n",
        );
        session.load(&input).unwrap();

        assert_eq!(session.state(), SessionState::Parsed);
        assert!(session.report().is_none());
        assert_eq!(session.len(), 1);
    }
}

use chrono::{DateTime, Utc};
use model::{
    execution::{
        batch_result::{BatchResult, FailureKind, RowError},
        strategy::SubmitStrategy,
    },
    records::record::ValidatedRecord,
    schema::resource::Resource,
};
use serde::Serialize;
use tracing::warn;

/// One failed row, attributable to its input.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: String,
    pub error: String,
    pub kind: FailureKind,
}

impl ReportLine {
    pub fn render(&self) -> String {
        match self.kind {
            FailureKind::Application => format!("{}: {}", self.label, self.error),
            FailureKind::Transport => format!("{}: {} (network)", self.label, self.error),
        }
    }
}

/// Reported counts that do not add up to what was sent.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountMismatch {
    pub submitted: usize,
    pub reported: u64,
}

/// Outcome of one submission cycle. Read-only once built; the next cycle
/// produces a new report.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    resource: Resource,
    strategy: SubmitStrategy,
    submitted: usize,
    success: u64,
    failed: u64,
    lines: Vec<ReportLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count_mismatch: Option<CountMismatch>,
    generated_at: DateTime<Utc>,
}

impl ReconciliationReport {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn strategy(&self) -> SubmitStrategy {
        self.strategy
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn success(&self) -> u64 {
        self.success
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn count_mismatch(&self) -> Option<CountMismatch> {
        self.count_mismatch
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Human-readable lines: the two literal counts, an optional mismatch
    /// warning, then one line per failed row.
    pub fn render(&self) -> Vec<String> {
        let mut out = vec![
            format!("Success: {}", self.success),
            format!("Failed: {}", self.failed),
        ];
        if let Some(mismatch) = self.count_mismatch {
            out.push(format!(
                "Warning: server reported {} result(s) for {} submitted record(s)",
                mismatch.reported, mismatch.submitted
            ));
        }
        out.extend(self.lines.iter().map(ReportLine::render));
        out
    }

    /// One-line outcome for the notifier.
    pub fn summary(&self) -> String {
        format!(
            "{} import finished: {} succeeded, {} failed",
            self.resource, self.success, self.failed
        )
    }
}

/// Merges a `BatchResult` with what was submitted.
pub struct Reporter {
    resource: Resource,
    strategy: SubmitStrategy,
}

impl Reporter {
    pub fn new(resource: Resource, strategy: SubmitStrategy) -> Self {
        Reporter { resource, strategy }
    }

    /// Counts are copied from the result as-is. They are never recomputed
    /// from the error list, and a sum that differs from the number of
    /// `records` is only flagged.
    ///
    /// `records` are the submitted records in submission order; an error that
    /// only carries a row number is labelled with that record's identifier.
    pub fn reconcile(
        &self,
        result: &BatchResult,
        records: &[ValidatedRecord],
    ) -> ReconciliationReport {
        let submitted = records.len();
        let reported = result.success.saturating_add(result.failed);
        let count_mismatch = (reported != submitted as u64).then(|| {
            warn!(
                "{} result counts do not match: {reported} reported, {submitted} submitted",
                self.resource
            );
            CountMismatch {
                submitted,
                reported,
            }
        });

        let lines = result
            .errors
            .iter()
            .enumerate()
            .map(|(position, error)| ReportLine {
                label: self.label_for(error, position, records),
                error: error.error.clone(),
                kind: error.kind,
            })
            .collect();

        ReconciliationReport {
            resource: self.resource,
            strategy: self.strategy,
            submitted,
            success: result.success,
            failed: result.failed,
            lines,
            count_mismatch,
            generated_at: Utc::now(),
        }
    }

    /// Key from the server, else the identifier of the submitted record the
    /// server's 1-based `row` points at, else a row label.
    fn label_for(&self, error: &RowError, position: usize, records: &[ValidatedRecord]) -> String {
        if let Some(key) = &error.key {
            return key.clone();
        }
        let Some(row) = error.row else {
            return format!("Row {}", position + 1);
        };
        row.checked_sub(1)
            .and_then(|i| records.get(i))
            .and_then(|record| record.get(self.resource.identifying_field()))
            .map(|value| value.to_string())
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| format!("Row {row}"))
    }
}

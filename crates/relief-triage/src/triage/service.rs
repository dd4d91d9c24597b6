use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::aggregation::{aggregate, AreaStats};
use super::report::{ReportId, ReportRecord, ReportSubmission};
use super::scoring::{score_breakdown, ScoreBreakdown};
use super::store::{ReportStore, StoreError};

/// Intake and dashboard facade over the report store.
pub struct TriageService<S> {
    store: Arc<S>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("req-{id:06}"))
}

impl<S> TriageService<S>
where
    S: ReportStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Score and persist one submitted report.
    ///
    /// The submission is normalized first (supply days capped at 3, blank
    /// area dropped; the pregnancy/trimester pairing is already enforced by
    /// the type), then scored exactly once. The score travels with the record
    /// and is never recomputed in place.
    pub fn submit(&self, submission: ReportSubmission) -> Result<ReportRecord, TriageServiceError> {
        let report = normalize(submission);
        let priority_score = score_breakdown(&report).total;

        let record = ReportRecord {
            id: next_report_id(),
            report,
            priority_score,
            recorded_at: Utc::now(),
        };

        let stored = self.store.insert(record)?;
        Ok(stored)
    }

    /// Fetch a stored report together with its recomputed score trail.
    ///
    /// The stored `priority_score` stays authoritative; the breakdown is
    /// derived on demand for auditing and matches it for unmodified records.
    pub fn score_trail(
        &self,
        id: &ReportId,
    ) -> Result<Option<(ReportRecord, ScoreBreakdown)>, TriageServiceError> {
        let Some(record) = self.store.fetch(id)? else {
            return Ok(None);
        };
        let breakdown = score_breakdown(&record.report);
        Ok(Some((record, breakdown)))
    }

    /// One full fetch-and-aggregate pass over the current store contents.
    pub fn dashboard_snapshot(&self) -> Result<Vec<AreaStats>, TriageServiceError> {
        let reports = self.store.fetch_for_dashboard()?;
        Ok(aggregate(&reports))
    }
}

fn normalize(mut submission: ReportSubmission) -> ReportSubmission {
    submission.immediate_needs.days_without_supplies =
        submission.immediate_needs.days_without_supplies.min(3);

    let area = submission.location.normalized_area().map(str::to_string);
    submission.location.area = area;

    submission
}

/// Receipt handed back to the submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportReceipt {
    pub report_id: ReportId,
    pub priority_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl ReportRecord {
    pub fn receipt(&self) -> ReportReceipt {
        ReportReceipt {
            report_id: self.id.clone(),
            priority_score: self.priority_score,
            area: self.report.location.area.clone(),
        }
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

use metrics_exporter_prometheus::PrometheusHandle;
use relief_triage::triage::{ReportId, ReportRecord, ReportStore, StoreError};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Append-only in-memory report table. Insertion order is preserved so the
/// aggregation fold is reproducible across cycles.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReportStore {
    records: Arc<Mutex<Vec<ReportRecord>>>,
}

impl ReportStore for InMemoryReportStore {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn fetch_for_dashboard(&self) -> Result<Vec<ReportRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.report.location.area.is_some())
            .cloned()
            .collect())
    }
}

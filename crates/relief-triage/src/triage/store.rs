use super::report::{ReportId, ReportRecord};

/// Storage abstraction over the report table so the intake service and the
/// aggregation loop can be exercised against an in-memory double.
pub trait ReportStore: Send + Sync {
    /// Single atomic append of a scored record. Records are never updated.
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, StoreError>;

    /// Look up one stored record by id.
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, StoreError>;

    /// Full snapshot of every record carrying an area, in insertion order.
    /// The aggregation engine consumes whatever is returned; no pagination.
    fn fetch_for_dashboard(&self) -> Result<Vec<ReportRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

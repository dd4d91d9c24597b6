//! Priority triage for household disaster-impact reports.
//!
//! Intake scores each report once with a transparent weighted formula, the
//! store keeps the scored records append-only, and a periodic aggregation
//! pass rolls the full record set up into per-area dashboard rows.

pub mod aggregation;
pub mod report;
pub mod router;
pub mod scheduler;
pub mod scoring;
pub mod service;
pub mod store;

pub use aggregation::{aggregate, AreaStats};
pub use report::{
    ChronicConditions, EnvironmentReport, HouseholdProfile, ImmediateNeeds, InjurySeverity,
    Location, MedicalStatus, Pregnancy, ReportId, ReportRecord, ReportSubmission,
    StructuralDamage, Trimester, Vulnerabilities, WaterLevel,
};
pub use router::triage_router;
pub use scheduler::{AggregationScheduler, DashboardPublisher, DashboardSnapshot};
pub use scoring::{priority_score, score_breakdown, ScoreBreakdown, ScoreComponent, ScoreFactor};
pub use service::{ReportReceipt, TriageService, TriageServiceError};
pub use store::{ReportStore, StoreError};

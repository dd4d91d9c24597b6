//! Per-area rollup of scored reports for the operations dashboard.
//!
//! Every cycle rebuilds the rows from scratch out of a full snapshot, so the
//! published table can never drift from the underlying records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::report::ReportRecord;

/// One dashboard row: the rollup of every report for a single area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaStats {
    pub area: String,
    pub total_priority: f64,
    pub request_count: u64,
    pub total_adults: u64,
    pub total_children: u64,
    pub total_elderly: u64,
    pub total_vehicles: u64,
    pub avg_days_without_supplies: f64,
}

impl AreaStats {
    fn empty(area: String) -> Self {
        Self {
            area,
            total_priority: 0.0,
            request_count: 0,
            total_adults: 0,
            total_children: 0,
            total_elderly: 0,
            total_vehicles: 0,
            avg_days_without_supplies: 0.0,
        }
    }

    fn fold(&mut self, record: &ReportRecord) {
        self.total_priority += record.priority_score;
        self.request_count += 1;
        self.total_adults += u64::from(record.report.household.adults);
        self.total_children += u64::from(record.report.household.children);
        self.total_elderly += u64::from(record.report.household.elderly);
        self.total_vehicles += u64::from(record.report.environment.vehicles_submerged);

        // Incremental mean: avg' = (avg * (n-1) + x) / n with n counted after
        // this record. Applied strictly in fold order so every cycle over the
        // same snapshot reproduces the same float.
        let n = self.request_count as f64;
        let days = f64::from(record.report.immediate_needs.days_without_supplies);
        self.avg_days_without_supplies = (self.avg_days_without_supplies * (n - 1.0) + days) / n;
    }
}

/// Roll a snapshot of scored reports up into one row per distinct area.
///
/// Reports without a usable area key are skipped. Keys are trim-normalized so
/// `"T.Nagar"` and `" T.Nagar "` land in the same bucket. Each group is folded
/// in slice order (arrival order in practice). Rows come back sorted by
/// `total_priority` descending; ties break by area name ascending.
pub fn aggregate(reports: &[ReportRecord]) -> Vec<AreaStats> {
    let mut buckets: BTreeMap<String, AreaStats> = BTreeMap::new();

    for record in reports {
        let Some(area) = record.report.location.normalized_area() else {
            continue;
        };
        buckets
            .entry(area.to_string())
            .or_insert_with(|| AreaStats::empty(area.to_string()))
            .fold(record);
    }

    let mut rows: Vec<AreaStats> = buckets.into_values().collect();
    rows.sort_by(|a, b| b.total_priority.total_cmp(&a.total_priority));
    rows
}

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::aggregation::{aggregate, AreaStats};
use super::store::ReportStore;

/// The last complete aggregation pass, as shown to responders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub areas: Vec<AreaStats>,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Number of successful aggregation cycles since startup.
    pub cycles: u64,
}

/// Shared handle to the published dashboard rows.
///
/// Writers replace the whole snapshot atomically; a failed cycle never
/// touches it, so readers always see a complete, internally consistent pass.
#[derive(Debug, Clone, Default)]
pub struct DashboardPublisher {
    inner: Arc<RwLock<DashboardSnapshot>>,
}

impl DashboardPublisher {
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.inner.read().expect("dashboard lock poisoned").clone()
    }

    fn publish(&self, areas: Vec<AreaStats>) {
        let mut guard = self.inner.write().expect("dashboard lock poisoned");
        guard.areas = areas;
        guard.refreshed_at = Some(Utc::now());
        guard.cycles += 1;
    }
}

/// Periodic full-recompute driver for the dashboard.
///
/// Each tick fetches a fresh snapshot and rebuilds every row; there is no
/// incremental update to drift. A fetch failure skips the cycle and leaves
/// the previously published rows in place.
pub struct AggregationScheduler<S> {
    store: Arc<S>,
    publisher: DashboardPublisher,
    interval: Duration,
}

impl<S> AggregationScheduler<S>
where
    S: ReportStore + 'static,
{
    pub fn new(store: Arc<S>, publisher: DashboardPublisher, interval: Duration) -> Self {
        Self {
            store,
            publisher,
            interval,
        }
    }

    /// Run one fetch -> aggregate -> publish cycle. Returns whether the
    /// cycle published. Public so tests can drive cycles without a timer.
    pub fn refresh_once(&self) -> bool {
        match self.store.fetch_for_dashboard() {
            Ok(reports) => {
                let rows = aggregate(&reports);
                debug!(
                    reports = reports.len(),
                    areas = rows.len(),
                    "dashboard aggregation cycle complete"
                );
                self.publisher.publish(rows);
                true
            }
            Err(err) => {
                warn!(%err, "snapshot fetch failed; keeping last published dashboard");
                false
            }
        }
    }

    /// Drive cycles forever on a fixed wall-clock interval.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh_once();
        }
    }
}

//! Integration specifications for report intake, aggregation, and the
//! dashboard refresh loop.
//!
//! Scenarios run through the public service facade, scheduler, and HTTP
//! router against in-memory stores, without reaching into private modules.

mod common {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use relief_triage::triage::{
        ChronicConditions, EnvironmentReport, HouseholdProfile, ImmediateNeeds, InjurySeverity,
        Location, MedicalStatus, Pregnancy, ReportId, ReportRecord, ReportStore,
        ReportSubmission, StoreError, StructuralDamage, TriageService, Vulnerabilities,
        WaterLevel,
    };

    #[derive(Default, Clone)]
    pub(super) struct MemoryStore {
        records: Arc<Mutex<Vec<ReportRecord>>>,
    }

    impl ReportStore for MemoryStore {
        fn insert(&self, record: ReportRecord) -> Result<ReportRecord, StoreError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.iter().any(|existing| existing.id == record.id) {
                return Err(StoreError::Conflict);
            }
            guard.push(record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, StoreError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.iter().find(|record| &record.id == id).cloned())
        }

        fn fetch_for_dashboard(&self) -> Result<Vec<ReportRecord>, StoreError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard
                .iter()
                .filter(|record| record.report.location.area.is_some())
                .cloned()
                .collect())
        }
    }

    /// Store whose snapshot fetch can be switched off to simulate an outage.
    #[derive(Default, Clone)]
    pub(super) struct FlakyStore {
        inner: MemoryStore,
        fetch_down: Arc<AtomicBool>,
    }

    impl FlakyStore {
        pub(super) fn set_fetch_down(&self, down: bool) {
            self.fetch_down.store(down, Ordering::SeqCst);
        }
    }

    impl ReportStore for FlakyStore {
        fn insert(&self, record: ReportRecord) -> Result<ReportRecord, StoreError> {
            self.inner.insert(record)
        }

        fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, StoreError> {
            self.inner.fetch(id)
        }

        fn fetch_for_dashboard(&self) -> Result<Vec<ReportRecord>, StoreError> {
            if self.fetch_down.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            self.inner.fetch_for_dashboard()
        }
    }

    pub(super) fn submission(area: Option<&str>) -> ReportSubmission {
        ReportSubmission {
            household: HouseholdProfile {
                adults: 1,
                children: 0,
                elderly: 0,
            },
            vulnerabilities: Vulnerabilities::default(),
            medical: MedicalStatus {
                injury_severity: InjurySeverity::None,
                chronic: ChronicConditions::default(),
                pregnancy: Pregnancy::NotPregnant,
            },
            immediate_needs: ImmediateNeeds {
                days_without_supplies: 1,
                medicine_needed: false,
                toilet_access: true,
            },
            environment: EnvironmentReport {
                water_level: WaterLevel::KneeHigh,
                structural_damage: StructuralDamage::None,
                vehicles_submerged: 0,
            },
            location: Location {
                region: "Chennai".to_string(),
                area: area.map(str::to_string),
            },
            additional_info: None,
        }
    }

    /// The documented reference report: scores exactly 1.82.
    pub(super) fn reference_submission(area: &str) -> ReportSubmission {
        let mut report = submission(Some(area));
        report.household.children = 2;
        report.household.elderly = 1;
        report.vulnerabilities.wheelchair_user = true;
        report.medical.injury_severity = InjurySeverity::Bleeding;
        report.immediate_needs.days_without_supplies = 0;
        report.immediate_needs.medicine_needed = true;
        report.immediate_needs.toilet_access = false;
        report.environment.water_level = WaterLevel::ChestHigh;
        report.environment.vehicles_submerged = 1;
        report
    }

    pub(super) fn build_service() -> (TriageService<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let service = TriageService::new(store.clone());
        (service, store)
    }
}

mod intake {
    use super::common::*;
    use relief_triage::triage::{Pregnancy, ReportSubmission};

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn submit_scores_once_and_persists() {
        let (service, store) = build_service();
        let record = service
            .submit(reference_submission("T.Nagar"))
            .expect("submission stores");

        assert!((record.priority_score - 1.82).abs() < TOLERANCE);
        assert!(record.id.0.starts_with("req-"));

        use relief_triage::triage::ReportStore;
        let stored = store
            .fetch(&record.id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(stored.priority_score, record.priority_score);
    }

    #[test]
    fn supply_days_are_clamped_at_intake() {
        let (service, _) = build_service();
        let mut report = submission(Some("Adyar"));
        report.immediate_needs.days_without_supplies = 200;

        let record = service.submit(report).expect("submission stores");
        assert_eq!(record.report.immediate_needs.days_without_supplies, 3);
    }

    #[test]
    fn blank_area_is_dropped_at_intake() {
        let (service, _) = build_service();
        let record = service
            .submit(submission(Some("   ")))
            .expect("submission stores");
        assert_eq!(record.report.location.area, None);
    }

    #[test]
    fn trimester_without_pregnancy_never_survives_the_wire() {
        let raw = serde_json::json!({
            "household": { "adults": 1, "children": 0, "elderly": 0 },
            "vulnerabilities": {
                "wheelchair_user": false,
                "blindness": false,
                "other_disabilities": false
            },
            "medical": {
                "injury_severity": "none",
                "diabetes": false,
                "heart_disease": false,
                "dialysis_dependent": false,
                "is_pregnant": false,
                "pregnancy_trimester": "second"
            },
            "immediate_needs": {
                "days_without_supplies": 0,
                "medicine_needed": false,
                "toilet_access": true
            },
            "environment": {
                "water_level": "knee-high",
                "structural_damage": "none",
                "vehicles_submerged": 0
            },
            "location": { "region": "Chennai", "area": "Adyar" }
        });

        let parsed: ReportSubmission = serde_json::from_value(raw).expect("wire shape parses");
        assert_eq!(parsed.medical.pregnancy, Pregnancy::NotPregnant);
    }

    #[test]
    fn score_trail_reproduces_the_stored_score() {
        let (service, _) = build_service();
        let record = service
            .submit(reference_submission("Mylapore"))
            .expect("submission stores");

        let (fetched, breakdown) = service
            .score_trail(&record.id)
            .expect("trail fetch")
            .expect("record present");
        assert_eq!(breakdown.total, fetched.priority_score);
        assert_eq!(breakdown.components.len(), 12);
    }
}

mod aggregation {
    use super::common::*;
    use relief_triage::triage::aggregate;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn permuted_snapshots_agree_per_area() {
        let (service, store) = build_service();
        for area in ["T.Nagar", "Adyar", "T.Nagar", "Velachery", "Adyar"] {
            let mut report = reference_submission(area);
            report.immediate_needs.days_without_supplies = (area.len() % 4) as u8;
            service.submit(report).expect("submission stores");
        }

        use relief_triage::triage::ReportStore;
        let snapshot = store.fetch_for_dashboard().expect("snapshot");
        let mut reversed = snapshot.clone();
        reversed.reverse();

        let mut forward = aggregate(&snapshot);
        let mut backward = aggregate(&reversed);
        forward.sort_by(|a, b| a.area.cmp(&b.area));
        backward.sort_by(|a, b| a.area.cmp(&b.area));

        assert_eq!(forward.len(), backward.len());
        for (a, b) in forward.iter().zip(backward.iter()) {
            assert_eq!(a.area, b.area);
            assert_eq!(a.request_count, b.request_count);
            assert!((a.total_priority - b.total_priority).abs() < TOLERANCE);
            assert!(
                (a.avg_days_without_supplies - b.avg_days_without_supplies).abs() < TOLERANCE
            );
        }
    }

    #[test]
    fn dashboard_snapshot_ranks_by_total_priority() {
        let (service, _) = build_service();
        service
            .submit(reference_submission("T.Nagar"))
            .expect("stores");
        service
            .submit(reference_submission("T.Nagar"))
            .expect("stores");
        service.submit(submission(Some("Adyar"))).expect("stores");

        let rows = service.dashboard_snapshot().expect("aggregates");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].area, "T.Nagar");
        assert_eq!(rows[0].request_count, 2);
        assert!(rows[0].total_priority > rows[1].total_priority);
    }
}

mod refresh {
    use super::common::*;
    use relief_triage::triage::{AggregationScheduler, DashboardPublisher, TriageService};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn refresh_publishes_a_complete_pass() {
        let store = Arc::new(MemoryStore::default());
        let service = TriageService::new(store.clone());
        let publisher = DashboardPublisher::default();
        let scheduler =
            AggregationScheduler::new(store, publisher.clone(), Duration::from_millis(5000));

        service
            .submit(reference_submission("T.Nagar"))
            .expect("stores");

        assert!(scheduler.refresh_once());
        let snapshot = publisher.snapshot();
        assert_eq!(snapshot.cycles, 1);
        assert_eq!(snapshot.areas.len(), 1);
        assert!(snapshot.refreshed_at.is_some());
    }

    #[test]
    fn failed_fetch_keeps_the_previous_dashboard() {
        let store = Arc::new(FlakyStore::default());
        let service = TriageService::new(store.clone());
        let publisher = DashboardPublisher::default();
        let scheduler =
            AggregationScheduler::new(store.clone(), publisher.clone(), Duration::from_millis(5000));

        service
            .submit(reference_submission("T.Nagar"))
            .expect("stores");
        assert!(scheduler.refresh_once());
        let before = publisher.snapshot();

        store.set_fetch_down(true);
        service
            .submit(reference_submission("Adyar"))
            .expect("stores even while fetch is down");
        assert!(!scheduler.refresh_once());

        let after = publisher.snapshot();
        assert_eq!(after.cycles, before.cycles);
        assert_eq!(after.areas, before.areas);
        assert_eq!(after.refreshed_at, before.refreshed_at);

        // Recovery publishes everything accumulated in the meantime.
        store.set_fetch_down(false);
        assert!(scheduler.refresh_once());
        assert_eq!(publisher.snapshot().areas.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_drives_cycles_on_virtual_time() {
        let store = Arc::new(MemoryStore::default());
        let service = TriageService::new(store.clone());
        let publisher = DashboardPublisher::default();
        let scheduler =
            AggregationScheduler::new(store, publisher.clone(), Duration::from_millis(5000));

        service
            .submit(reference_submission("Velachery"))
            .expect("stores");

        tokio::spawn(scheduler.run());

        // First tick fires immediately, then one per interval.
        tokio::time::sleep(Duration::from_millis(10_001)).await;
        let snapshot = publisher.snapshot();
        assert!(snapshot.cycles >= 2, "expected at least two cycles, got {}", snapshot.cycles);
        assert_eq!(snapshot.areas.len(), 1);
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use relief_triage::triage::{
        triage_router, AggregationScheduler, DashboardPublisher, TriageService,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn build_router() -> (
        axum::Router,
        AggregationScheduler<MemoryStore>,
        DashboardPublisher,
    ) {
        let store = Arc::new(MemoryStore::default());
        let service = Arc::new(TriageService::new(store.clone()));
        let publisher = DashboardPublisher::default();
        let scheduler =
            AggregationScheduler::new(store, publisher.clone(), Duration::from_millis(5000));
        (
            triage_router(service, publisher.clone()),
            scheduler,
            publisher,
        )
    }

    #[tokio::test]
    async fn post_report_returns_receipt_with_score() {
        let (router, _, _) = build_router();
        let submission = reference_submission("T.Nagar");

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reports")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&submission).expect("serialize submission"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload.get("report_id").is_some());
        let score = payload
            .get("priority_score")
            .and_then(Value::as_f64)
            .expect("score present");
        assert!((score - 1.82).abs() < 1e-9);
    }

    #[tokio::test]
    async fn score_endpoint_returns_component_trail() {
        let (router, _, _) = build_router();

        let submit = Request::builder()
            .method("POST")
            .uri("/api/v1/reports")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&reference_submission("Adyar")).expect("serialize"),
            ))
            .expect("request");
        let response = router.clone().oneshot(submit).await.expect("dispatch");
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let receipt: Value = serde_json::from_slice(&body).expect("json");
        let report_id = receipt
            .get("report_id")
            .and_then(Value::as_str)
            .expect("id");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/reports/{report_id}/score"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let components = payload
            .get("components")
            .and_then(Value::as_array)
            .expect("components");
        assert_eq!(components.len(), 12);
    }

    #[tokio::test]
    async fn missing_report_score_is_not_found() {
        let (router, _, _) = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/reports/req-999999/score")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dashboard_serves_the_published_rows() {
        let (router, scheduler, _) = build_router();

        let submit = Request::builder()
            .method("POST")
            .uri("/api/v1/reports")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&reference_submission("Velachery")).expect("serialize"),
            ))
            .expect("request");
        router
            .clone()
            .oneshot(submit)
            .await
            .expect("dispatch");

        // Nothing published before the first cycle.
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/dashboard/areas")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["cycles"], 0);
        assert_eq!(payload["areas"].as_array().map(Vec::len), Some(0));

        scheduler.refresh_once();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/dashboard/areas")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["cycles"], 1);
        let rows = payload["areas"].as_array().expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["area"], "Velachery");
        assert_eq!(rows[0]["request_count"], 1);
    }
}

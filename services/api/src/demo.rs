use crate::infra::InMemoryReportStore;
use clap::Args;
use relief_triage::error::AppError;
use relief_triage::triage::{
    score_breakdown, AggregationScheduler, ChronicConditions, DashboardPublisher,
    EnvironmentReport, HouseholdProfile, ImmediateNeeds, InjurySeverity, Location, MedicalStatus,
    Pregnancy, ReportSubmission, StructuralDamage, Trimester, TriageService, Vulnerabilities,
    WaterLevel,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the per-factor score breakdown for each sample report
    #[arg(long)]
    pub(crate) show_breakdown: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryReportStore::default());
    let service = TriageService::new(store.clone());
    let publisher = DashboardPublisher::default();
    let scheduler = AggregationScheduler::new(store, publisher.clone(), Duration::from_millis(5000));

    println!("Relief triage demo");
    println!("\nScored sample reports");
    for (label, submission) in sample_reports() {
        let breakdown = if args.show_breakdown {
            Some(score_breakdown(&submission))
        } else {
            None
        };

        match service.submit(submission) {
            Ok(record) => {
                let area = record
                    .report
                    .location
                    .area
                    .clone()
                    .unwrap_or_else(|| "(no area)".to_string());
                println!(
                    "- {} | {} | area {} | priority {:.2}",
                    record.id.0, label, area, record.priority_score
                );
                if let Some(breakdown) = breakdown {
                    for component in &breakdown.components {
                        if component.contribution != 0.0 {
                            println!(
                                "    {:?}: {} x {} = {:+.3}",
                                component.factor,
                                component.input,
                                component.weight,
                                component.contribution
                            );
                        }
                    }
                }
            }
            Err(err) => println!("- {label}: submission failed ({err})"),
        }
    }

    scheduler.refresh_once();
    let snapshot = publisher.snapshot();

    println!("\nAggregated area statistics (one full cycle)");
    println!(
        "{:<12} {:>8} {:>9} {:>7} {:>9} {:>8} {:>9} {:>10}",
        "Area", "Priority", "Requests", "Adults", "Children", "Elderly", "Vehicles", "Avg days"
    );
    for row in &snapshot.areas {
        println!(
            "{:<12} {:>8.2} {:>9} {:>7} {:>9} {:>8} {:>9} {:>10.1}",
            row.area,
            row.total_priority,
            row.request_count,
            row.total_adults,
            row.total_children,
            row.total_elderly,
            row.total_vehicles,
            row.avg_days_without_supplies
        );
    }

    Ok(())
}

fn sample_reports() -> Vec<(&'static str, ReportSubmission)> {
    vec![
        (
            "family with injuries, chest-high water",
            ReportSubmission {
                household: HouseholdProfile {
                    adults: 2,
                    children: 2,
                    elderly: 1,
                },
                vulnerabilities: Vulnerabilities {
                    wheelchair_user: true,
                    ..Vulnerabilities::default()
                },
                medical: MedicalStatus {
                    injury_severity: InjurySeverity::Bleeding,
                    chronic: ChronicConditions::default(),
                    pregnancy: Pregnancy::NotPregnant,
                },
                immediate_needs: ImmediateNeeds {
                    days_without_supplies: 0,
                    medicine_needed: true,
                    toilet_access: false,
                },
                environment: EnvironmentReport {
                    water_level: WaterLevel::ChestHigh,
                    structural_damage: StructuralDamage::None,
                    vehicles_submerged: 1,
                },
                location: Location {
                    region: "Chennai".to_string(),
                    area: Some("T.Nagar".to_string()),
                },
                additional_info: None,
            },
        ),
        (
            "expectant mother, three days without supplies",
            ReportSubmission {
                household: HouseholdProfile {
                    adults: 1,
                    children: 0,
                    elderly: 0,
                },
                vulnerabilities: Vulnerabilities::default(),
                medical: MedicalStatus {
                    injury_severity: InjurySeverity::None,
                    chronic: ChronicConditions {
                        diabetes: true,
                        ..ChronicConditions::default()
                    },
                    pregnancy: Pregnancy::Pregnant(Some(Trimester::Third)),
                },
                immediate_needs: ImmediateNeeds {
                    days_without_supplies: 3,
                    medicine_needed: true,
                    toilet_access: true,
                },
                environment: EnvironmentReport {
                    water_level: WaterLevel::WaistHigh,
                    structural_damage: StructuralDamage::CrackedWalls,
                    vehicles_submerged: 0,
                },
                location: Location {
                    region: "Chennai".to_string(),
                    // Stray whitespace from free-text entry; folds into T.Nagar.
                    area: Some(" T.Nagar ".to_string()),
                },
                additional_info: Some("second floor, water still rising".to_string()),
            },
        ),
        (
            "elderly couple, collapsed wall",
            ReportSubmission {
                household: HouseholdProfile {
                    adults: 0,
                    children: 0,
                    elderly: 2,
                },
                vulnerabilities: Vulnerabilities {
                    other_disabilities: true,
                    ..Vulnerabilities::default()
                },
                medical: MedicalStatus {
                    injury_severity: InjurySeverity::Fracture,
                    chronic: ChronicConditions {
                        heart_disease: true,
                        dialysis_dependent: true,
                        ..ChronicConditions::default()
                    },
                    pregnancy: Pregnancy::NotPregnant,
                },
                immediate_needs: ImmediateNeeds {
                    days_without_supplies: 2,
                    medicine_needed: true,
                    toilet_access: false,
                },
                environment: EnvironmentReport {
                    water_level: WaterLevel::NeckHigh,
                    structural_damage: StructuralDamage::CollapsedStructure,
                    vehicles_submerged: 0,
                },
                location: Location {
                    region: "Chennai".to_string(),
                    area: Some("Velachery".to_string()),
                },
                additional_info: None,
            },
        ),
        (
            "report without an area (stored, not aggregated)",
            ReportSubmission {
                household: HouseholdProfile {
                    adults: 1,
                    children: 1,
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
                    area: None,
                },
                additional_info: None,
            },
        ),
    ]
}

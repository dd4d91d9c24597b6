//! The priority triage formula.
//!
//! A linear weighted sum over the report's risk factors. Deliberately not a
//! probabilistic model: every term is monotonic in its input and the
//! per-factor breakdown lets a responder explain why one request outranks
//! another. The result is an unbounded rank, not a probability, and is never
//! clamped.

use serde::{Deserialize, Serialize};

use super::report::ReportSubmission;

const CHILDREN_WEIGHT: f64 = 0.25;
const ELDERLY_WEIGHT: f64 = 0.30;
const DISABILITY_WEIGHT: f64 = 0.40;
const INJURY_WEIGHT: f64 = 0.35;
const CHRONIC_WEIGHT: f64 = 0.30;
const PREGNANCY_WEIGHT: f64 = 0.25;
// Observed production behavior: the supplies term subtracts more the *fewer*
// days a household has gone without supplies, so the score is non-increasing
// in days_without_supplies. Preserved as-is; do not invert the sign without
// revisiting the triage policy.
const SUPPLY_OUTLOOK_WEIGHT: f64 = -0.15;
const MEDICINE_WEIGHT: f64 = 0.20;
const NO_TOILET_WEIGHT: f64 = 0.15;
const WATER_LEVEL_WEIGHT: f64 = 0.50;
const STRUCTURAL_DAMAGE_WEIGHT: f64 = 0.45;
const VEHICLES_WEIGHT: f64 = 0.10;

const MAX_DAYS_WITHOUT_SUPPLIES: f64 = 3.0;

/// Risk factors that contribute to the priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Children,
    Elderly,
    Disabilities,
    InjurySeverity,
    ChronicConditions,
    Pregnancy,
    SupplyOutlook,
    MedicineNeeded,
    ToiletAccess,
    WaterLevel,
    StructuralDamage,
    VehiclesSubmerged,
}

/// Discrete contribution of one factor, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    /// The raw factor value before weighting (count, enum score, or 0/1 flag).
    pub input: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Full audit trail of a scored report. `total` is accumulated in the same
/// order as the components so it is bit-identical to [`priority_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: f64,
}

/// Score a report. Pure and total: any well-typed report scores without
/// failure. Out-of-range numeric inputs are the intake layer's problem.
pub fn priority_score(report: &ReportSubmission) -> f64 {
    score_breakdown(report).total
}

/// Score a report, keeping the per-factor contribution trail.
pub fn score_breakdown(report: &ReportSubmission) -> ScoreBreakdown {
    let mut components = Vec::with_capacity(12);
    let mut total = 0.0_f64;

    let mut push = |factor: ScoreFactor, input: f64, weight: f64| {
        let contribution = input * weight;
        total += contribution;
        components.push(ScoreComponent {
            factor,
            input,
            weight,
            contribution,
        });
    };

    push(
        ScoreFactor::Children,
        f64::from(report.household.children),
        CHILDREN_WEIGHT,
    );
    push(
        ScoreFactor::Elderly,
        f64::from(report.household.elderly),
        ELDERLY_WEIGHT,
    );
    push(
        ScoreFactor::Disabilities,
        f64::from(report.vulnerabilities.disability_count()),
        DISABILITY_WEIGHT,
    );
    push(
        ScoreFactor::InjurySeverity,
        report.medical.injury_severity.severity_score(),
        INJURY_WEIGHT,
    );
    push(
        ScoreFactor::ChronicConditions,
        f64::from(report.medical.chronic.chronic_count()),
        CHRONIC_WEIGHT,
    );
    push(
        ScoreFactor::Pregnancy,
        if report.medical.pregnancy.is_pregnant() {
            1.0
        } else {
            0.0
        },
        PREGNANCY_WEIGHT,
    );
    push(
        ScoreFactor::SupplyOutlook,
        MAX_DAYS_WITHOUT_SUPPLIES - f64::from(report.immediate_needs.days_without_supplies),
        SUPPLY_OUTLOOK_WEIGHT,
    );
    push(
        ScoreFactor::MedicineNeeded,
        if report.immediate_needs.medicine_needed {
            1.0
        } else {
            0.0
        },
        MEDICINE_WEIGHT,
    );
    push(
        ScoreFactor::ToiletAccess,
        if report.immediate_needs.toilet_access {
            0.0
        } else {
            1.0
        },
        NO_TOILET_WEIGHT,
    );
    push(
        ScoreFactor::WaterLevel,
        report.environment.water_level.risk_score(),
        WATER_LEVEL_WEIGHT,
    );
    push(
        ScoreFactor::StructuralDamage,
        report.environment.structural_damage.damage_score(),
        STRUCTURAL_DAMAGE_WEIGHT,
    );
    push(
        ScoreFactor::VehiclesSubmerged,
        f64::from(report.environment.vehicles_submerged),
        VEHICLES_WEIGHT,
    );

    ScoreBreakdown { components, total }
}

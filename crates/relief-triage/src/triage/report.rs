use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored help requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// People in the household by age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdProfile {
    pub adults: u32,
    pub children: u32,
    pub elderly: u32,
}

/// Disability flags collected uniformly across reports. The count is always
/// derived from the flags so it can never drift out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vulnerabilities {
    pub wheelchair_user: bool,
    pub blindness: bool,
    pub other_disabilities: bool,
}

impl Vulnerabilities {
    pub fn disability_count(&self) -> u32 {
        u32::from(self.wheelchair_user) + u32::from(self.blindness) + u32::from(self.other_disabilities)
    }
}

/// Chronic conditions that raise the medical weight of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChronicConditions {
    pub diabetes: bool,
    pub heart_disease: bool,
    pub dialysis_dependent: bool,
}

impl ChronicConditions {
    pub fn chronic_count(&self) -> u32 {
        u32::from(self.diabetes) + u32::from(self.heart_disease) + u32::from(self.dialysis_dependent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    pub const fn label(self) -> &'static str {
        match self {
            Trimester::First => "first",
            Trimester::Second => "second",
            Trimester::Third => "third",
        }
    }
}

/// Pregnancy status with the trimester attached only when it can apply, so a
/// trimester on a non-pregnant report is unrepresentable. On the wire this is
/// the `is_pregnant` / `pregnancy_trimester` pair; a trimester arriving with
/// `is_pregnant: false` is coerced to `NotPregnant`, as the intake form does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PregnancyWire", into = "PregnancyWire")]
pub enum Pregnancy {
    #[default]
    NotPregnant,
    Pregnant(Option<Trimester>),
}

impl Pregnancy {
    pub fn is_pregnant(&self) -> bool {
        matches!(self, Pregnancy::Pregnant(_))
    }

    pub fn trimester(&self) -> Option<Trimester> {
        match self {
            Pregnancy::NotPregnant => None,
            Pregnancy::Pregnant(trimester) => *trimester,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PregnancyWire {
    is_pregnant: bool,
    #[serde(default)]
    pregnancy_trimester: TrimesterField,
}

/// Wire spelling of the trimester enum, which includes a `none` member.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TrimesterField {
    #[default]
    None,
    First,
    Second,
    Third,
}

impl From<PregnancyWire> for Pregnancy {
    fn from(wire: PregnancyWire) -> Self {
        if !wire.is_pregnant {
            return Pregnancy::NotPregnant;
        }
        let trimester = match wire.pregnancy_trimester {
            TrimesterField::None => None,
            TrimesterField::First => Some(Trimester::First),
            TrimesterField::Second => Some(Trimester::Second),
            TrimesterField::Third => Some(Trimester::Third),
        };
        Pregnancy::Pregnant(trimester)
    }
}

impl From<Pregnancy> for PregnancyWire {
    fn from(pregnancy: Pregnancy) -> Self {
        let pregnancy_trimester = match pregnancy.trimester() {
            None => TrimesterField::None,
            Some(Trimester::First) => TrimesterField::First,
            Some(Trimester::Second) => TrimesterField::Second,
            Some(Trimester::Third) => TrimesterField::Third,
        };
        PregnancyWire {
            is_pregnant: pregnancy.is_pregnant(),
            pregnancy_trimester,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjurySeverity {
    None,
    Fracture,
    Bleeding,
    MultipleInjuries,
}

impl InjurySeverity {
    pub const fn severity_score(self) -> f64 {
        match self {
            InjurySeverity::None => 0.0,
            InjurySeverity::Fracture => 0.5,
            InjurySeverity::Bleeding => 0.7,
            InjurySeverity::MultipleInjuries => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            InjurySeverity::None => "None",
            InjurySeverity::Fracture => "Fracture",
            InjurySeverity::Bleeding => "Bleeding",
            InjurySeverity::MultipleInjuries => "Multiple Injuries",
        }
    }
}

/// Medical situation of the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalStatus {
    pub injury_severity: InjurySeverity,
    #[serde(flatten)]
    pub chronic: ChronicConditions,
    #[serde(flatten)]
    pub pregnancy: Pregnancy,
}

/// Supply and sanitation needs reported at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmediateNeeds {
    /// Days the household has gone without food or water, capped at 3.
    pub days_without_supplies: u8,
    pub medicine_needed: bool,
    pub toilet_access: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaterLevel {
    KneeHigh,
    WaistHigh,
    ChestHigh,
    NeckHigh,
}

impl WaterLevel {
    pub const fn risk_score(self) -> f64 {
        match self {
            WaterLevel::KneeHigh => 0.25,
            WaterLevel::WaistHigh => 0.5,
            WaterLevel::ChestHigh => 0.75,
            WaterLevel::NeckHigh => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WaterLevel::KneeHigh => "Knee High",
            WaterLevel::WaistHigh => "Waist High",
            WaterLevel::ChestHigh => "Chest High",
            WaterLevel::NeckHigh => "Neck High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralDamage {
    None,
    CrackedWalls,
    CollapsedStructure,
}

impl StructuralDamage {
    pub const fn damage_score(self) -> f64 {
        match self {
            StructuralDamage::None => 0.0,
            StructuralDamage::CrackedWalls => 0.5,
            StructuralDamage::CollapsedStructure => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StructuralDamage::None => "None",
            StructuralDamage::CrackedWalls => "Cracked Walls",
            StructuralDamage::CollapsedStructure => "Collapsed Structure",
        }
    }
}

/// Flood conditions around the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub water_level: WaterLevel,
    pub structural_damage: StructuralDamage,
    pub vehicles_submerged: u32,
}

/// Free-text location entered on the form. `area` is the aggregation key;
/// reports without one are stored but never appear on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub region: String,
    #[serde(default)]
    pub area: Option<String>,
}

impl Location {
    /// Trimmed, non-empty aggregation key, if the report carries one.
    pub fn normalized_area(&self) -> Option<&str> {
        self.area
            .as_deref()
            .map(str::trim)
            .filter(|area| !area.is_empty())
    }
}

/// One household's emergency-assistance request as submitted by the intake
/// form. Trusted to be well-formed; range normalization happens at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub household: HouseholdProfile,
    pub vulnerabilities: Vulnerabilities,
    pub medical: MedicalStatus,
    pub immediate_needs: ImmediateNeeds,
    pub environment: EnvironmentReport,
    pub location: Location,
    #[serde(default)]
    pub additional_info: Option<String>,
}

/// Stored shape of a report. The priority score is computed once at
/// submission and never recomputed in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ReportId,
    pub report: ReportSubmission,
    pub priority_score: f64,
    pub recorded_at: DateTime<Utc>,
}

//! Lifecycle configuration per animal type or breed
//!
//! Deserializes from the `farm_lifecycle` object stored on animal types and
//! breeds. Configuration is always passed explicitly; nothing here is global.

use serde::Deserialize;
use serde_json::Value;

use crate::components::Sex;

/// Defaults offered when a new animal type is created
const DEFAULT_MATURITY_DAYS: u32 = 120;
const DEFAULT_GESTATION_DAYS: u32 = 30;
const DEFAULT_INCUBATION_DAYS: u32 = 21;
const DEFAULT_WEANING_DAYS: u32 = 42;
const DEFAULT_MEAT_AGE_DAYS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReproductionType {
    #[default]
    Birth,
    Hatching,
    /// Stored value we do not understand. Kept as-is rather than guessed.
    Unrecognized,
}

impl ReproductionType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "birth" => ReproductionType::Birth,
            "hatching" => ReproductionType::Hatching,
            _ => ReproductionType::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaturityDays {
    pub male: u32,
    pub female: u32,
}

impl MaturityDays {
    pub fn for_sex(&self, sex: Sex) -> u32 {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawLifecycle")]
pub struct LifecycleConfig {
    pub reproduction_type: ReproductionType,
    pub maturity_days: MaturityDays,
    /// 0 when the species has no gestation constraint
    pub gestation_days: u32,
    pub incubation_days: u32,
    pub weaning_days: u32,
    pub meat_age_days: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            reproduction_type: ReproductionType::Birth,
            maturity_days: MaturityDays {
                male: DEFAULT_MATURITY_DAYS,
                female: DEFAULT_MATURITY_DAYS,
            },
            gestation_days: DEFAULT_GESTATION_DAYS,
            incubation_days: DEFAULT_INCUBATION_DAYS,
            weaning_days: DEFAULT_WEANING_DAYS,
            meat_age_days: DEFAULT_MEAT_AGE_DAYS,
        }
    }
}

impl LifecycleConfig {
    /// Effective lifecycle for a breed of `animal_type`.
    ///
    /// A breed may override every number but never the reproduction type.
    pub fn for_breed(animal_type: &LifecycleConfig, breed: Option<&LifecycleConfig>) -> Self {
        match breed {
            Some(breed) => LifecycleConfig {
                reproduction_type: animal_type.reproduction_type,
                ..breed.clone()
            },
            None => animal_type.clone(),
        }
    }
}

// ============================================================================
// Wire shape
// ============================================================================

/// `farm_lifecycle` as stored. Numbers arrive as numbers or numeric strings
/// depending on which form saved them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLifecycle {
    #[serde(rename = "type")]
    kind: Value,
    maturity: Value,
    gestation: Value,
    incubation: Value,
    weaning_complete: Value,
    meat_age: Value,
}

impl From<RawLifecycle> for LifecycleConfig {
    fn from(raw: RawLifecycle) -> Self {
        LifecycleConfig {
            reproduction_type: match &raw.kind {
                Value::Null => ReproductionType::default(),
                Value::String(s) => ReproductionType::parse(s),
                _ => ReproductionType::Unrecognized,
            },
            maturity_days: MaturityDays {
                male: raw.maturity.get("male").map_or(0, days),
                female: raw.maturity.get("female").map_or(0, days),
            },
            gestation_days: days(&raw.gestation),
            incubation_days: days(&raw.incubation),
            weaning_days: days(&raw.weaning_complete),
            meat_age_days: days(&raw.meat_age),
        }
    }
}

/// Day count from a loosely typed JSON value; missing or junk is 0.
fn days(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|d| d.min(u64::from(u32::MAX)) as u32)
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.min(u32::MAX as f64) as u32))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

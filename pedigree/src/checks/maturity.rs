//! Maturity & Gestation
//!
//! Date bounds for choosing parents and projected event dates for matings.

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::components::Sex;
use crate::lifecycle::{LifecycleConfig, ReproductionType};

/// Latest birth date a parent of `sex` may have for offspring tied to `target`.
///
/// A dam must already be mature when she conceives, `gestation_days` before
/// the target, so her offset is maturity + gestation. A sire only needs to be
/// mature. Returns `None` ("no constraint") when either the target date or the
/// sex is unknown; a zero offset returns `target` itself.
pub fn latest_eligible_birth_date(
    target: Option<NaiveDate>,
    sex: Option<Sex>,
    config: &LifecycleConfig,
) -> Option<NaiveDate> {
    let target = target?;
    let sex = sex?;

    let days_to_subtract = match sex {
        Sex::Female => config
            .maturity_days
            .female
            .saturating_add(config.gestation_days),
        Sex::Male => config.maturity_days.male,
    };

    // Past chrono's range nothing can have been born early enough
    Some(
        target
            .checked_sub_days(Days::new(u64::from(days_to_subtract)))
            .unwrap_or(NaiveDate::MIN),
    )
}

/// Expected birth date for a service on `service_date`.
///
/// Only birth-type animals with a gestation length get a projection; anything
/// else is `None` (nothing to show, not "due immediately").
pub fn projected_due_date(service_date: NaiveDate, config: &LifecycleConfig) -> Option<NaiveDate> {
    if config.reproduction_type != ReproductionType::Birth || config.gestation_days == 0 {
        return None;
    }
    add_days(service_date, config.gestation_days)
}

/// Expected hatch date for eggs set on `set_date`.
pub fn projected_hatch_date(set_date: NaiveDate, config: &LifecycleConfig) -> Option<NaiveDate> {
    if config.reproduction_type != ReproductionType::Hatching || config.incubation_days == 0 {
        return None;
    }
    add_days(set_date, config.incubation_days)
}

/// Whole days lived on `on`; `None` if born after `on`.
pub fn age_in_days(birth_date: NaiveDate, on: NaiveDate) -> Option<u32> {
    let days = (on - birth_date).num_days();
    u32::try_from(days).ok()
}

/// Whether an animal has reached breeding maturity on `on`.
/// Unknown birth date or sex is never eligible.
pub fn is_breeding_eligible(
    birth_date: Option<NaiveDate>,
    sex: Option<Sex>,
    on: NaiveDate,
    config: &LifecycleConfig,
) -> bool {
    match (birth_date, sex) {
        (Some(birth), Some(sex)) => age_in_days(birth, on)
            .map(|age| age >= config.maturity_days.for_sex(sex))
            .unwrap_or(false),
        _ => false,
    }
}

fn add_days(from: NaiveDate, days: u32) -> Option<NaiveDate> {
    let result = from.checked_add_days(Days::new(u64::from(days)));
    if result.is_none() {
        warn!(%from, days, "projected date out of range");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::MaturityDays;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goat() -> LifecycleConfig {
        LifecycleConfig {
            reproduction_type: ReproductionType::Birth,
            maturity_days: MaturityDays { male: 90, female: 120 },
            gestation_days: 30,
            ..LifecycleConfig::default()
        }
    }

    #[test]
    fn test_female_bound_includes_gestation() {
        let bound = latest_eligible_birth_date(Some(date(2024, 6, 1)), Some(Sex::Female), &goat());
        // 120 + 30 = 150 days before 2024-06-01
        assert_eq!(bound, Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_male_bound_is_maturity_only() {
        let bound = latest_eligible_birth_date(Some(date(2024, 6, 1)), Some(Sex::Male), &goat());
        assert_eq!(bound, Some(date(2024, 3, 3)));
    }

    #[test]
    fn test_zero_offset_is_still_a_constraint() {
        let config = LifecycleConfig {
            maturity_days: MaturityDays::default(),
            gestation_days: 0,
            ..goat()
        };
        let target = date(2024, 6, 1);
        for sex in [Sex::Female, Sex::Male] {
            assert_eq!(latest_eligible_birth_date(Some(target), Some(sex), &config), Some(target));
        }
    }

    #[test]
    fn test_no_target_or_sex_is_unconstrained() {
        assert_eq!(latest_eligible_birth_date(None, Some(Sex::Female), &goat()), None);
        assert_eq!(latest_eligible_birth_date(Some(date(2024, 6, 1)), None, &goat()), None);
        assert_eq!(
            latest_eligible_birth_date(Some(date(2024, 6, 1)), Sex::parse("unknown"), &goat()),
            None
        );
    }

    #[test]
    fn test_bound_saturates() {
        let config = LifecycleConfig {
            maturity_days: MaturityDays { male: u32::MAX, female: u32::MAX },
            gestation_days: u32::MAX,
            ..goat()
        };
        let bound = latest_eligible_birth_date(Some(date(2024, 6, 1)), Some(Sex::Female), &config);
        assert_eq!(bound, Some(NaiveDate::MIN));
    }

    #[test]
    fn test_due_date() {
        assert_eq!(projected_due_date(date(2024, 1, 10), &goat()), Some(date(2024, 2, 9)));

        let no_gestation = LifecycleConfig { gestation_days: 0, ..goat() };
        assert_eq!(projected_due_date(date(2024, 1, 10), &no_gestation), None);
    }

    #[test]
    fn test_hatching_has_no_due_date() {
        let hen = LifecycleConfig {
            reproduction_type: ReproductionType::Hatching,
            gestation_days: 30,
            incubation_days: 21,
            ..goat()
        };
        assert_eq!(projected_due_date(date(2024, 3, 1), &hen), None);
        assert_eq!(projected_hatch_date(date(2024, 3, 1), &hen), Some(date(2024, 3, 22)));
        assert_eq!(projected_hatch_date(date(2024, 3, 1), &goat()), None);
    }

    #[test]
    fn test_unrecognized_type_has_no_projection() {
        let odd = LifecycleConfig {
            reproduction_type: ReproductionType::Unrecognized,
            ..goat()
        };
        assert_eq!(projected_due_date(date(2024, 3, 1), &odd), None);
    }

    #[test]
    fn test_due_date_overflow_is_not_applicable() {
        let config = LifecycleConfig { gestation_days: 30, ..goat() };
        assert_eq!(projected_due_date(NaiveDate::MAX, &config), None);
    }

    #[test]
    fn test_age_and_eligibility() {
        let born = date(2024, 1, 1);
        assert_eq!(age_in_days(born, date(2024, 1, 31)), Some(30));
        assert_eq!(age_in_days(born, date(2023, 12, 31)), None);

        assert!(is_breeding_eligible(Some(born), Some(Sex::Male), date(2024, 3, 31), &goat()));
        assert!(!is_breeding_eligible(Some(born), Some(Sex::Female), date(2024, 3, 31), &goat()));
        assert!(!is_breeding_eligible(None, Some(Sex::Male), date(2030, 1, 1), &goat()));
        assert!(!is_breeding_eligible(Some(born), None, date(2030, 1, 1), &goat()));
    }
}

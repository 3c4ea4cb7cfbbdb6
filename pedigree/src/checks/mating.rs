//! Mating assessment
//!
//! Combines the relationship check and the due-date projection for a
//! service record on a dam.

use chrono::NaiveDate;
use serde::Serialize;

use crate::checks::maturity::projected_due_date;
use crate::checks::relationship::{evaluate_mate, Mate, RelationshipVerdict};
use crate::components::Lineage;
use crate::lifecycle::LifecycleConfig;

/// Why a service cannot be recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatingBlock {
    /// No sire chosen and the service is not marked external
    SireRequired,
    /// Sire and dam are too closely related
    Inbreeding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatingAssessment {
    /// `None` until a sire is chosen
    pub verdict: Option<RelationshipVerdict>,
    pub due_date: Option<NaiveDate>,
    pub block: Option<MatingBlock>,
}

impl MatingAssessment {
    pub fn is_blocked(&self) -> bool {
        self.block.is_some()
    }
}

/// Assess a service of `dam` by `sire` on `service_date`.
///
/// An `Unknown` relationship is reported but does not block.
pub fn assess_mating(
    dam: Lineage<'_>,
    sire: Option<Mate<'_>>,
    service_date: Option<NaiveDate>,
    config: &LifecycleConfig,
) -> MatingAssessment {
    let verdict = sire.map(|mate| evaluate_mate(dam, mate));

    let block = match verdict {
        None => Some(MatingBlock::SireRequired),
        Some(v) if v.blocks_submission() => Some(MatingBlock::Inbreeding),
        Some(_) => None,
    };

    MatingAssessment {
        verdict,
        due_date: service_date.and_then(|date| projected_due_date(date, config)),
        block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::relationship::Relationship;
    use crate::components::ParentLinks;
    use crate::ids::AnimalId;
    use crate::lifecycle::ReproductionType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sheep() -> LifecycleConfig {
        LifecycleConfig {
            gestation_days: 147,
            ..LifecycleConfig::default()
        }
    }

    #[test]
    fn test_sire_required() {
        let dam = AnimalId::Num(1);
        let assessment =
            assess_mating(Lineage::new(&dam, None), None, Some(date(2024, 9, 1)), &sheep());
        assert_eq!(assessment.block, Some(MatingBlock::SireRequired));
        assert_eq!(assessment.verdict, None);
        // Projection does not depend on the sire
        assert_eq!(assessment.due_date, Some(date(2025, 1, 26)));
    }

    #[test]
    fn test_external_service() {
        let dam = AnimalId::Num(1);
        let assessment = assess_mating(
            Lineage::new(&dam, None),
            Some(Mate::External),
            Some(date(2024, 9, 1)),
            &sheep(),
        );
        assert!(!assessment.is_blocked());
        assert!(assessment.verdict.is_some_and(|v| v.external_mate));
    }

    #[test]
    fn test_half_sibling_service_blocked() {
        let (dam, ram) = (AnimalId::Num(1), AnimalId::Num(2));
        let dam_links = ParentLinks::new(Some(AnimalId::Num(50)), Some(AnimalId::Num(51)));
        let ram_links = ParentLinks::new(Some(AnimalId::Num(50)), Some(AnimalId::Num(60)));

        let assessment = assess_mating(
            Lineage::new(&dam, Some(&dam_links)),
            Some(Mate::Herd(Lineage::new(&ram, Some(&ram_links)))),
            Some(date(2024, 9, 1)),
            &sheep(),
        );
        assert_eq!(assessment.block, Some(MatingBlock::Inbreeding));
        assert_eq!(assessment.verdict.map(|v| v.category), Some(Relationship::Sibling));
    }

    #[test]
    fn test_cyclic_pedigree_service_blocked() {
        let (dam, ram) = (AnimalId::Num(1), AnimalId::Num(2));
        let dam_links = ParentLinks::new(Some(AnimalId::Num(2)), None);
        let ram_links = ParentLinks::new(None, Some(AnimalId::Num(1)));

        let assessment = assess_mating(
            Lineage::new(&dam, Some(&dam_links)),
            Some(Mate::Herd(Lineage::new(&ram, Some(&ram_links)))),
            Some(date(2024, 9, 1)),
            &sheep(),
        );
        assert_eq!(assessment.block, Some(MatingBlock::Inbreeding));
        assert_eq!(
            assessment.verdict.map(|v| v.category),
            Some(Relationship::InconsistentPedigree)
        );
    }

    #[test]
    fn test_unknown_relationship_only_warns() {
        let (dam, ram) = (AnimalId::Num(1), AnimalId::Num(2));
        let assessment = assess_mating(
            Lineage::new(&dam, None),
            Some(Mate::Herd(Lineage::new(&ram, None))),
            None,
            &sheep(),
        );
        assert!(!assessment.is_blocked());
        assert_eq!(assessment.verdict.map(|v| v.category), Some(Relationship::Unknown));
        assert_eq!(assessment.due_date, None);
    }

    #[test]
    fn test_hatching_service_has_no_due_date() {
        let hen = AnimalId::Num(1);
        let config = LifecycleConfig {
            reproduction_type: ReproductionType::Hatching,
            ..LifecycleConfig::default()
        };
        let assessment = assess_mating(
            Lineage::new(&hen, None),
            Some(Mate::External),
            Some(date(2024, 4, 1)),
            &config,
        );
        assert_eq!(assessment.due_date, None);
    }
}

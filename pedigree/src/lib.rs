//! Herdbook Pedigree Core
//!
//! Breeding-eligibility dates and inbreeding checks over livestock records
//! fetched from the farm records API. Everything here is pure: records and
//! lifecycle configuration come in as values, verdicts and dates go out.

pub mod ids;
pub mod components;
pub mod lifecycle;
pub mod checks;
pub mod records;
pub mod herd;

pub use components::*;
pub use ids::AnimalId;
pub use lifecycle::{LifecycleConfig, MaturityDays, ReproductionType};
pub use checks::{
    assess_mating, evaluate, evaluate_mate, latest_eligible_birth_date, projected_due_date, Mate,
    MatingAssessment, Relationship, RelationshipVerdict,
};
pub use herd::{Candidate, Herd, ParentQuery};
pub use records::RecordError;

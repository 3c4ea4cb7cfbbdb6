//! Breeding checks - pure functions over fetched records
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod maturity;
pub mod relationship;
pub mod mating;

pub use maturity::{
    age_in_days, is_breeding_eligible, latest_eligible_birth_date, projected_due_date,
    projected_hatch_date,
};
pub use relationship::{
    evaluate, evaluate_mate, Mate, Relationship, RelationshipVerdict, SharedParent,
};
pub use mating::{assess_mating, MatingAssessment, MatingBlock};

//! Pedigree Relationship
//!
//! Classifies how a candidate mate or parent is related to a subject animal,
//! from whatever parent links the records carry. Missing data degrades the
//! verdict to `Unknown` or `Unrelated`; it is never an error.

use serde::Serialize;
use tracing::trace;

use crate::components::{Lineage, ParentLinks};

/// Risk level at which a pairing must not be submitted
const BLOCKING_RISK: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Relationship {
    Unrelated,
    Sibling,
    /// The candidate is the subject's sire or dam
    ParentOfSubject,
    /// The subject is the candidate's sire or dam
    ChildOfSubject,
    /// Not enough parentage data to say
    Unknown,
    /// Each animal is recorded as the other's parent
    InconsistentPedigree,
}

impl Relationship {
    pub fn risk_level(&self) -> u8 {
        match self {
            Relationship::Unrelated => 0,
            Relationship::Unknown => 1,
            Relationship::Sibling
            | Relationship::ParentOfSubject
            | Relationship::ChildOfSubject
            | Relationship::InconsistentPedigree => 3,
        }
    }
}

/// Which parent two siblings share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SharedParent {
    Sire,
    Dam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationshipVerdict {
    pub category: Relationship,
    /// 0 (safe) to 3 (block)
    pub risk_level: u8,
    /// Set for `Sibling` verdicts
    pub shared_parent: Option<SharedParent>,
    /// Out-of-herd sire or AI; nothing was compared
    pub external_mate: bool,
}

impl RelationshipVerdict {
    fn of(category: Relationship) -> Self {
        Self {
            category,
            risk_level: category.risk_level(),
            shared_parent: None,
            external_mate: false,
        }
    }

    fn sibling(shared: SharedParent) -> Self {
        Self {
            shared_parent: Some(shared),
            ..Self::of(Relationship::Sibling)
        }
    }

    fn external() -> Self {
        Self {
            external_mate: true,
            ..Self::of(Relationship::Unrelated)
        }
    }

    pub fn blocks_submission(&self) -> bool {
        self.risk_level >= BLOCKING_RISK
    }

    /// Badge title
    pub fn label(&self) -> &'static str {
        if self.external_mate {
            return "External / AI";
        }
        match self.category {
            Relationship::Unrelated => "No Immediate Relation",
            Relationship::Sibling => "Inbreeding Risk: Sibling",
            Relationship::ParentOfSubject | Relationship::ChildOfSubject => {
                "Inbreeding Risk: Parent"
            }
            Relationship::Unknown => "Unknown Relationship",
            Relationship::InconsistentPedigree => "Inbreeding Risk: Pedigree Conflict",
        }
    }

    /// Badge body
    pub fn message(&self) -> String {
        if self.external_mate {
            return "Genetic diversity assumed.".to_string();
        }
        match self.category {
            Relationship::Unrelated => "No shared parents found.".to_string(),
            Relationship::Sibling => {
                let parent = match self.shared_parent {
                    Some(SharedParent::Dam) => "Mother",
                    _ => "Father",
                };
                format!("These animals share a parent ({}).", parent)
            }
            Relationship::ParentOfSubject | Relationship::ChildOfSubject => {
                "Direct parent-child relationship.".to_string()
            }
            Relationship::Unknown => "Parentage data missing.".to_string(),
            Relationship::InconsistentPedigree => {
                "Each animal is recorded as the other's parent.".to_string()
            }
        }
    }
}

/// A mate offered for a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mate<'a> {
    /// An animal with a record in the herd
    Herd(Lineage<'a>),
    /// Out-of-herd sire or artificial insemination
    External,
}

/// Classify `candidate` relative to `subject`.
///
/// First match wins:
/// 1. candidate parentage unavailable → `Unknown`, unless the subject's own
///    links name the candidate as a parent;
/// 2. a shared known sire or dam → `Sibling`;
/// 3. candidate is the subject's sire or dam → `ParentOfSubject`;
/// 4. subject is the candidate's sire or dam → `ChildOfSubject`;
/// 5. otherwise `Unrelated`.
///
/// When both 3 and 4 hold the pedigree is cyclic and the verdict is
/// `InconsistentPedigree`, which blocks like a direct parent link.
pub fn evaluate(subject: Lineage<'_>, candidate: Lineage<'_>) -> RelationshipVerdict {
    let verdict = classify(subject, candidate);
    trace!(
        subject = %subject.id,
        candidate = %candidate.id,
        category = ?verdict.category,
        "evaluated relationship"
    );
    verdict
}

/// `evaluate` for a mate that may come from outside the herd.
pub fn evaluate_mate(subject: Lineage<'_>, mate: Mate<'_>) -> RelationshipVerdict {
    match mate {
        Mate::Herd(candidate) => evaluate(subject, candidate),
        Mate::External => RelationshipVerdict::external(),
    }
}

fn classify(subject: Lineage<'_>, candidate: Lineage<'_>) -> RelationshipVerdict {
    let subject_parents = subject.known_parents();
    let candidate_is_parent = subject_parents.is_some_and(|links| links.contains(candidate.id));

    let Some(candidate_parents) = candidate.known_parents() else {
        return if candidate_is_parent {
            RelationshipVerdict::of(Relationship::ParentOfSubject)
        } else {
            RelationshipVerdict::of(Relationship::Unknown)
        };
    };

    let shared = subject_parents.and_then(|links| shared_parent(links, candidate_parents));
    if let Some(shared) = shared {
        return RelationshipVerdict::sibling(shared);
    }

    let subject_is_parent = candidate_parents.contains(subject.id);

    let category = match (candidate_is_parent, subject_is_parent) {
        (true, true) => Relationship::InconsistentPedigree,
        (true, false) => Relationship::ParentOfSubject,
        (false, true) => Relationship::ChildOfSubject,
        (false, false) => Relationship::Unrelated,
    };
    RelationshipVerdict::of(category)
}

/// Shared parent, comparing known ids only. Two unknown parents are not a match.
fn shared_parent(a: &ParentLinks, b: &ParentLinks) -> Option<SharedParent> {
    let same = |x: &Option<_>, y: &Option<_>| matches!((x, y), (Some(x), Some(y)) if x == y);

    if same(&a.sire, &b.sire) {
        Some(SharedParent::Sire)
    } else if same(&a.dam, &b.dam) {
        Some(SharedParent::Dam)
    } else {
        None
    }
}

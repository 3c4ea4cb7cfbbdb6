//! Animal record components
//!
//! Records are fetched from the farm records API and never written back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::AnimalId;

// ============================================================================
// Sex & Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse the API's `gender` field. Unrecognized values are `None`,
    /// never a guessed default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Lactating,
    Pregnant,
    Sold,
    Slaughtered,
    Dead,
    Other,
}

impl Status {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Status::Active,
            "lactating" => Status::Lactating,
            "pregnant" => Status::Pregnant,
            "sold" | "sale" => Status::Sold,
            "slaughtered" | "slaughter" => Status::Slaughtered,
            "dead" | "death" | "died" => Status::Dead,
            _ => Status::Other,
        }
    }

    /// Animals that can be offered as a parent or mate.
    pub fn is_breeding_available(&self) -> bool {
        matches!(self, Status::Active | Status::Lactating)
    }
}

// ============================================================================
// Lineage
// ============================================================================

/// Known parents of an animal. Either side may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ParentLinks {
    pub sire: Option<AnimalId>,
    pub dam: Option<AnimalId>,
}

impl ParentLinks {
    pub fn new(sire: Option<AnimalId>, dam: Option<AnimalId>) -> Self {
        Self { sire, dam }
    }

    /// No parent is known on either side.
    pub fn is_empty(&self) -> bool {
        self.sire.is_none() && self.dam.is_none()
    }

    /// Whether `id` is the sire or the dam.
    pub fn contains(&self, id: &AnimalId) -> bool {
        self.sire.as_ref() == Some(id) || self.dam.as_ref() == Some(id)
    }
}

/// Borrowed identity + parentage view consumed by the relationship checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lineage<'a> {
    pub id: &'a AnimalId,
    pub parents: Option<&'a ParentLinks>,
}

impl<'a> Lineage<'a> {
    pub fn new(id: &'a AnimalId, parents: Option<&'a ParentLinks>) -> Self {
        Self { id, parents }
    }

    /// Parent links that actually name someone. A links record with both
    /// sides unknown carries no more information than no record at all.
    pub fn known_parents(&self) -> Option<&'a ParentLinks> {
        self.parents.filter(|links| !links.is_empty())
    }
}

// ============================================================================
// Animal
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalRecord {
    pub id: AnimalId,
    /// Display label; not unique across animal types
    pub tag: String,
    pub sex: Option<Sex>,
    pub birth_date: Option<NaiveDate>,
    pub status: Status,
    pub breed_names: Option<String>,
    /// `None` when the source gave no parentage data at all
    pub parents: Option<ParentLinks>,
}

impl AnimalRecord {
    pub fn new(id: AnimalId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            sex: None,
            birth_date: None,
            status: Status::Active,
            breed_names: None,
            parents: None,
        }
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn born(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_parents(mut self, parents: ParentLinks) -> Self {
        self.parents = Some(parents);
        self
    }

    pub fn lineage(&self) -> Lineage<'_> {
        Lineage::new(&self.id, self.parents.as_ref())
    }

    /// `"<tag> (<breeds>)"` as shown in parent pickers
    pub fn label(&self) -> String {
        let breeds = self
            .breed_names
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or("Unknown Breed");
        format!("{} ({})", self.tag, breeds)
    }
}

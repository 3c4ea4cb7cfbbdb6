//! Herd registry - snapshot of fetched records
//!
//! Animals are ECS entities; optional facts (sex, birth date, parentage) are
//! only attached when the source supplied them. The herd is rebuilt from a
//! fresh fetch rather than kept in sync.

use chrono::NaiveDate;
use hecs::{Entity, EntityBuilder, World};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::checks::maturity::latest_eligible_birth_date;
use crate::checks::relationship::{evaluate, RelationshipVerdict};
use crate::components::{AnimalRecord, ParentLinks, Sex, Status};
use crate::ids::AnimalId;
use crate::lifecycle::LifecycleConfig;

#[derive(Debug, Clone)]
struct Tag(String);

#[derive(Debug, Clone, Copy)]
struct BirthDate(NaiveDate);

#[derive(Debug, Clone)]
struct Breeds(String);

pub struct Herd {
    world: World,
    by_id: HashMap<AnimalId, Entity>,
}

impl Herd {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = AnimalRecord>) -> Self {
        let mut herd = Self::new();
        herd.extend(records);
        herd
    }

    /// Add a record, replacing any earlier record with the same id.
    pub fn insert(&mut self, record: AnimalRecord) {
        if let Some(old) = self.by_id.remove(&record.id) {
            // `by_id` only holds live entities
            let despawned = self.world.despawn(old);
            debug_assert!(despawned.is_ok());
        }

        let mut builder = EntityBuilder::new();
        builder.add(record.id.clone()).add(Tag(record.tag)).add(record.status);
        if let Some(sex) = record.sex {
            builder.add(sex);
        }
        if let Some(born) = record.birth_date {
            builder.add(BirthDate(born));
        }
        if let Some(breeds) = record.breed_names {
            builder.add(Breeds(breeds));
        }
        if let Some(parents) = record.parents {
            builder.add(parents);
        }

        let entity = self.world.spawn(builder.build());
        self.by_id.insert(record.id, entity);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = AnimalRecord>) {
        for record in records {
            self.insert(record);
        }
        debug!(animals = self.len(), "herd loaded");
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Reassemble the record for `id`.
    pub fn get(&self, id: &AnimalId) -> Option<AnimalRecord> {
        let entity = *self.by_id.get(id)?;
        let mut query = self.world.query_one::<RecordQuery>(entity).ok()?;
        query.get().map(assemble)
    }

    /// Known parents of `id`; outer `None` when the animal is not in the herd.
    pub fn parents_of(&self, id: &AnimalId) -> Option<Option<ParentLinks>> {
        let entity = *self.by_id.get(id)?;
        let entity_ref = self.world.entity(entity).ok()?;
        Some(entity_ref.get::<&ParentLinks>().map(|links| (*links).clone()))
    }

    /// Animals that may be chosen as a parent, best match first.
    pub fn parent_candidates(&self, query: &ParentQuery<'_>) -> Vec<Candidate> {
        let bound =
            latest_eligible_birth_date(query.child_birth_date, Some(query.sex), query.config);
        let needle = query.search.trim().to_lowercase();

        let mut matches: Vec<AnimalRecord> = Vec::new();
        for (_entity, item) in self.world.query::<RecordQuery>().iter() {
            let (_, tag, status, sex, born, _, _) = item;

            if sex != Some(&query.sex) || !status.is_breeding_available() {
                continue;
            }
            if let Some(bound) = bound {
                match born {
                    Some(born) if born.0 <= bound => {}
                    _ => continue,
                }
            }
            if !needle.is_empty() && !tag.0.to_lowercase().contains(&needle) {
                continue;
            }

            matches.push(assemble(item));
        }

        let mut candidates: Vec<Candidate> = matches
            .into_par_iter()
            .map(|record| {
                let verdict = query
                    .subject
                    .map(|subject| evaluate(subject.lineage(), record.lineage()));
                Candidate {
                    label: record.label(),
                    disabled: query.exclude == Some(&record.id),
                    verdict,
                    birth_date: record.birth_date,
                    tag: record.tag,
                    id: record.id,
                }
            })
            .collect();

        candidates.sort_by(|a, b| a.tag.cmp(&b.tag).then_with(|| a.id.cmp(&b.id)));

        debug!(
            sex = query.sex.as_str(),
            ?bound,
            candidates = candidates.len(),
            "parent candidates"
        );
        candidates
    }
}

impl Default for Herd {
    fn default() -> Self {
        Self::new()
    }
}

type RecordQuery<'q> = (
    &'q AnimalId,
    &'q Tag,
    &'q Status,
    Option<&'q Sex>,
    Option<&'q BirthDate>,
    Option<&'q Breeds>,
    Option<&'q ParentLinks>,
);

fn assemble(
    (id, tag, status, sex, born, breeds, parents): (
        &AnimalId,
        &Tag,
        &Status,
        Option<&Sex>,
        Option<&BirthDate>,
        Option<&Breeds>,
        Option<&ParentLinks>,
    ),
) -> AnimalRecord {
    AnimalRecord {
        id: id.clone(),
        tag: tag.0.clone(),
        sex: sex.copied(),
        birth_date: born.map(|b| b.0),
        status: *status,
        breed_names: breeds.map(|b| b.0.clone()),
        parents: parents.cloned(),
    }
}

// ============================================================================
// Parent search
// ============================================================================

/// Search for a sire or dam of an animal born (or conceived) on
/// `child_birth_date`.
#[derive(Debug, Clone, Copy)]
pub struct ParentQuery<'a> {
    pub sex: Sex,
    pub child_birth_date: Option<NaiveDate>,
    pub config: &'a LifecycleConfig,
    /// Case-insensitive tag fragment; empty matches everything
    pub search: &'a str,
    /// Shown but not selectable (an animal cannot be its own parent)
    pub exclude: Option<&'a AnimalId>,
    /// When set, every candidate is annotated with its relationship to it
    pub subject: Option<&'a AnimalRecord>,
}

impl<'a> ParentQuery<'a> {
    pub fn new(sex: Sex, config: &'a LifecycleConfig) -> Self {
        Self {
            sex,
            child_birth_date: None,
            config,
            search: "",
            exclude: None,
            subject: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: AnimalId,
    pub tag: String,
    pub label: String,
    pub birth_date: Option<NaiveDate>,
    pub disabled: bool,
    pub verdict: Option<RelationshipVerdict>,
}

//! Record import
//!
//! Turns JSON from the farm records API into `AnimalRecord`s and
//! `LifecycleConfig`s. Endpoints disagree on shape (`ID` vs `id`, flat
//! `sire_id` vs nested `sire.id`), so every variant is folded into one
//! canonical form here, before any check runs.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::components::{AnimalRecord, ParentLinks, Sex, Status};
use crate::ids::AnimalId;
use crate::lifecycle::LifecycleConfig;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of animals")]
    NotAList,

    #[error("animal at index {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("animal at index {index} has no usable id")]
    MissingId { index: usize },
}

// ============================================================================
// Animals
// ============================================================================

/// Parse an `/animals` response body.
pub fn parse_animals(json: &str) -> Result<Vec<AnimalRecord>, RecordError> {
    let value: Value = serde_json::from_str(json)?;
    let items = value.as_array().ok_or(RecordError::NotAList)?;

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| animal_from_value(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = records.len(), "parsed animal records");
    Ok(records)
}

/// Convert a single animal object. `index` is only used in errors.
pub fn animal_from_value(index: usize, value: &Value) -> Result<AnimalRecord, RecordError> {
    let obj = value.as_object().ok_or(RecordError::NotAnObject { index })?;

    let id = obj
        .get("ID")
        .and_then(AnimalId::from_json)
        .or_else(|| obj.get("id").and_then(AnimalId::from_json))
        .ok_or(RecordError::MissingId { index })?;

    let tag = match obj.get("tag") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let birth_date = obj.get("dob").and_then(Value::as_str).and_then(|raw| {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            debug!(%id, dob = raw, "ignoring unparsable birth date");
        }
        parsed
    });

    let parents = match obj.get("parents") {
        Some(Value::Object(parents)) => Some(links_from(parents)),
        _ if has_flat_links(obj) => Some(links_from(obj)),
        _ => None,
    };

    Ok(AnimalRecord {
        id,
        tag,
        sex: obj.get("gender").and_then(Value::as_str).and_then(Sex::parse),
        birth_date,
        status: obj
            .get("status")
            .and_then(Value::as_str)
            .map(Status::parse)
            .unwrap_or_default(),
        breed_names: obj
            .get("breed_names")
            .and_then(Value::as_str)
            .map(str::to_string),
        parents,
    })
}

/// `YYYY-MM-DD`, optionally followed by a time part that is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

const LINK_KEYS: [&str; 4] = ["sire_id", "dam_id", "sire", "dam"];

fn has_flat_links(obj: &Map<String, Value>) -> bool {
    LINK_KEYS.iter().any(|key| obj.contains_key(*key))
}

fn links_from(obj: &Map<String, Value>) -> ParentLinks {
    ParentLinks::new(link(obj, "sire_id", "sire"), link(obj, "dam_id", "dam"))
}

/// Flat `<flat>` wins; otherwise nested `<nested>.id`, or `<nested>` itself
/// when it is a bare id.
fn link(obj: &Map<String, Value>, flat: &str, nested: &str) -> Option<AnimalId> {
    obj.get(flat).and_then(AnimalId::from_json).or_else(|| {
        obj.get(nested).and_then(|parent| match parent {
            Value::Object(inner) => inner
                .get("id")
                .or_else(|| inner.get("ID"))
                .and_then(AnimalId::from_json),
            other => AnimalId::from_json(other),
        })
    })
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Parse a lifecycle from an animal type, a breed, an animal's `config`
/// block or a bare `farm_lifecycle` object.
pub fn parse_lifecycle(json: &str) -> Result<LifecycleConfig, RecordError> {
    let value: Value = serde_json::from_str(json)?;
    lifecycle_from_value(value)
}

pub fn lifecycle_from_value(value: Value) -> Result<LifecycleConfig, RecordError> {
    let nested = value
        .get("farm_lifecycle")
        .or_else(|| value.get("config").and_then(|config| config.get("lifecycle")))
        .cloned();
    Ok(serde_json::from_value(nested.unwrap_or(value))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::relationship::{evaluate, Relationship};
    use crate::lifecycle::ReproductionType;

    #[test]
    fn test_parse_flat_and_nested_parents() {
        let json = r#"[
            {"ID": 12, "tag": "D-12", "gender": "female", "dob": "2022-03-04", "status": "active",
             "breed_names": "Saanen", "parents": {"sire_id": "5", "dam_id": null}},
            {"id": "13", "tag": "B-13", "gender": "male", "dob": "2021-01-20T08:00:00",
             "parents": {"sire": {"id": 5, "tag": "S-5"}, "dam": {"id": 7, "tag": "D-7"}}}
        ]"#;

        let records = parse_animals(json).unwrap();
        assert_eq!(records.len(), 2);

        let doe = &records[0];
        assert_eq!(doe.id, AnimalId::Num(12));
        assert_eq!(doe.sex, Some(Sex::Female));
        assert_eq!(doe.birth_date, NaiveDate::from_ymd_opt(2022, 3, 4));
        assert_eq!(doe.label(), "D-12 (Saanen)");
        assert_eq!(doe.parents, Some(ParentLinks::new(Some(AnimalId::Num(5)), None)));

        let buck = &records[1];
        assert_eq!(buck.id, AnimalId::Num(13));
        assert_eq!(buck.birth_date, NaiveDate::from_ymd_opt(2021, 1, 20));
        assert_eq!(
            buck.parents,
            Some(ParentLinks::new(Some(AnimalId::Num(5)), Some(AnimalId::Num(7))))
        );
    }

    #[test]
    fn test_flat_link_wins_over_nested() {
        let value = serde_json::json!({
            "id": 1,
            "parents": {"sire_id": 3, "sire": {"id": 4}, "dam_id": 0, "dam": {"id": 8}}
        });
        let record = animal_from_value(0, &value).unwrap();
        assert_eq!(
            record.parents,
            Some(ParentLinks::new(Some(AnimalId::Num(3)), Some(AnimalId::Num(8))))
        );
    }

    #[test]
    fn test_top_level_links_and_missing_parents() {
        let with_links = serde_json::json!({"id": 1, "sire": 4, "dam": null});
        let record = animal_from_value(0, &with_links).unwrap();
        assert_eq!(record.parents, Some(ParentLinks::new(Some(AnimalId::Num(4)), None)));

        let without = serde_json::json!({"id": 2, "tag": 17, "gender": "steer", "dob": "soon"});
        let record = animal_from_value(0, &without).unwrap();
        assert_eq!(record.parents, None);
        assert_eq!(record.tag, "17");
        assert_eq!(record.sex, None);
        assert_eq!(record.birth_date, None);
        assert_eq!(record.status, Status::Active);
    }

    #[test]
    fn test_negative_text_links_are_unknown_parents() {
        let json = r#"[
            {"id": 1, "parents": {"sire_id": "-1", "dam_id": "-1"}},
            {"id": 2, "parents": {"sire_id": "-1", "dam": {"id": "-0"}}}
        ]"#;

        let records = parse_animals(json).unwrap();
        for record in &records {
            assert_eq!(record.parents, Some(ParentLinks::default()));
        }

        let verdict = evaluate(records[0].lineage(), records[1].lineage());
        assert_ne!(verdict.category, Relationship::Sibling);
        assert_eq!(verdict.category, Relationship::Unknown);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_animals("{"), Err(RecordError::Json(_))));
        assert!(matches!(parse_animals("{}"), Err(RecordError::NotAList)));
        assert!(matches!(parse_animals("[1]"), Err(RecordError::NotAnObject { index: 0 })));
        assert!(matches!(
            parse_animals(r#"[{"id": 1}, {"id": 0, "tag": "x"}]"#),
            Err(RecordError::MissingId { index: 1 })
        ));
    }

    #[test]
    fn test_parse_lifecycle_shapes() {
        let bare = parse_lifecycle(r#"{"type": "hatching", "incubation": 21}"#).unwrap();
        assert_eq!(bare.reproduction_type, ReproductionType::Hatching);
        assert_eq!(bare.incubation_days, 21);

        let animal_type = parse_lifecycle(
            r#"{"id": 3, "farm_lifecycle": {
                "type": "birth", "maturity": {"male": 200, "female": 180}, "gestation": 114
            }}"#,
        )
        .unwrap();
        assert_eq!(animal_type.gestation_days, 114);
        assert_eq!(animal_type.maturity_days.female, 180);

        let animal =
            parse_lifecycle(r#"{"id": 40, "config": {"lifecycle": {"gestation": "150"}}}"#)
                .unwrap();
        assert_eq!(animal.gestation_days, 150);
    }
}

//! Herdbook pedigree demo
//!
//! Loads a herd export (or seeds a random herd) and reports sire candidates
//! and mating checks for a few breeding females.
//!
//! Usage: `herdbook [herd.json] [lifecycle.json]`

use anyhow::{bail, Context};
use chrono::{Days, Local, NaiveDate};
use pedigree::checks::is_breeding_eligible;
use pedigree::records::{parse_animals, parse_lifecycle};
use pedigree::{
    assess_mating, AnimalId, AnimalRecord, Herd, LifecycleConfig, Mate, ParentLinks, ParentQuery,
    Sex,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const SEED_FOUNDERS: u64 = 40;
const SEED_OFFSPRING: u64 = 160;
const DAMS_TO_REPORT: usize = 5;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let today = Local::now().date_naive();

    let (records, config) = match args.as_slice() {
        [] => {
            info!("No herd file given, seeding a random herd...");
            (seed_herd(today), LifecycleConfig::default())
        }
        [herd] => (load_herd(herd)?, LifecycleConfig::default()),
        [herd, lifecycle] => (load_herd(herd)?, load_lifecycle(lifecycle)?),
        _ => bail!("usage: herdbook [herd.json] [lifecycle.json]"),
    };

    let herd = Herd::from_records(records.iter().cloned());
    info!("Herd loaded: {} animals", herd.len());

    let dams: Vec<&AnimalRecord> = records
        .iter()
        .filter(|r| {
            r.sex == Some(Sex::Female)
                && r.status.is_breeding_available()
                && is_breeding_eligible(r.birth_date, r.sex, today, &config)
        })
        .take(DAMS_TO_REPORT)
        .collect();

    if dams.is_empty() {
        warn!("No breeding-eligible dams in herd");
    }

    for dam in dams {
        let query = ParentQuery {
            child_birth_date: Some(today),
            exclude: Some(&dam.id),
            subject: Some(dam),
            ..ParentQuery::new(Sex::Male, &config)
        };
        let candidates = herd.parent_candidates(&query);
        let blocked = candidates
            .iter()
            .filter(|c| c.verdict.is_some_and(|v| v.blocks_submission()))
            .count();
        info!(
            "{}: {} sire candidates, {} blocked for inbreeding",
            dam.label(),
            candidates.len(),
            blocked
        );

        // First safe sire, otherwise an external service
        let sire = candidates
            .iter()
            .find(|c| !c.disabled && !c.verdict.is_some_and(|v| v.blocks_submission()))
            .and_then(|c| herd.get(&c.id));
        let mate = sire
            .as_ref()
            .map(|s| Mate::Herd(s.lineage()))
            .unwrap_or(Mate::External);

        let assessment = assess_mating(dam.lineage(), Some(mate), Some(today), &config);
        let sire_tag = sire.as_ref().map(|s| s.tag.as_str()).unwrap_or("external/AI");
        let verdict = assessment.verdict.map(|v| v.label()).unwrap_or("-");
        match assessment.due_date {
            Some(due) => info!("  service by {} ({}) due {}", sire_tag, verdict, due),
            None => info!("  service by {} ({}), no due date", sire_tag, verdict),
        }
    }

    Ok(())
}

fn load_herd(path: &str) -> anyhow::Result<Vec<AnimalRecord>> {
    let json = fs::read_to_string(path).with_context(|| format!("reading herd file {}", path))?;
    parse_animals(&json).with_context(|| format!("parsing herd file {}", path))
}

fn load_lifecycle(path: &str) -> anyhow::Result<LifecycleConfig> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading lifecycle file {}", path))?;
    parse_lifecycle(&json).with_context(|| format!("parsing lifecycle file {}", path))
}

/// Founders with unknown lineage plus one generation of offspring.
fn seed_herd(today: NaiveDate) -> Vec<AnimalRecord> {
    let mut rng = rand::thread_rng();
    let mut records = Vec::new();
    let mut next_id = 1u64;

    let mut sires = Vec::new();
    let mut dams = Vec::new();
    for _ in 0..SEED_FOUNDERS {
        let n = next_id;
        next_id += 1;
        let id = AnimalId::Num(n);

        let sex = if rng.gen::<bool>() { Sex::Male } else { Sex::Female };
        let age_days: u64 = rng.gen_range(400..2500);
        match sex {
            Sex::Male => sires.push(id.clone()),
            Sex::Female => dams.push(id.clone()),
        }

        records.push(
            AnimalRecord::new(id, format!("F-{}", n))
                .with_sex(sex)
                .born(days_before(today, age_days)),
        );
    }

    for _ in 0..SEED_OFFSPRING {
        let n = next_id;
        next_id += 1;
        let id = AnimalId::Num(n);

        let sex = if rng.gen::<bool>() { Sex::Male } else { Sex::Female };
        let age_days: u64 = rng.gen_range(0..400);
        // Some services were by unrecorded sires
        let sire = if rng.gen_bool(0.2) {
            None
        } else {
            sires.choose(&mut rng).cloned()
        };
        let dam = dams.choose(&mut rng).cloned();

        records.push(
            AnimalRecord::new(id, format!("K-{}", n))
                .with_sex(sex)
                .born(days_before(today, age_days))
                .with_parents(ParentLinks::new(sire, dam)),
        );
    }

    records
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

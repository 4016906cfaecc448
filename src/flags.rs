//! Per-reaction activation flags.
//!
//! A flag vector is always complete: it is either fully determined by a
//! policy or recovered in full from an existing deck (with padding/truncation).
//!
//! | policy               | source                      | result                          |
//! |----------------------|-----------------------------|---------------------------------|
//! | `all-false`          | none                        | every entry `false`             |
//! | `all-true`           | none                        | every entry `true`              |
//! | `match-db-a` / `-b`  | external database           | `true` where a db label matches |
//! | `preserve-existing`  | existing deck section       | leading flag char per line      |
//!
//! Database labels that are absent from the registry are warnings, not
//! errors. An existing deck with too few flag lines is padded with `true`; one
//! with too many is cut from the tail.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::database::ExternalDatabase;
use crate::emit::deck::DeckMarkers;
use crate::registry::{Lookup, ReactionRegistry};
use crate::source::SourceFile;
use crate::{Error, Result, Warning, WarningReport};

pub type FlagVector = Vec<bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlagPolicy {
    AllFalse,
    AllTrue,
    MatchDbA,
    MatchDbB,
    PreserveExisting,
}

/// Inputs a policy may consult. Only the one the policy needs must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagSources<'a> {
    pub db_a: Option<&'a ExternalDatabase>,
    pub db_b: Option<&'a ExternalDatabase>,
    pub existing_deck: Option<&'a SourceFile>,
    pub markers: Option<&'a DeckMarkers>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagOutcome {
    pub flags: FlagVector,
    pub warnings: WarningReport,
}

impl FlagOutcome {
    pub fn active(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

pub fn compute_flags(policy: FlagPolicy, registry: &ReactionRegistry, sources: FlagSources<'_>) -> Result<FlagOutcome> {
    let outcome = match policy {
        FlagPolicy::AllFalse => uniform(registry, false),
        FlagPolicy::AllTrue => uniform(registry, true),
        FlagPolicy::MatchDbA => match_database(registry, required(sources.db_a, "match-db-a", "flags.db_a")?),
        FlagPolicy::MatchDbB => match_database(registry, required(sources.db_b, "match-db-b", "flags.db_b")?),
        FlagPolicy::PreserveExisting => {
            let deck = required(sources.existing_deck, "preserve-existing", "deck.template")?;
            let default_markers = DeckMarkers::default();
            preserve_existing(registry, deck, sources.markers.unwrap_or(&default_markers))?
        }
    };
    tracing::debug!(?policy, active = outcome.active(), total = outcome.flags.len(), "computed flags");
    Ok(outcome)
}

fn required<'a, T>(source: Option<&'a T>, policy: &str, key: &str) -> Result<&'a T> {
    source.ok_or_else(|| Error::Config(format!("policy {policy} needs `{key}` to be configured")))
}

fn uniform(registry: &ReactionRegistry, value: bool) -> FlagOutcome {
    FlagOutcome { flags: vec![value; registry.len()], warnings: WarningReport::new() }
}

fn match_database(registry: &ReactionRegistry, db: &ExternalDatabase) -> FlagOutcome {
    let mut flags = vec![false; registry.len()];
    let mut warnings = WarningReport::new();

    for label in db.unique_labels() {
        match registry.lookup(label) {
            Lookup::Found(index) => flags[index - 1] = true,
            Lookup::Missing => {
                warnings.push(Warning::RegistryLookupMiss { source: db.name.clone(), label: label.to_string() })
            }
        }
    }

    warnings.log_misses(&db.name);
    FlagOutcome { flags, warnings }
}

fn preserve_existing(registry: &ReactionRegistry, deck: &SourceFile, markers: &DeckMarkers) -> Result<FlagOutcome> {
    let section = markers.locate(deck)?;
    let mut flags: FlagVector = deck.lines[section.body()]
        .iter()
        .filter_map(|line| line.chars().next())
        .filter(|c| !c.is_whitespace())
        .map(|c| c.eq_ignore_ascii_case(&'T'))
        .collect();

    let mut warnings = WarningReport::new();
    let wanted = registry.len();
    if flags.len() < wanted {
        let count = wanted - flags.len();
        flags.resize(wanted, true);
        tracing::warn!(count, "existing deck has fewer flags than reactions; defaulting the rest to active");
        warnings.push(Warning::FlagsDefaulted { count });
    } else if flags.len() > wanted {
        let count = flags.len() - wanted;
        flags.truncate(wanted);
        tracing::warn!(count, "existing deck has more flags than reactions; dropping the excess");
        warnings.push(Warning::FlagsDropped { count });
    }

    Ok(FlagOutcome { flags, warnings })
}

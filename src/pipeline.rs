//! One invocation, end to end.
//!
//! ```text
//! catalog files ── Catalog::build ───────┐
//! call-site files ─ call_order::resolve ─┼─▶ ReactionRegistry::assemble
//! special file ──── special_label ───────┘            │
//!                                                     ├─▶ compute_flags ─▶ regenerate_deck
//! databases (loaded once) ────────────────────────────┼─▶ render_linkage (per database)
//!                                                     └─▶ annotate_template (per template)
//! ```
//!
//! Registry construction is all-or-nothing: any error there fails the run.
//! After that, each artifact succeeds or fails on its own; a broken template
//! never stops its siblings from being regenerated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::call_order;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::database::ExternalDatabase;
use crate::emit::{Artifacts, annotate_template, regenerate_deck, render_linkage};
use crate::flags::{FlagPolicy, FlagSources, compute_flags};
use crate::registry::{ReactionRegistry, special_label};
use crate::source::{SourceFile, write_lines};
use crate::{Error, Result, WarningReport};

/// Per-invocation knobs that override or complement the configuration.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Overrides `[flags] policy` when set.
    pub policy: Option<FlagPolicy>,
    pub artifacts: Artifacts,
    /// Assemble everything but write nothing.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { policy: None, artifacts: Artifacts::all(), dry_run: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Deck,
    Linkage,
    Docs,
}

impl ArtifactKind {
    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::Deck => "deck",
            ArtifactKind::Linkage => "linkage",
            ArtifactKind::Docs => "docs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written,
    /// Fully assembled, not written (dry run).
    Assembled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub target: PathBuf,
    pub status: ArtifactStatus,
    /// Short human summary, e.g. `12 clause(s)`.
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub registry: ReactionRegistry,
    pub policy: Option<FlagPolicy>,
    pub active: Option<usize>,
    pub artifacts: Vec<ArtifactOutcome>,
    pub warnings: WarningReport,
}

impl RunOutcome {
    pub fn failed(&self) -> usize {
        self.artifacts.iter().filter(|a| matches!(a.status, ArtifactStatus::Failed(_))).count()
    }
}

/// Read every source file named by the configuration and assemble the registry.
pub fn build_registry(config: &Config) -> Result<ReactionRegistry> {
    let catalog_files = read_all(&config.source.catalog_files)?;
    let call_files = read_all(&config.source.call_files)?;
    let special = SourceFile::read(&config.source.special_file)?;

    let catalog = Catalog::build(&catalog_files)?;
    let calls = call_order::resolve(&call_files);
    ReactionRegistry::assemble(special_label(&special)?, &catalog, &calls)
}

fn read_all(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths.iter().map(|p| SourceFile::read(p)).collect()
}

/// Database snapshots for one run, each loaded at most once.
struct Databases<'c> {
    config: &'c Config,
    loaded: BTreeMap<String, std::result::Result<ExternalDatabase, String>>,
}

impl<'c> Databases<'c> {
    fn new(config: &'c Config) -> Self {
        Self { config, loaded: BTreeMap::new() }
    }

    fn get(&mut self, key: &str) -> Result<&ExternalDatabase> {
        if !self.loaded.contains_key(key) {
            let loaded = self
                .config
                .database(key)
                .and_then(|db| ExternalDatabase::load(key, &db.path, db.format()))
                .map_err(|err| err.to_string());
            self.loaded.insert(key.to_string(), loaded);
        }
        match &self.loaded[key] {
            Ok(db) => Ok(db),
            Err(message) => Err(Error::Config(format!("database '{key}' unavailable: {message}"))),
        }
    }
}

/// Build the registry and regenerate the selected artifacts.
pub fn run(config: &Config, options: RunOptions) -> Result<RunOutcome> {
    let registry = build_registry(config)?;
    tracing::info!(reactions = registry.len(), "reaction registry ready");

    let mut dbs = Databases::new(config);
    let mut outcome = RunOutcome {
        registry,
        policy: None,
        active: None,
        artifacts: Vec::new(),
        warnings: WarningReport::new(),
    };

    if options.artifacts.contains(Artifacts::DECK) {
        run_deck(config, options, &mut dbs, &mut outcome);
    }
    if options.artifacts.contains(Artifacts::LINKAGE) {
        run_linkage(config, options, &mut dbs, &mut outcome);
    }
    if options.artifacts.contains(Artifacts::DOCS) {
        run_docs(config, options, &mut dbs, &mut outcome);
    }

    Ok(outcome)
}

fn run_deck(config: &Config, options: RunOptions, dbs: &mut Databases<'_>, outcome: &mut RunOutcome) {
    let Some(deck) = &config.deck else {
        tracing::debug!("no [deck] section; skipping input deck");
        return;
    };
    let policy = options.policy.unwrap_or(config.flags.policy);
    outcome.policy = Some(policy);

    let result = (|| {
        let template = SourceFile::read(&deck.template)?;
        let key = match policy {
            FlagPolicy::MatchDbA => config.flags.db_a.as_deref(),
            FlagPolicy::MatchDbB => config.flags.db_b.as_deref(),
            _ => None,
        };
        let db = match key {
            Some(k) => Some(dbs.get(k)?),
            None => None,
        };
        let sources = FlagSources {
            db_a: db.filter(|_| policy == FlagPolicy::MatchDbA),
            db_b: db.filter(|_| policy == FlagPolicy::MatchDbB),
            existing_deck: Some(&template),
            markers: Some(&deck.markers),
        };
        let flags = compute_flags(policy, &outcome.registry, sources)?;
        let out = regenerate_deck(&template, &outcome.registry, &flags.flags, &deck.markers)?;
        persist(&deck.output, &out.lines, options.dry_run)?;
        Ok::<_, Error>((flags.warnings, out.active))
    })();

    match result {
        Ok((warnings, active)) => {
            outcome.active = Some(active);
            outcome.warnings.extend(warnings);
            outcome.artifacts.push(success(ArtifactKind::Deck, &deck.output, options, format!("{active} active")));
        }
        Err(err) => outcome.artifacts.push(failure(ArtifactKind::Deck, &deck.output, err)),
    }
}

fn run_linkage(config: &Config, options: RunOptions, dbs: &mut Databases<'_>, outcome: &mut RunOutcome) {
    let linkage = &config.linkage;
    if linkage.databases.len() != linkage.outputs.len() {
        let err = Error::ConfigurationMismatch {
            operation: "linkage",
            inputs: linkage.databases.len(),
            outputs: linkage.outputs.len(),
        };
        outcome.artifacts.push(failure(ArtifactKind::Linkage, &PathBuf::from("[linkage]"), err));
        return;
    }

    for (key, output) in linkage.databases.iter().zip(&linkage.outputs) {
        let result = (|| {
            let target = &config.database(key)?.target;
            let out = render_linkage(dbs.get(key)?, &outcome.registry, target);
            persist(output, &out.lines, options.dry_run)?;
            Ok::<_, Error>(out)
        })();

        match result {
            Ok(out) => {
                outcome.warnings.extend(out.warnings);
                let detail = format!("{} clause(s)", out.clauses);
                outcome.artifacts.push(success(ArtifactKind::Linkage, output, options, detail));
            }
            Err(err) => outcome.artifacts.push(failure(ArtifactKind::Linkage, output, err)),
        }
    }
}

fn run_docs(config: &Config, options: RunOptions, dbs: &mut Databases<'_>, outcome: &mut RunOutcome) {
    let docs = &config.documentation;
    let mismatch = if docs.templates.len() != docs.outputs.len() {
        Some(Error::ConfigurationMismatch {
            operation: "documentation templates",
            inputs: docs.templates.len(),
            outputs: docs.outputs.len(),
        })
    } else if docs.databases.len() != docs.templates.len() {
        Some(Error::ConfigurationMismatch {
            operation: "documentation databases",
            inputs: docs.databases.len(),
            outputs: docs.templates.len(),
        })
    } else {
        None
    };
    if let Some(err) = mismatch {
        outcome.artifacts.push(failure(ArtifactKind::Docs, &PathBuf::from("[documentation]"), err));
        return;
    }

    for ((key, template), output) in docs.databases.iter().zip(&docs.templates).zip(&docs.outputs) {
        let result = (|| {
            let template = SourceFile::read(template)?;
            let out = annotate_template(&template, dbs.get(key)?, &outcome.registry);
            persist(output, &out.lines, options.dry_run)?;
            Ok::<_, Error>(out)
        })();

        match result {
            Ok(out) => {
                outcome.warnings.extend(out.warnings);
                let detail = format!("{} row(s) annotated", out.annotated);
                outcome.artifacts.push(success(ArtifactKind::Docs, output, options, detail));
            }
            Err(err) => outcome.artifacts.push(failure(ArtifactKind::Docs, output, err)),
        }
    }
}

fn persist(path: &Path, lines: &[String], dry_run: bool) -> Result<()> {
    if dry_run {
        tracing::debug!(path = %path.display(), "dry run; not writing");
        return Ok(());
    }
    write_lines(path, lines)
}

fn success(kind: ArtifactKind, target: &Path, options: RunOptions, detail: String) -> ArtifactOutcome {
    let status = if options.dry_run { ArtifactStatus::Assembled } else { ArtifactStatus::Written };
    ArtifactOutcome { kind, target: target.to_path_buf(), status, detail }
}

fn failure(kind: ArtifactKind, target: &Path, err: Error) -> ArtifactOutcome {
    tracing::error!(artifact = kind.name(), target = %target.display(), %err, "artifact not regenerated");
    let status = ArtifactStatus::Failed(err.to_string());
    ArtifactOutcome { kind, target: target.to_path_buf(), status, detail: String::new() }
}

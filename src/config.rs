//! Run configuration.
//!
//! A run is described by one TOML file. Relative paths inside it are resolved
//! against the directory containing the file, so a configuration checked in
//! next to the model sources works from any working directory.
//!
//! ```toml
//! [source]
//! catalog_files = ["src/rxn.f", "src/pchem.f"]
//! call_files = ["src/swchem.f", "src/swbiol.f", "src/swphys.f"]
//! special_file = "src/la_srb.f"
//!
//! [databases.mcm]
//! path = "db/mcm.csv"
//! target = "jmcm"
//!
//! [flags]
//! policy = "match-db-a"
//! db_a = "mcm"
//!
//! [deck]
//! template = "INPUTS/usrinp"
//! output = "INPUTS/usrinp"
//!
//! [linkage]
//! databases = ["mcm"]
//! outputs = ["link/mcm_j.inc"]
//!
//! [documentation]
//! databases = ["mcm"]
//! templates = ["doc/mcm.md"]
//! outputs = ["doc/mcm_indexed.md"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::database::TableFormat;
use crate::emit::DeckMarkers;
use crate::emit::linkage::DEFAULT_TARGET;
use crate::flags::FlagPolicy;
use crate::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "photoreg.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseConfig>,
    #[serde(default)]
    pub flags: FlagConfig,
    pub deck: Option<DeckConfig>,
    #[serde(default)]
    pub linkage: LinkageConfig,
    #[serde(default)]
    pub documentation: DocumentationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub catalog_files: Vec<PathBuf>,
    pub call_files: Vec<PathBuf>,
    pub special_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
    /// Array assigned in this database's linkage include.
    #[serde(default = "default_target")]
    pub target: String,
}

impl DatabaseConfig {
    pub fn format(&self) -> TableFormat {
        TableFormat { separator: self.separator, header_lines: self.header_lines }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagConfig {
    #[serde(default = "default_policy")]
    pub policy: FlagPolicy,
    pub db_a: Option<String>,
    pub db_b: Option<String>,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self { policy: default_policy(), db_a: None, db_b: None }
    }
}

/// Marker settings sit beside the paths, e.g. `count_key = "nj"`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckConfig {
    pub template: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub markers: DeckMarkers,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkageConfig {
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentationConfig {
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub templates: Vec<PathBuf>,
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
}

fn default_separator() -> char {
    TableFormat::default().separator
}

fn default_header_lines() -> usize {
    TableFormat::default().header_lines
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

fn default_policy() -> FlagPolicy {
    FlagPolicy::PreserveExisting
}

impl Config {
    /// Read and parse `path`, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, base).map_err(|err| match err {
            Error::ConfigParse { source, .. } => Error::ConfigParse { path: path.to_path_buf(), source },
            other => other,
        })
    }

    /// Parse TOML text; relative paths are joined onto `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let mut config: Config =
            toml::from_str(text).map_err(|source| Error::ConfigParse { path: PathBuf::new(), source })?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.source.catalog_files.iter_mut().for_each(join);
        self.source.call_files.iter_mut().for_each(join);
        join(&mut self.source.special_file);
        self.databases.values_mut().for_each(|db| join(&mut db.path));
        if let Some(deck) = &mut self.deck {
            join(&mut deck.template);
            join(&mut deck.output);
        }
        self.linkage.outputs.iter_mut().for_each(join);
        self.documentation.templates.iter_mut().for_each(join);
        self.documentation.outputs.iter_mut().for_each(join);
    }

    /// Every database key referenced anywhere must be declared.
    fn validate(&self) -> Result<()> {
        let referenced = self
            .flags
            .db_a
            .iter()
            .chain(self.flags.db_b.iter())
            .chain(self.linkage.databases.iter())
            .chain(self.documentation.databases.iter());
        for key in referenced {
            if !self.databases.contains_key(key) {
                return Err(Error::Config(format!("database '{key}' is referenced but not declared under [databases]")));
            }
        }
        Ok(())
    }

    pub fn database(&self, key: &str) -> Result<&DatabaseConfig> {
        self.databases.get(key).ok_or_else(|| Error::Config(format!("unknown database '{key}'")))
    }
}

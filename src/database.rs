//! External reaction databases.
//!
//! Each external mechanism numbers its photolysis reactions its own way and
//! maps them onto model labels through a small delimited table:
//!
//! ```text
//! # number,label,scaling_factor          <- header_lines skipped
//! 1,O3 -> O2 + O(1D),
//! 2,O3 -> O2 + O(3P),1.0
//! 34,CH3CHO -> CH3 + HCO,0.5
//! 35,CH3CHO -> CH3 + HCO
//! ```
//!
//! Several rows may share a label. A loaded [`ExternalDatabase`] is an
//! immutable snapshot; the pipeline loads each file at most once per run.

use std::path::Path;

use crate::source::SourceFile;
use crate::{Error, Result};

/// How a database file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub separator: char,
    pub header_lines: usize,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self { separator: ',', header_lines: 1 }
    }
}

/// One row of an external database.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalEntry {
    pub number: u32,
    pub label: String,
    /// `None` means no scaling.
    pub scaling: Option<f64>,
}

impl ExternalEntry {
    /// The factor to multiply by, or `None` when it is the identity.
    pub fn effective_scaling(&self) -> Option<f64> {
        self.scaling.filter(|&f| f != 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct ExternalDatabase {
    pub name: String,
    entries: Vec<ExternalEntry>,
}

impl ExternalDatabase {
    pub fn new(name: impl Into<String>, entries: Vec<ExternalEntry>) -> Self {
        Self { name: name.into(), entries }
    }

    pub fn load(name: &str, path: &Path, format: TableFormat) -> Result<Self> {
        let file = SourceFile::read(path)?;
        let db = Self::parse(name, &file, format)?;
        tracing::debug!(database = name, path = %path.display(), entries = db.entries.len(), "loaded database");
        Ok(db)
    }

    pub fn parse(name: &str, file: &SourceFile, format: TableFormat) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, line) in file.lines.iter().enumerate().skip(format.header_lines) {
            if line.trim().is_empty() {
                continue;
            }
            let row = parse_row(line, format.separator)
                .map_err(|message| Error::Database { path: file.path.clone(), line: idx + 1, message })?;
            entries.push(row);
        }
        Ok(Self::new(name, entries))
    }

    pub fn entries(&self) -> &[ExternalEntry] {
        &self.entries
    }

    /// Distinct labels in order of first appearance.
    pub fn unique_labels(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries.iter().map(|e| e.label.as_str()).filter(|label| seen.insert(*label)).collect()
    }

    /// All rows sharing `label`, in file order.
    pub fn entries_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a ExternalEntry> + 'a {
        self.entries.iter().filter(move |e| e.label == label)
    }
}

fn parse_row(line: &str, separator: char) -> std::result::Result<ExternalEntry, String> {
    let mut fields = line.split(separator).map(str::trim);

    let number_field = fields.next().unwrap_or_default();
    let number = number_field.parse::<u32>().map_err(|_| format!("invalid reaction number '{number_field}'"))?;

    let label = match fields.next() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => return Err(format!("missing label for reaction {number}")),
    };

    let scaling = match fields.next() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<f64>().map_err(|_| format!("invalid scaling factor '{raw}'"))?),
    };

    Ok(ExternalEntry { number, label, scaling })
}

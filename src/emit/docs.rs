//! Documentation-table annotation.
//!
//! Documentation templates list an external mechanism's photolysis reactions
//! one row each, keyed by a leading `J(<number>)` anchor. Annotation prefixes
//! each matched row with a fixed-width column holding the anchor and the
//! registry index:
//!
//! ```text
//! J(34) | CH3CHO -> CH3 + HCO | ...
//!   ──▶
//! J(34)    14  J(34) | CH3CHO -> CH3 + HCO | ...
//! ```
//!
//! Only the first not-yet-annotated row for an anchor is touched. Missing
//! rows and unknown labels are reported and skipped.

use std::collections::HashSet;

use crate::database::ExternalDatabase;
use crate::registry::{Lookup, ReactionRegistry};
use crate::source::SourceFile;
use crate::{Warning, WarningReport};

/// Width the anchor is padded to inside the prefix column.
pub const ANCHOR_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocOutput {
    pub lines: Vec<String>,
    pub annotated: usize,
    pub warnings: WarningReport,
}

pub fn anchor_token(number: u32) -> String {
    format!("J({number})")
}

pub fn annotate_template(template: &SourceFile, db: &ExternalDatabase, registry: &ReactionRegistry) -> DocOutput {
    let mut lines = template.lines.clone();
    let mut touched: HashSet<usize> = HashSet::new();
    let mut warnings = WarningReport::new();

    for label in db.unique_labels() {
        let index = match registry.lookup(label) {
            Lookup::Found(index) => index,
            Lookup::Missing => {
                warnings.push(Warning::RegistryLookupMiss { source: db.name.clone(), label: label.to_string() });
                continue;
            }
        };

        for entry in db.entries_for(label) {
            let anchor = anchor_token(entry.number);
            let row = template
                .lines
                .iter()
                .enumerate()
                .find(|(idx, line)| !touched.contains(idx) && line.trim_start().starts_with(&anchor))
                .map(|(idx, _)| idx);

            match row {
                Some(idx) => {
                    lines[idx] = format!("{anchor:<width$}{index:>3}  {}", template.lines[idx], width = ANCHOR_WIDTH);
                    touched.insert(idx);
                }
                None => {
                    tracing::debug!(template = %template.name(), %anchor, "anchor not found");
                    warnings.push(Warning::AnchorNotFound { template: template.name(), anchor });
                }
            }
        }
    }

    warnings.log_misses(&db.name);
    tracing::info!(template = %template.name(), annotated = touched.len(), "annotated documentation table");
    DocOutput { lines, annotated: touched.len(), warnings }
}

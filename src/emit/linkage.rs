//! Linkage-table regeneration.
//!
//! An external mechanism consumes the model's photolysis rates through a
//! generated Fortran include: a `SELECT CASE` on the registry index that copies
//! the rate into every external slot sharing that reaction, scaled where the
//! database says so.
//!
//! ```text
//!       SELECT CASE (ij)
//!       CASE (2)
//! !       NO2 -> NO + O(3P)
//!         jext(4) = jval(ij)
//!       CASE (14)
//! !       CH3CHO -> CH3 + HCO
//!         jext(34) = jval(ij) * 0.5
//!         jext(35) = jval(ij)
//!       END SELECT
//! ```
//!
//! Clauses are ordered by registry index so the output is stable regardless of
//! database row order. Labels unknown to the registry are skipped and
//! reported.

use crate::database::{ExternalDatabase, ExternalEntry};
use crate::registry::{Lookup, ReactionRegistry};
use crate::{Warning, WarningReport};

/// Name of the external array assigned in each clause when none is configured.
pub const DEFAULT_TARGET: &str = "jext";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkageOutput {
    pub lines: Vec<String>,
    pub clauses: usize,
    pub warnings: WarningReport,
}

struct Clause<'a> {
    index: usize,
    label: &'a str,
    entries: Vec<&'a ExternalEntry>,
}

pub fn render_linkage(db: &ExternalDatabase, registry: &ReactionRegistry, target: &str) -> LinkageOutput {
    let mut warnings = WarningReport::new();
    let mut clauses: Vec<Clause<'_>> = Vec::new();

    for label in db.unique_labels() {
        match registry.lookup(label) {
            Lookup::Found(index) => clauses.push(Clause { index, label, entries: db.entries_for(label).collect() }),
            Lookup::Missing => {
                warnings.push(Warning::RegistryLookupMiss { source: db.name.clone(), label: label.to_string() });
            }
        }
    }
    clauses.sort_by_key(|c| c.index);

    let mut lines = vec![
        format!("! Photolysis linkage for {}: {} clause(s), {} registry reaction(s).", db.name, clauses.len(), registry.len()),
        "! Generated by photoreg from the reaction registry. Do not edit.".to_string(),
        "      SELECT CASE (ij)".to_string(),
    ];
    for clause in &clauses {
        lines.push(format!("      CASE ({})", clause.index));
        lines.push(format!("!       {}", clause.label));
        lines.extend(clause.entries.iter().map(|entry| assignment(target, entry)));
    }
    lines.push("      END SELECT".to_string());

    warnings.log_misses(&db.name);
    LinkageOutput { clauses: clauses.len(), lines, warnings }
}

fn assignment(target: &str, entry: &ExternalEntry) -> String {
    match entry.effective_scaling() {
        Some(factor) => format!("        {target}({}) = jval(ij) * {}", entry.number, fortran_real(factor)),
        None => format!("        {target}({}) = jval(ij)", entry.number),
    }
}

/// Display a factor so Fortran reads it as a real literal.
fn fortran_real(value: f64) -> String {
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) || !value.is_finite() { text } else { format!("{text}.0") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(number: u32, label: &str, scaling: Option<f64>) -> ExternalEntry {
        ExternalEntry { number, label: label.into(), scaling }
    }

    #[test]
    fn clauses_follow_registry_index_and_scaling() {
        let registry = ReactionRegistry::from_labels(vec!["A".into(), "B".into(), "C".into()]);
        let db = ExternalDatabase::new("ext", vec![entry(1, "B", Some(1.0)), entry(2, "C", Some(0.5))]);

        let out = render_linkage(&db, &registry, DEFAULT_TARGET);

        assert_eq!(out.clauses, 2);
        assert!(out.warnings.is_empty());
        assert_eq!(
            out.lines[2..].to_vec(),
            [
                "      SELECT CASE (ij)",
                "      CASE (2)",
                "!       B",
                "        jext(1) = jval(ij)",
                "      CASE (3)",
                "!       C",
                "        jext(2) = jval(ij) * 0.5",
                "      END SELECT",
            ]
        );
    }

    #[test]
    fn shared_labels_emit_one_line_per_entry_and_misses_are_reported() {
        let registry = ReactionRegistry::from_labels(vec!["X".into(), "Y".into(), "Z".into()]);
        let db = ExternalDatabase::new(
            "mcm",
            vec![entry(9, "Z", None), entry(3, "Y", Some(2.0)), entry(4, "Q", None), entry(5, "Y", None)],
        );

        let out = render_linkage(&db, &registry, "jmcm");

        assert_eq!(
            out.lines[3..out.lines.len() - 1].to_vec(),
            [
                "      CASE (2)",
                "!       Y",
                "        jmcm(3) = jval(ij) * 2.0",
                "        jmcm(5) = jval(ij)",
                "      CASE (3)",
                "!       Z",
                "        jmcm(9) = jval(ij)",
            ]
        );
        assert_eq!(out.warnings.missing_labels(), ["Q"]);
    }

    #[test]
    fn real_literals_always_carry_a_decimal_point() {
        assert_eq!(fortran_real(2.0), "2.0");
        assert_eq!(fortran_real(0.25), "0.25");
    }
}

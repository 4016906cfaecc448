//! The reaction registry: single source of truth for reaction indices.
//!
//! ```text
//! special-case file ──▶ special label ─┐
//!                                      ├─▶ [special, labels(call₁), labels(call₂), ...]
//! catalog + call sequence ─────────────┘        index = 1-based position
//! ```
//!
//! The registry is assembled once per run and never mutated afterwards. Every
//! artifact derives its numbers from [`ReactionRegistry::lookup`] or from
//! position; no stored index in any input is trusted.
//!
//! ## Invariants
//!
//! - `len() == 1 + Σ labels(name)` over the call sequence, duplicates counted.
//! - Lookup returns the first position of a label.

use std::collections::HashMap;

use crate::call_order::CallSequence;
use crate::catalog::Catalog;
use crate::scan::{LineKind, classify_all};
use crate::source::SourceFile;
use crate::{Error, Result};

/// Outcome of looking a label up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// 1-based canonical index.
    Found(usize),
    Missing,
}

impl Lookup {
    pub fn index(self) -> Option<usize> {
        match self {
            Lookup::Found(index) => Some(index),
            Lookup::Missing => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReactionRegistry {
    labels: Vec<String>,
    first_index: HashMap<String, usize>,
}

impl ReactionRegistry {
    /// Assemble the registry from its three inputs.
    pub fn assemble(special: String, catalog: &Catalog, calls: &CallSequence) -> Result<Self> {
        let mut labels = vec![special];
        for name in calls {
            let subroutine = catalog.labels(name).ok_or_else(|| Error::UnknownSubroutine { name: name.clone() })?;
            labels.extend(subroutine.iter().cloned());
        }
        tracing::debug!(reactions = labels.len(), calls = calls.len(), "assembled reaction registry");
        Ok(Self::from_labels(labels))
    }

    /// Wrap an already-ordered label list.
    pub fn from_labels(labels: Vec<String>) -> Self {
        let mut first_index = HashMap::with_capacity(labels.len());
        for (pos, label) in labels.iter().enumerate() {
            first_index.entry(label.clone()).or_insert(pos + 1);
        }
        Self { labels, first_index }
    }

    pub fn lookup(&self, label: &str) -> Lookup {
        match self.first_index.get(label) {
            Some(&index) => Lookup::Found(index),
            None => Lookup::Missing,
        }
    }

    /// Label at 1-based `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        index.checked_sub(1).and_then(|i| self.labels.get(i)).map(String::as_str)
    }

    /// `(index, label)` pairs in registry order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().enumerate().map(|(pos, label)| (pos + 1, label.as_str()))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The one label not owned by any subroutine: the first label assignment in
/// the special-case file.
pub fn special_label(file: &SourceFile) -> Result<String> {
    classify_all(&file.lines)
        .find_map(|(_, kind)| match kind {
            LineKind::LabelAssign(label) => Some(label),
            _ => None,
        })
        .ok_or_else(|| Error::structural(file.name(), "no jlabel assignment found for the special-case reaction"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_order;

    fn catalog() -> Catalog {
        let rxn = "\
      SUBROUTINE r01(j)
      jlabel(j) = 'O3 -> O2 + O(1D)'
      jlabel(j) = 'O3 -> O2 + O(3P)'
      SUBROUTINE r02(j)
      jlabel(j) = 'NO2 -> NO + O(3P)'
      SUBROUTINE r03(j)
      jlabel(j) = 'NO3 -> NO + O2'
      jlabel(j) = 'NO3 -> NO2 + O(3P)'
      jlabel(j) = 'N2O5 -> NO3 + NO2'
";
        Catalog::build(&[SourceFile::from_text("rxn.f", rxn)]).unwrap()
    }

    #[test]
    fn registry_starts_with_special_then_follows_calls() {
        let calls: CallSequence = vec!["r02".into(), "r01".into()];
        let reg = ReactionRegistry::assemble("O2 -> O + O".into(), &catalog(), &calls).unwrap();

        assert_eq!(reg.labels(), ["O2 -> O + O", "NO2 -> NO + O(3P)", "O3 -> O2 + O(1D)", "O3 -> O2 + O(3P)"]);
        assert_eq!(reg.lookup("O3 -> O2 + O(1D)"), Lookup::Found(3));
        assert_eq!(reg.lookup("o3 -> o2 + o(1d)"), Lookup::Missing);
        assert_eq!(reg.label(1), Some("O2 -> O + O"));
        assert_eq!(reg.label(0), None);
    }

    #[test]
    fn length_counts_repeated_calls() {
        let cat = catalog();
        let calls: CallSequence = vec!["r03".into(), "r01".into(), "r03".into(), "r02".into()];
        let reg = ReactionRegistry::assemble("O2 -> O + O".into(), &cat, &calls).unwrap();

        let expected: usize = 1 + calls.iter().map(|c| cat.labels(c).unwrap().len()).sum::<usize>();
        assert_eq!(reg.len(), expected);
        assert_eq!(reg.len(), 10);
        // Repeated labels resolve to their first position.
        assert_eq!(reg.lookup("N2O5 -> NO3 + NO2"), Lookup::Found(4));
    }

    #[test]
    fn unknown_call_target_fails() {
        let calls: CallSequence = vec!["r01".into(), "r77".into()];
        let err = ReactionRegistry::assemble("X".into(), &catalog(), &calls).unwrap_err();
        assert!(matches!(err, Error::UnknownSubroutine { ref name } if name == "r77"));
    }

    #[test]
    fn special_label_is_first_assignment() {
        let file = SourceFile::from_text(
            "la_srb.f",
            "C jlabel(1) = 'commented'\n      jlabel(1) = 'O2 -> O + O'\n      jlabel(2) = 'later'\n",
        );
        assert_eq!(special_label(&file).unwrap(), "O2 -> O + O");
        assert!(special_label(&SourceFile::from_text("empty.f", "")).is_err());
    }

    #[test]
    fn call_order_drives_registry_order() {
        let sites = vec![
            SourceFile::from_text("swchem1.f", "      CALL r01(j)\n"),
            SourceFile::from_text("swchem2.f", "      CALL r02(j)\n"),
        ];
        let cat = catalog();
        let forward = ReactionRegistry::assemble("S".into(), &cat, &call_order::resolve(&sites)).unwrap();
        let ascending = call_order::resolve_with(&sites, |a, b| call_order::descending_file_name(b, a));
        let reversed = ReactionRegistry::assemble("S".into(), &cat, &ascending).unwrap();

        assert_eq!(forward.label(2), Some("NO2 -> NO + O(3P)"));
        assert_eq!(reversed.label(2), Some("O3 -> O2 + O(1D)"));
        assert_ne!(forward.labels(), reversed.labels());
    }
}

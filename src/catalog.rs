//! Subroutine catalog: which reaction labels each subroutine defines.
//!
//! A catalog file is a sequence of subroutine definitions, each assigning one
//! or more `jlabel(j) = '...'` values. Labels are partitioned into contiguous
//! ranges bounded by consecutive declaration lines:
//!
//! ```text
//! line  3  SUBROUTINE r01(...)   ─┐ range of r01
//! line  9    jlabel(j) = 'A'      │
//! line 14    jlabel(j) = 'B'     ─┘
//! line 20  SUBROUTINE r02(...)   ─┐ range of r02 (runs to end of file)
//! line 27    jlabel(j) = 'C'     ─┘
//! ```
//!
//! Multiple files merge into one namespace. A name declared twice is rejected:
//! silently letting one definition win would shift every index after it.

use std::collections::HashMap;

use crate::scan::{LineKind, classify_all};
use crate::source::SourceFile;
use crate::{Error, Result};

/// One subroutine and its labels in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineRecord {
    pub name: String,
    pub labels: Vec<String>,
}

/// Subroutine name → ordered labels, merged across catalog files.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: HashMap<String, SubroutineRecord>,
    /// Where each subroutine was declared, for collision messages.
    origins: HashMap<String, String>,
}

impl Catalog {
    /// Parse every file and merge the results.
    pub fn build(files: &[SourceFile]) -> Result<Self> {
        let mut catalog = Catalog::default();
        for file in files {
            for record in parse_file(file)? {
                catalog.insert(record, file.name())?;
            }
        }
        tracing::debug!(subroutines = catalog.records.len(), files = files.len(), "built subroutine catalog");
        Ok(catalog)
    }

    fn insert(&mut self, record: SubroutineRecord, origin: String) -> Result<()> {
        if let Some(first) = self.origins.get(&record.name) {
            return Err(Error::DuplicateSubroutine { name: record.name, first: first.clone(), second: origin });
        }
        self.origins.insert(record.name.clone(), origin);
        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    /// Labels for `name` (already lowercased by the scanner).
    pub fn labels(&self, name: &str) -> Option<&[String]> {
        self.records.get(name).map(|r| r.labels.as_slice())
    }

    pub fn get(&self, name: &str) -> Option<&SubroutineRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split one file into its subroutine records.
fn parse_file(file: &SourceFile) -> Result<Vec<SubroutineRecord>> {
    let mut records: Vec<SubroutineRecord> = Vec::new();

    for (idx, kind) in classify_all(&file.lines) {
        match kind {
            LineKind::SubroutineDecl(name) => records.push(SubroutineRecord { name, labels: Vec::new() }),
            LineKind::LabelAssign(label) => match records.last_mut() {
                Some(current) => current.labels.push(label),
                None => {
                    return Err(Error::structural(
                        file.name(),
                        format!("line {}: label '{label}' appears before any SUBROUTINE declaration", idx + 1),
                    ));
                }
            },
            _ => {}
        }
    }

    tracing::debug!(file = %file.name(), subroutines = records.len(), "parsed catalog file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, text: &str) -> SourceFile {
        SourceFile::from_text(name, text)
    }

    const RXN: &str = "\
c  photolysis cross sections
      SUBROUTINE r01(nw,wl,j,sq,jlabel)
      j = j + 1
      jlabel(j) = 'O3 -> O2 + O(1D)'
      j = j + 1
      jlabel(j) = 'O3 -> O2 + O(3P)'
      RETURN
      END

      SUBROUTINE r02(nw,wl,j,sq,jlabel)
      j = j + 1
      jlabel(j) = 'NO2 -> NO + O(3P)'
      END
";

    #[test]
    fn labels_belong_to_nearest_preceding_declaration() {
        let catalog = Catalog::build(&[file("rxn.f", RXN)]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.labels("r01").unwrap(), ["O3 -> O2 + O(1D)", "O3 -> O2 + O(3P)"]);
        assert_eq!(catalog.labels("r02").unwrap(), ["NO2 -> NO + O(3P)"]);
    }

    #[test]
    fn files_merge_into_one_namespace() {
        let other = "      SUBROUTINE pxch2o(j)\n      jlabel(j) = 'CH2O -> H + HCO'\n";
        let catalog = Catalog::build(&[file("rxn.f", RXN), file("pchem.f", other)]).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.labels("pxch2o").unwrap(), ["CH2O -> H + HCO"]);
    }

    #[test]
    fn subroutine_without_labels_is_kept_empty() {
        let catalog = Catalog::build(&[file("a.f", "      SUBROUTINE empty(x)\n      END\n")]).unwrap();
        assert_eq!(catalog.labels("empty").unwrap(), [] as [String; 0]);
    }

    #[test]
    fn label_before_any_declaration_is_structural() {
        let err = Catalog::build(&[file("bad.f", "      jlabel(j) = 'X'\n")]).unwrap_err();
        match err {
            Error::Structural { artifact, message } => {
                assert_eq!(artifact, "bad.f");
                assert!(message.contains("line 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_subroutine_names_are_rejected() {
        let dup = "      SUBROUTINE R01(x)\n      jlabel(j) = 'Z'\n";
        let err = Catalog::build(&[file("rxn.f", RXN), file("dup.f", dup)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateSubroutine { ref name, .. } if name == "r01"));
    }
}

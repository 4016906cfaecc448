//! Call order recovery across dispatch files.
//!
//! The modeled program dispatches its photolysis subroutines from several
//! call-site files. Nothing inside those files says which one runs first: the
//! only ordering signal is the file name, and the files must be processed in
//! strictly descending lexicographic order of their names. Getting this wrong
//! still "works" but silently renumbers every reaction downstream, so the rule
//! is a named comparator ([`descending_file_name`]) rather than an accident of
//! directory listing.
//!
//! Repeated calls are kept: each one contributes its labels to the registry
//! again.

use std::cmp::Ordering;
use std::ffi::OsStr;

use crate::scan::{LineKind, classify_all};
use crate::source::SourceFile;

/// Ordered subroutine names, duplicates permitted.
pub type CallSequence = Vec<String>;

/// Comparator deciding the order in which call-site files are read.
pub type FileOrder = fn(&SourceFile, &SourceFile) -> Ordering;

/// Descending by final path component; full path breaks ties.
pub fn descending_file_name(a: &SourceFile, b: &SourceFile) -> Ordering {
    let name = |f: &SourceFile| f.path.file_name().map(OsStr::to_os_string).unwrap_or_default();
    name(b).cmp(&name(a)).then_with(|| b.path.cmp(&a.path))
}

/// Resolve the call sequence using the standard descending-name order.
pub fn resolve(files: &[SourceFile]) -> CallSequence {
    resolve_with(files, descending_file_name)
}

/// Resolve the call sequence, reading files in the order given by `order`.
pub fn resolve_with(files: &[SourceFile], order: FileOrder) -> CallSequence {
    let mut ordered: Vec<&SourceFile> = files.iter().collect();
    ordered.sort_by(|a, b| order(a, b));

    let mut sequence = CallSequence::new();
    for file in ordered {
        let before = sequence.len();
        sequence.extend(classify_all(&file.lines).filter_map(|(_, kind)| match kind {
            LineKind::Call(name) => Some(name),
            _ => None,
        }));
        tracing::debug!(file = %file.name(), calls = sequence.len() - before, "scanned call-site file");
    }
    sequence
}

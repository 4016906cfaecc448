//! Non-fatal diagnostics.
//!
//! Database/registry drift must never halt artifact generation, but it must
//! never go unreported either. Operations that tolerate a per-label or
//! per-line mismatch push a [`Warning`] into a [`WarningReport`] and keep
//! going; the report travels back to the caller alongside the result.

use std::fmt;

/// One recoverable discrepancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A database label has no registry entry.
    RegistryLookupMiss { source: String, label: String },
    /// The existing deck held fewer flags than the registry; the tail was set active.
    FlagsDefaulted { count: usize },
    /// The existing deck held more flags than the registry; the tail was dropped.
    FlagsDropped { count: usize },
    /// A documentation template has no row for an anchor.
    AnchorNotFound { template: String, anchor: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::RegistryLookupMiss { source, label } => {
                write!(f, "{source}: label '{label}' is not in the reaction registry")
            }
            Warning::FlagsDefaulted { count } => {
                write!(f, "existing deck is short by {count} flag(s); defaulted {count} to active")
            }
            Warning::FlagsDropped { count } => {
                write!(f, "existing deck has {count} extra flag(s); dropped {count} from the end")
            }
            Warning::AnchorNotFound { template, anchor } => write!(f, "{template}: no row starts with {anchor}"),
        }
    }
}

/// Ordered collection of warnings from one operation (or a whole run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningReport {
    warnings: Vec<Warning>,
}

impl WarningReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Append everything from `other`, keeping order.
    pub fn extend(&mut self, other: WarningReport) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    /// Labels that missed the registry, in the order they were reported.
    pub fn missing_labels(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                Warning::RegistryLookupMiss { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Log the aggregate lookup misses for `source` (count first, then each label).
    pub(crate) fn log_misses(&self, source: &str) {
        let missing = self.missing_labels();
        if missing.is_empty() {
            return;
        }
        tracing::warn!(source, count = missing.len(), "labels missing from the reaction registry");
        for label in missing {
            tracing::warn!(source, label, "  not in registry");
        }
    }
}

impl<'a> IntoIterator for &'a WarningReport {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_labels_keeps_report_order() {
        let mut report = WarningReport::new();
        report.push(Warning::RegistryLookupMiss { source: "a".into(), label: "X".into() });
        report.push(Warning::FlagsDefaulted { count: 2 });
        report.push(Warning::RegistryLookupMiss { source: "a".into(), label: "Y".into() });

        assert_eq!(report.missing_labels(), vec!["X", "Y"]);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn flag_warnings_state_the_count() {
        assert!(Warning::FlagsDefaulted { count: 3 }.to_string().contains("defaulted 3"));
        assert!(Warning::FlagsDropped { count: 3 }.to_string().contains("dropped 3"));
    }
}

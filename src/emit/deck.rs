//! Input-deck regeneration.
//!
//! The model's input deck lists every photolysis reaction between two marker
//! lines, one line per reaction with its activation flag:
//!
//! ```text
//! nmj =          2                                  <- count line (trailing field rewritten)
//! ...
//! ===================== Photolysis reactions ====== <- start marker (first line containing text)
//! T  1 O2 -> O + O                                  ─┐
//! F  2 O3 -> O2 + O(1D)                              │ replaced wholesale
//! T  3 O3 -> O2 + O(3P)                             ─┘
//! ================================================= <- end marker (last line with prefix)
//! ```
//!
//! Lines up to and including the start marker, and from the end marker on,
//! are copied through unchanged. Indices in the old body are ignored.

use std::ops::Range;

use serde::Deserialize;

use crate::registry::ReactionRegistry;
use crate::source::SourceFile;
use crate::{Error, Result};

/// Where the reaction section and the active-count field live in a deck.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeckMarkers {
    /// Text contained in the line that opens the reaction section.
    pub start_marker: String,
    /// Prefix of the line that closes the section; the last such line wins.
    pub end_prefix: String,
    /// Leading key of the line carrying the active-reaction count.
    pub count_key: String,
    /// Width of the trailing count field on that line.
    pub count_width: usize,
}

impl Default for DeckMarkers {
    fn default() -> Self {
        Self {
            start_marker: "Photolysis reactions".to_string(),
            end_prefix: "=====".to_string(),
            count_key: "nmj".to_string(),
            count_width: 10,
        }
    }
}

/// Line positions of the two section markers (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckSection {
    pub start: usize,
    pub end: usize,
}

impl DeckSection {
    /// Lines strictly between the markers.
    pub fn body(&self) -> Range<usize> {
        self.start + 1..self.end
    }
}

impl DeckMarkers {
    pub fn locate(&self, deck: &SourceFile) -> Result<DeckSection> {
        let start = deck
            .lines
            .iter()
            .position(|line| line.contains(&self.start_marker))
            .ok_or_else(|| Error::structural(deck.name(), format!("start marker '{}' not found", self.start_marker)))?;

        let end = deck
            .lines
            .iter()
            .enumerate()
            .skip(start + 1)
            .rev()
            .find(|(_, line)| line.starts_with(&self.end_prefix))
            .map(|(idx, _)| idx)
            .ok_or_else(|| {
                Error::structural(deck.name(), format!("no line starting with '{}' after the start marker", self.end_prefix))
            })?;

        Ok(DeckSection { start, end })
    }

    fn count_line(&self, deck: &SourceFile, section: DeckSection) -> Result<usize> {
        deck.lines
            .iter()
            .enumerate()
            .filter(|(idx, _)| !section.body().contains(idx))
            .find(|(_, line)| line.trim_start().starts_with(&self.count_key))
            .map(|(idx, _)| idx)
            .ok_or_else(|| Error::structural(deck.name(), format!("count line '{}' not found", self.count_key)))
    }

    fn rewrite_count(&self, deck: &SourceFile, line: &str, count: usize) -> Result<String> {
        let len = line.chars().count();
        if len < self.count_width {
            return Err(Error::structural(
                deck.name(),
                format!("count line is {len} characters, shorter than the {}-character field", self.count_width),
            ));
        }
        let prefix: String = line.chars().take(len - self.count_width).collect();
        Ok(format!("{prefix}{count:>width$}", width = self.count_width))
    }
}

/// A regenerated deck, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOutput {
    pub lines: Vec<String>,
    pub active: usize,
}

/// One body line: flag, right-aligned index, label.
pub fn reaction_line(flag: bool, index: usize, label: &str) -> String {
    format!("{}{index:>3} {label}", if flag { 'T' } else { 'F' })
}

pub fn regenerate_deck(
    template: &SourceFile,
    registry: &ReactionRegistry,
    flags: &[bool],
    markers: &DeckMarkers,
) -> Result<DeckOutput> {
    if flags.len() != registry.len() {
        return Err(Error::FlagLength { flags: flags.len(), registry: registry.len() });
    }

    let section = markers.locate(template)?;
    let count_idx = markers.count_line(template, section)?;
    let active = flags.iter().filter(|&&f| f).count();

    let mut lines = template.lines.clone();
    lines[count_idx] = markers.rewrite_count(template, &template.lines[count_idx], active)?;

    let body = registry.entries().zip(flags).map(|((index, label), &flag)| reaction_line(flag, index, label));
    lines.splice(section.body(), body);

    tracing::debug!(deck = %template.name(), reactions = registry.len(), active, "regenerated input deck");
    Ok(DeckOutput { lines, active })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{FlagPolicy, FlagSources, compute_flags};
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = "\
TUV input
nmj =          0
===================== Photolysis reactions =====================
T  1 stale entry
F  2 another stale entry
=================================================================
==================================================================
trailer";

    fn registry() -> ReactionRegistry {
        ReactionRegistry::from_labels(vec!["O2 -> O + O".into(), "O3 -> O2 + O(1D)".into(), "NO2 -> NO + O(3P)".into()])
    }

    fn template() -> SourceFile {
        SourceFile::from_text("usrinp", TEMPLATE)
    }

    #[test]
    fn body_and_count_are_rewritten() {
        let out = regenerate_deck(&template(), &registry(), &[true, false, true], &DeckMarkers::default()).unwrap();

        let expected = [
            "TUV input",
            "nmj =          2",
            "===================== Photolysis reactions =====================",
            "T  1 O2 -> O + O",
            "F  2 O3 -> O2 + O(1D)",
            "T  3 NO2 -> NO + O(3P)",
            "==================================================================",
            "trailer",
        ];
        assert_eq!(out.lines, expected);
        assert_eq!(out.active, 2);
    }

    #[test]
    fn end_marker_is_the_last_matching_line() {
        let section = DeckMarkers::default().locate(&template()).unwrap();
        assert_eq!(section, DeckSection { start: 2, end: 6 });
    }

    #[test]
    fn active_count_matches_true_flags() {
        let patterns: [&[bool]; 4] =
            [&[false, false, false], &[true, true, true], &[false, true, false], &[true, false, true]];
        for flags in patterns {
            let out = regenerate_deck(&template(), &registry(), flags, &DeckMarkers::default()).unwrap();
            let expected = flags.iter().filter(|&&f| f).count();
            assert_eq!(out.active, expected);
            assert!(out.lines[1].ends_with(&format!("{expected:>10}")));
        }
    }

    #[test]
    fn preserved_flags_round_trip_byte_identically() {
        let reg = registry();
        let markers = DeckMarkers::default();
        let first = regenerate_deck(&template(), &reg, &[false, true, false], &markers).unwrap();
        let first_file = SourceFile::from_text("usrinp", &first.lines.join("\n"));

        let sources = FlagSources { existing_deck: Some(&first_file), markers: Some(&markers), ..Default::default() };
        let flags = compute_flags(FlagPolicy::PreserveExisting, &reg, sources).unwrap();
        assert!(flags.warnings.is_empty());

        let second = regenerate_deck(&first_file, &reg, &flags.flags, &markers).unwrap();
        assert_eq!(second.lines, first.lines);
    }

    #[test]
    fn missing_markers_or_count_line_are_structural() {
        let reg = registry();
        let flags = [true; 3];
        let markers = DeckMarkers::default();

        let no_start = SourceFile::from_text("a", "nmj =          0\n=====\n");
        assert!(matches!(regenerate_deck(&no_start, &reg, &flags, &markers), Err(Error::Structural { .. })));

        let no_end = SourceFile::from_text("b", "nmj =          0\nPhotolysis reactions\nT  1 x\n");
        assert!(matches!(regenerate_deck(&no_end, &reg, &flags, &markers), Err(Error::Structural { .. })));

        let no_count = SourceFile::from_text("c", "Photolysis reactions\n=====\n");
        assert!(matches!(regenerate_deck(&no_count, &reg, &flags, &markers), Err(Error::Structural { .. })));

        let short_count = SourceFile::from_text("d", "nmj=0\nPhotolysis reactions\n=====\n");
        assert!(matches!(regenerate_deck(&short_count, &reg, &flags, &markers), Err(Error::Structural { .. })));
    }

    #[test]
    fn flag_length_must_match_registry() {
        let err = regenerate_deck(&template(), &registry(), &[true], &DeckMarkers::default()).unwrap_err();
        assert!(matches!(err, Error::FlagLength { flags: 1, registry: 3 }));
    }
}

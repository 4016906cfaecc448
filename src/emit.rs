//! Cross-reference emitters.
//!
//! Every artifact that mentions a reaction index is regenerated from the
//! [`ReactionRegistry`](crate::ReactionRegistry) rather than patched:
//!
//! ```text
//!                      ┌─▶ deck::regenerate_deck       input deck (flags + count)
//! registry (+ flags) ──┼─▶ linkage::render_linkage     Fortran dispatch include per database
//!                      └─▶ docs::annotate_template     documentation rows per database
//! ```
//!
//! All three are pure functions from in-memory lines to in-memory lines. They
//! never write; the pipeline persists each artifact once, after it has been
//! fully assembled.
//!
//! ## Shared rules
//!
//! - Indices come from registry position only; any index already present in an
//!   input is ignored.
//! - A label that misses the registry is a [`Warning`](crate::Warning), never
//!   an error.
//! - A missing structural marker is an [`Error`](crate::Error) for that
//!   artifact only.

#[path = "emit/deck.rs"]
pub mod deck;
#[path = "emit/docs.rs"]
pub mod docs;
#[path = "emit/linkage.rs"]
pub mod linkage;

pub use deck::{DeckMarkers, DeckOutput, DeckSection, regenerate_deck};
pub use docs::{DocOutput, annotate_template};
pub use linkage::{LinkageOutput, render_linkage};

bitflags::bitflags! {
    /// Which artifact classes a run regenerates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Artifacts: u8 {
        const DECK    = 1 << 0;
        const LINKAGE = 1 << 1;
        const DOCS    = 1 << 2;
    }
}

impl Artifacts {
    /// Parse a comma-separated list such as `deck,docs`.
    pub fn parse_list(list: &str) -> Result<Self, String> {
        list.split(',').map(str::trim).filter(|s| !s.is_empty()).try_fold(Artifacts::empty(), |acc, name| {
            let bit = match name.to_ascii_lowercase().as_str() {
                "deck" => Artifacts::DECK,
                "linkage" => Artifacts::LINKAGE,
                "docs" => Artifacts::DOCS,
                "all" => Artifacts::all(),
                other => return Err(format!("unknown artifact '{other}' (expected deck, linkage, docs or all)")),
            };
            Ok(acc | bit)
        })
    }
}

impl Default for Artifacts {
    fn default() -> Self {
        Artifacts::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_lists_parse() {
        assert_eq!(Artifacts::parse_list("deck, docs").unwrap(), Artifacts::DECK | Artifacts::DOCS);
        assert_eq!(Artifacts::parse_list("all").unwrap(), Artifacts::all());
        assert!(Artifacts::parse_list("deck,tables").is_err());
    }
}

//! Canonical photolysis-reaction registry for a radiation-transfer model.
//!
//! The model's Fortran sources define photolysis reactions inside subroutines
//! (`jlabel(j) = '...'`) and dispatch those subroutines from several call-site
//! files. This crate recovers the resulting reaction order, numbers it, and
//! regenerates every artifact that depends on those numbers so they can never
//! disagree:
//!
//! - the model input deck (per-reaction activation flags + active count),
//! - linkage includes for external mechanisms (index dispatch with scaling),
//! - documentation tables (rows annotated with registry indices).
//!
//! # Example
//! ```
//! use photoreg::{Catalog, ReactionRegistry, SourceFile, call_order};
//!
//! let rxn = SourceFile::from_text("rxn.f", "      SUBROUTINE r01(j)\n      jlabel(j) = 'O3 -> O2 + O(1D)'\n");
//! let sw = SourceFile::from_text("swchem.f", "      CALL r01(j)\n");
//!
//! let catalog = Catalog::build(&[rxn]).unwrap();
//! let calls = call_order::resolve(&[sw]);
//! let registry = ReactionRegistry::assemble("O2 -> O + O".into(), &catalog, &calls).unwrap();
//!
//! assert_eq!(registry.labels(), ["O2 -> O + O", "O3 -> O2 + O(1D)"]);
//! ```

#[macro_use]
mod macros;

pub mod call_order;
pub mod catalog;
pub mod config;
pub mod database;
pub mod emit;
mod error;
pub mod flags;
pub mod pipeline;
pub mod registry;
mod report;
pub mod scan;
pub mod source;

pub use catalog::{Catalog, SubroutineRecord};
pub use config::Config;
pub use database::{ExternalDatabase, ExternalEntry, TableFormat};
pub use emit::Artifacts;
pub use error::{Error, Result};
pub use flags::{FlagOutcome, FlagPolicy, FlagSources, FlagVector, compute_flags};
pub use pipeline::{ArtifactKind, ArtifactOutcome, ArtifactStatus, RunOptions, RunOutcome, build_registry, run};
pub use registry::{Lookup, ReactionRegistry};
pub use report::{Warning, WarningReport};
pub use source::SourceFile;

//! Fatal error types.
//!
//! Anything in here stops the current unit of work: registry construction as a
//! whole, or a single artifact during regeneration. Recoverable drift between
//! databases and the registry is reported through [`crate::Warning`] instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A source, database or artifact could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("invalid configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration parsed but refers to something that does not exist.
    #[error("configuration error: {0}")]
    Config(String),

    /// A database row could not be parsed.
    #[error("{}:{line}: {message}", path.display())]
    Database { path: PathBuf, line: usize, message: String },

    /// A required marker, declaration or label line is missing.
    #[error("structural parse failure in {artifact}: {message}")]
    Structural { artifact: String, message: String },

    /// Two catalog entries declare the same subroutine.
    #[error("subroutine '{name}' declared in both {first} and {second}")]
    DuplicateSubroutine { name: String, first: String, second: String },

    /// The call sequence names a subroutine the catalog does not define.
    #[error("call to subroutine '{name}' has no catalog entry")]
    UnknownSubroutine { name: String },

    /// Declared inputs and outputs of an operation do not pair up.
    #[error("{operation}: {inputs} input(s) declared but {outputs} output(s)")]
    ConfigurationMismatch { operation: &'static str, inputs: usize, outputs: usize },

    /// A flag vector was handed to an emitter for a registry of another size.
    #[error("flag vector has {flags} entries but the registry has {registry}")]
    FlagLength { flags: usize, registry: usize },
}

impl Error {
    pub(crate) fn structural(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Structural { artifact: artifact.into(), message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

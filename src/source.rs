//! Reading and writing whole text files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A text file loaded into memory as ordered lines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Load `path`, splitting on `\n` and dropping any trailing `\r`.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        Ok(Self::from_text(path, &text))
    }

    /// Build from in-memory text (used by tests and by callers that already hold the contents).
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let lines = text.lines().map(str::to_string).collect();
        Self { path: path.into(), lines }
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write `lines` to `path` in one go, newline-terminated.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut text = lines.join("\n");
    text.push('\n');
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
    }
    fs::write(path, text).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), lines = lines.len(), "wrote artifact");
    Ok(())
}

//! Line classification for Fortran model sources.
//!
//! Every parser in this crate works line by line over a source file and only
//! cares about a handful of structural lines. Rather than scattering pattern
//! checks through the catalog, call-order and special-label code, each line is
//! classified exactly once into a [`LineKind`] that already carries the token
//! the caller needs.
//!
//! ## Recognized categories
//!
//! ```text
//! C     CALL r02(nw,wl,...)        -> Comment         (fixed-form comment)
//!       SUBROUTINE r02(nw,wl,...)  -> SubroutineDecl  "r02"
//!       jlabel(j) = 'O3 -> O2 + O(1D)'
//!                                  -> LabelAssign     "O3 -> O2 + O(1D)"
//!       CALL r02(nw,wl,...)        -> Call            "r02"
//!       j = j + 1                  -> Other
//! ```
//!
//! Keywords are matched case-insensitively. Subroutine and call names are
//! lowercased because Fortran identifiers are case-insensitive; labels are
//! returned verbatim because they are case-sensitive registry keys.
//!
//! ## Design notes
//!
//! - Comment detection runs first so a commented-out `CALL` never leaks into
//!   the call sequence.
//! - A fixed-form comment is a `c`/`C` in column one followed by something
//!   that cannot continue an identifier. This keeps free-form `call r01` and
//!   `character*50 ...` lines out of the comment bucket.

/// The category of a single source line, with its extracted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Comment,
    /// `SUBROUTINE <name>(...)`; name lowercased.
    SubroutineDecl(String),
    /// `jlabel(...) = '<label>'`; label verbatim.
    LabelAssign(String),
    /// `CALL <name>`; name lowercased.
    Call(String),
    Other,
}

/// Classify one line.
pub fn classify(line: &str) -> LineKind {
    if is_comment(line) {
        return LineKind::Comment;
    }

    if let Some(name) = subroutine_name(line) {
        return LineKind::SubroutineDecl(name);
    }

    if let Some(label) = label_value(line) {
        return LineKind::LabelAssign(label);
    }

    if let Some(target) = call_target(line) {
        return LineKind::Call(target);
    }

    LineKind::Other
}

/// Classify every line of a file, pairing each with its 0-based line number.
pub fn classify_all(lines: &[String]) -> impl Iterator<Item = (usize, LineKind)> + '_ {
    lines.iter().enumerate().map(|(idx, line)| (idx, classify(line)))
}

fn is_comment(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some('!') | Some('*') => return true,
        Some('c') | Some('C') => {
            if chars.next().is_none_or(|next| !(next.is_ascii_alphanumeric() || next == '_')) {
                return true;
            }
        }
        _ => {}
    }
    line.trim_start().starts_with('!')
}

/// Text between the `SUBROUTINE` keyword and the next `(`.
fn subroutine_name(line: &str) -> Option<String> {
    let caps = regex!(ci r"^\s*(?:(?:recursive|pure|elemental)\s+)*subroutine\s+([^(]+)\(").captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// First quoted substring on a `jlabel(...) = ...` assignment.
fn label_value(line: &str) -> Option<String> {
    let assign = regex!(ci r"^\s*jlabel\s*\([^)]*\)\s*=").find(line)?;
    let rest = &line[assign.end()..];
    let caps = regex!(r#"'([^']*)'|"([^"]*)""#).captures(rest)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
}

/// First whitespace-delimited token after `CALL`, cut at any `(`.
fn call_target(line: &str) -> Option<String> {
    let caps = regex!(ci r"^\s*(?:\d+\s+)?call\s+(\S+)").captures(line)?;
    let token = caps.get(1)?.as_str();
    let name = token.split('(').next().unwrap_or(token).trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

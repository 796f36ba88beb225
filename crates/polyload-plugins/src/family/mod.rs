//! Execution families and the language-tag classifier.
//!
//! A descriptor's language tag decides how the plugin runs. Tags are compared
//! case-insensitively; anything not listed here is [`Family::Unrecognized`]
//! and is skipped by every builder without a log entry, so catalogs can carry
//! languages a newer host understands.

use serde::Serialize;

/// Execution model of a plugin.
///
/// # Example
///
/// ```
/// use polyload_plugins::{Family, classify};
///
/// assert_eq!(classify("Python"), Family::Interpreted);
/// assert_eq!(classify("cobol"), Family::Unrecognized);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// A dynamic library loaded into the host process.
    Native,
    /// A script run by the external interpreter.
    Interpreted,
    /// A standalone executable run as a child process.
    Executable,
    /// A tag this host does not know how to run.
    Unrecognized,
}

const NATIVE_TAGS: &[&str] = &["rust", "native", "cdylib"];
const INTERPRETED_TAGS: &[&str] = &["python"];
const EXECUTABLE_TAGS: &[&str] = &["executable"];

impl Family {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Interpreted => "interpreted",
            Self::Executable => "executable",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Returns `true` for every family a builder handles.
    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a declared language tag onto its execution family.
#[must_use]
pub fn classify(tag: &str) -> Family {
    let trimmed = tag.trim();
    let matches = |tags: &[&str]| tags.iter().any(|known| known.eq_ignore_ascii_case(trimmed));
    if matches(NATIVE_TAGS) {
        Family::Native
    } else if matches(INTERPRETED_TAGS) {
        Family::Interpreted
    } else if matches(EXECUTABLE_TAGS) {
        Family::Executable
    } else {
        Family::Unrecognized
    }
}

#[cfg(test)]
mod tests;

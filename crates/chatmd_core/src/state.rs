use std::collections::HashSet;
use std::fmt;

use crate::filename::{document_filename, numbered_filename};

/// Author used until some message names one.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Why a message record produced no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No body element, or a body with only whitespace text.
    EmptyBody,
    /// The converted body had no line that normalizes to a title.
    NoTitle,
    /// An earlier message in this run already claimed the filename.
    DuplicateFilename,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyBody => write!(f, "empty body"),
            SkipReason::NoTitle => write!(f, "no title"),
            SkipReason::DuplicateFilename => write!(f, "duplicate filename"),
        }
    }
}

/// What to do when a title maps to a filename already written in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// First message wins; later ones are dropped.
    #[default]
    Skip,
    /// Later messages are kept as `{title}_{n}.{ext}`.
    Number,
}

/// Filenames emitted so far. Only ever grows during a run.
#[derive(Debug, Default, Clone)]
pub struct FilenameRegistry {
    used: HashSet<String>,
}

impl FilenameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a filename for `title` under `policy`. Returns `None` when the
    /// policy drops the message.
    pub fn claim(
        &mut self,
        title: &str,
        extension: &str,
        policy: DuplicatePolicy,
    ) -> Option<String> {
        let filename = document_filename(title, extension);
        if self.used.insert(filename.clone()) {
            return Some(filename);
        }
        match policy {
            DuplicatePolicy::Skip => None,
            DuplicatePolicy::Number => {
                let numbered = (1..)
                    .map(|n| numbered_filename(title, &format!("_{n}"), extension))
                    .find(|candidate| !self.used.contains(candidate))?;
                self.used.insert(numbered.clone());
                Some(numbered)
            }
        }
    }
}

/// Most recent explicit author, carried to messages that omit one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAuthor(String);

impl Default for LastAuthor {
    fn default() -> Self {
        Self(UNKNOWN_AUTHOR.to_string())
    }
}

impl LastAuthor {
    /// Resolve the author for a record. A non-blank explicit author becomes
    /// the new carried value.
    pub fn resolve(&mut self, explicit: Option<&str>) -> String {
        if let Some(name) = explicit.map(str::trim).filter(|name| !name.is_empty()) {
            self.0 = name.to_string();
        }
        self.0.clone()
    }
}

/// Order-dependent state for one export run.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub filenames: FilenameRegistry,
    pub last_author: LastAuthor,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn author_carries_forward() {
        let mut last = LastAuthor::default();
        assert_eq!(last.resolve(None), UNKNOWN_AUTHOR);
        assert_eq!(last.resolve(Some("Alice")), "Alice");
        assert_eq!(last.resolve(None), "Alice");
        assert_eq!(last.resolve(Some("   ")), "Alice");
        assert_eq!(last.resolve(Some("Bob")), "Bob");
        assert_eq!(last.resolve(None), "Bob");
    }

    #[test]
    fn skip_policy_keeps_first() {
        let mut registry = FilenameRegistry::new();
        assert_eq!(
            registry.claim("Same", "md", DuplicatePolicy::Skip).as_deref(),
            Some("Same.md")
        );
        assert_eq!(registry.claim("Same", "md", DuplicatePolicy::Skip), None);
        assert_eq!(
            registry.claim("Other", "md", DuplicatePolicy::Skip).as_deref(),
            Some("Other.md")
        );
    }

    #[test]
    fn number_policy_finds_next_free_suffix() {
        let mut registry = FilenameRegistry::new();
        registry.claim("Note_1", "md", DuplicatePolicy::Number);
        registry.claim("Note", "md", DuplicatePolicy::Number);
        assert_eq!(
            registry.claim("Note", "md", DuplicatePolicy::Number).as_deref(),
            Some("Note_2.md")
        );
        assert_eq!(
            registry.claim("Note", "md", DuplicatePolicy::Number).as_deref(),
            Some("Note_3.md")
        );
        assert_eq!(registry.claim("Note_1", "md", DuplicatePolicy::Skip), None);
    }
}

//! Typed identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A task identifier - a deterministic slug of the task name.
///
/// Changing a task's name changes its id, which is why renames flow through
/// the rename machinery (file move + in-place index replacement) rather than
/// a plain metadata update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Derive the id for a task name.
    ///
    /// Lowercases, keeps alphanumeric runs and joins them with single
    /// hyphens, so "Fix the  Login Bug!" becomes "fix-the-login-bug".
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_sep = false;
        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_sep && !slug.is_empty() {
                    slug.push('-');
                }
                pending_sep = false;
                for lower in c.to_lowercase() {
                    slug.push(lower);
                }
            } else {
                pending_sep = true;
            }
        }
        Self(slug)
    }

    /// Wrap an already-normalised id string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Normalise user input: trim whitespace and strip a trailing `.md`
    pub fn normalise(input: &str) -> Self {
        let trimmed = input.trim();
        let stripped = trimmed.strip_suffix(".md").unwrap_or(trimmed);
        Self(stripped.to_string())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_name() {
        assert_eq!(TaskId::from_name("Fix the Login Bug").as_str(), "fix-the-login-bug");
        assert_eq!(TaskId::from_name("Fix the  Login Bug!").as_str(), "fix-the-login-bug");
        assert_eq!(TaskId::from_name("  Spaced  ").as_str(), "spaced");
        assert_eq!(TaskId::from_name("v2.0 release").as_str(), "v2-0-release");
    }

    #[test]
    fn test_slug_is_deterministic() {
        assert_eq!(TaskId::from_name("Same Name"), TaskId::from_name("Same Name"));
    }

    #[test]
    fn test_normalise_strips_md_suffix() {
        assert_eq!(TaskId::normalise("fix-the-bug.md").as_str(), "fix-the-bug");
        assert_eq!(TaskId::normalise(" fix-the-bug "), TaskId::from_string("fix-the-bug"));
        // Only a trailing extension is stripped
        assert_eq!(TaskId::normalise("fix-the-md-parser").as_str(), "fix-the-md-parser");
    }

    #[test]
    fn test_display_round_trip() {
        let id = TaskId::from_name("Some Task");
        assert_eq!(id.to_string(), "some-task");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"some-task\"");
        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

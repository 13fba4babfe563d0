//! Regular expressions declared in mapping configuration

use crate::Result;
use ohno::app_err;
use regex::{Captures, Regex};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The pattern that dimension rules use when no `regex` is configured.
pub const MATCH_ALL_PATTERN: &str = "(.*)";

/// A compiled regular expression together with the text it was compiled from
///
/// Patterns are compiled when configuration is deserialized, so an invalid expression is
/// reported while loading rather than on the first measurement.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern
    ///
    /// # Errors
    /// Returns an error if the expression is not a valid regular expression
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| app_err!("invalid regular expression '{source}': {e}"))?;
        Ok(Self { source, regex })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this pattern is the identity pattern that accepts any value unchanged
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.source == MATCH_ALL_PATTERN
    }

    /// Number of capture groups, not counting the implicit whole-match group
    #[must_use]
    pub fn capture_group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    #[must_use]
    pub fn captures<'h>(&self, haystack: &'h str) -> Option<Captures<'h>> {
        self.regex.captures(haystack)
    }

    /// Like [`captures`](Self::captures), but only accepts a match that begins at the start of `haystack`
    #[must_use]
    pub fn captures_at_start<'h>(&self, haystack: &'h str) -> Option<Captures<'h>> {
        // the leftmost match starts at 0 whenever any match there exists
        self.regex.captures(haystack).filter(|c| c.get(0).is_some_and(|m| m.start() == 0))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        Self::new(source).map_err(D::Error::custom)
    }
}

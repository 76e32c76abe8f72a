//! Conference programme sessions.

use regex::Regex;

use super::{Tag, Tagger};

/// Tags session headings of a conference programme: `Session 3B`,
/// `Keynote`, `Workshop`, `Panel`, `Track 2`, `Tutorial`.
///
/// Sessions are distinct units and are never merged with each other.
pub struct SessionTagger {
    pattern: Regex,
}

impl SessionTagger {
    /// Create the tagger.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(
                r"(?i)\b(?:session\s+(?:\d+[a-z]?|[ivx]+)\b|keynotes?\b|workshops?\b|panels?\b|tutorials?\b|track\s+(?:\d+|[a-z])\b)",
            )
            .unwrap(),
        }
    }
}

impl Default for SessionTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger for SessionTagger {
    fn tag(&self) -> Tag {
        Tag::new("session", "session")
    }

    fn relevance(&self) -> f64 {
        0.8
    }

    fn allows_joining(&self) -> bool {
        false
    }

    fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

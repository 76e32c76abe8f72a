//! Titles of talks, papers and sections.

use regex::Regex;

use crate::area::{AreaId, AreaTree};

use super::{normalized_text, Tag, Tagger};

/// Words that mark programme boilerplate rather than a title.
const BLACKLIST: &[&str] = &[
    "session", "chair", "chairs", "room", "break", "lunch", "coffee", "dinner", "registration",
    "welcome", "closing", "opening", "reception", "poster", "posters",
];

/// Tags title-like text: a capitalised phrase of a few words that is not a
/// sentence and contains no programme boilerplate.
pub struct TitleTagger {
    shape: Regex,
    min_words: usize,
    max_words: usize,
}

impl TitleTagger {
    /// Create the tagger.
    pub fn new() -> Self {
        Self {
            shape: Regex::new(r"^[\p{Lu}\d][^\n]*[^.;,\s]$").unwrap(),
            min_words: 3,
            max_words: 20,
        }
    }

    /// Set the minimum number of words.
    pub fn with_min_words(mut self, words: usize) -> Self {
        self.min_words = words;
        self
    }

    fn blacklisted(text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| BLACKLIST.contains(&w.to_lowercase().as_str()))
    }
}

impl Default for TitleTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger for TitleTagger {
    fn tag(&self) -> Tag {
        Tag::new("title", "title")
    }

    fn relevance(&self) -> f64 {
        0.6
    }

    /// A lowercase line that does not end a sentence may continue a title
    /// broken over several lines.
    fn allows_continuation(&self, tree: &AreaTree, id: AreaId) -> bool {
        let text = normalized_text(tree, id);
        let text = text.trim();
        text.chars().next().is_some_and(|c| c.is_lowercase())
            && !text.ends_with('.')
            && text.split_whitespace().count() <= self.max_words
            && !Self::blacklisted(text)
    }

    fn may_coexist_with(&self, other: &Tag) -> bool {
        other.name() != "session"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        let words = text.split_whitespace().count();
        if words < self.min_words || words > self.max_words {
            return Vec::new();
        }
        if !self.shape.is_match(text) || Self::blacklisted(text) {
            return Vec::new();
        }
        vec![text.to_string()]
    }
}

//! Semantic tagging of areas.
//!
//! A [`Tagger`] decides whether a leaf area belongs to its category (a time,
//! a date, a title...). [`TreeTagger`] runs every registered tagger over the
//! leaves of an area tree, and [`TagPredictor`] turns tags into
//! probabilities and decides which tagged logical nodes may be merged.

mod date;
mod entity;
mod predictor;
mod registry;
mod session;
mod time;
mod title;
mod tree_tagger;

pub use date::DateTagger;
pub use entity::{EntityKind, EntitySpan, EntityTagger, NlpClassifier};
pub use predictor::{StyleClassifier, TagPredictor};
pub use registry::TaggerRegistry;
pub use session::SessionTagger;
pub use time::TimeTagger;
pub use title::TitleTagger;
pub use tree_tagger::TreeTagger;

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::area::{AreaId, AreaTree};

/// A semantic category attached to an area.
///
/// Tags compare, hash and order by name only; the source records which
/// tagger produced the tag.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    name: String,
    source: String,
}

impl Tag {
    /// Create a tag produced by `source`.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the producing tagger.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Text of an area subtree in NFC, as taggers see it.
pub fn normalized_text(tree: &AreaTree, id: AreaId) -> String {
    tree.text(id).nfc().collect()
}

/// Decides whether areas belong to one semantic category.
pub trait Tagger: Send + Sync {
    /// The tag this tagger assigns.
    fn tag(&self) -> Tag;

    /// Prior confidence in `(0, 1]`.
    fn relevance(&self) -> f64;

    /// Whether a leaf area belongs to the category.
    fn belongs_to(&self, tree: &AreaTree, id: AreaId) -> bool {
        !self.extract(&normalized_text(tree, id)).is_empty()
    }

    /// Whether a leaf area may continue a run of tagged areas even though it
    /// does not match on its own.
    fn allows_continuation(&self, _tree: &AreaTree, _id: AreaId) -> bool {
        false
    }

    /// Whether two nodes carrying this tag may be merged.
    fn allows_joining(&self) -> bool {
        true
    }

    /// Whether this tag may appear on a node merged with one tagged `other`.
    fn may_coexist_with(&self, _other: &Tag) -> bool {
        true
    }

    /// The matching substrings of `text`.
    fn extract(&self, text: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_equality_by_name() {
        let a = Tag::new("time", "regex");
        let b = Tag::new("time", "other");
        assert_eq!(a, b);
        assert_ne!(a, Tag::new("date", "regex"));
        assert!(Tag::new("date", "x") < a);
        assert_eq!(a.to_string(), "time");
    }
}

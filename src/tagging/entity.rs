//! Person and location names through an external classifier.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::area::{AreaId, AreaTree};
use crate::error::Result;

use super::{normalized_text, Tag, Tagger};

/// A labelled span of text reported by an [`NlpClassifier`].
///
/// Offsets are byte offsets into the classified text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Classifier label, e.g. `PERSON`
    pub label: String,
    /// Start offset
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl EntitySpan {
    /// Create a span.
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }
}

/// Named-entity classifier injected into the entity taggers.
pub trait NlpClassifier: Send + Sync {
    /// Find the entities in `text`.
    fn classify(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

/// Entity categories handled by [`EntityTagger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Location,
}

impl EntityKind {
    /// Tag name.
    pub fn tag_name(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Location => "location",
        }
    }

    /// Classifier label, compared case-insensitively.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Person => "PERSON",
            EntityKind::Location => "LOCATION",
        }
    }
}

/// Tags areas whose text contains enough entities of one kind.
///
/// Classifier failures are logged and count as no match.
pub struct EntityTagger {
    kind: EntityKind,
    classifier: Arc<dyn NlpClassifier>,
    min_matches: usize,
}

impl EntityTagger {
    /// Create a tagger for `kind` backed by `classifier`.
    pub fn new(kind: EntityKind, classifier: Arc<dyn NlpClassifier>) -> Self {
        Self {
            kind,
            classifier,
            min_matches: 1,
        }
    }

    /// Person tagger.
    pub fn person(classifier: Arc<dyn NlpClassifier>) -> Self {
        Self::new(EntityKind::Person, classifier)
    }

    /// Location tagger.
    pub fn location(classifier: Arc<dyn NlpClassifier>) -> Self {
        Self::new(EntityKind::Location, classifier)
    }

    /// Set the number of entities required to tag an area.
    pub fn with_min_matches(mut self, n: usize) -> Self {
        self.min_matches = n.max(1);
        self
    }

    /// The entity kind this tagger looks for.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl Tagger for EntityTagger {
    fn tag(&self) -> Tag {
        Tag::new(self.kind.tag_name(), "nlp")
    }

    fn relevance(&self) -> f64 {
        match self.kind {
            EntityKind::Person => 0.7,
            EntityKind::Location => 0.6,
        }
    }

    fn belongs_to(&self, tree: &AreaTree, id: AreaId) -> bool {
        self.extract(&normalized_text(tree, id)).len() >= self.min_matches
    }

    /// Short runs of capitalised words (a surname on the next line, the
    /// rest of a city name) may continue a tagged entity.
    fn allows_continuation(&self, tree: &AreaTree, id: AreaId) -> bool {
        let text = normalized_text(tree, id);
        let words: Vec<&str> = text.split_whitespace().collect();
        !words.is_empty()
            && words.len() <= 3
            && words
                .iter()
                .all(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let spans = match self.classifier.classify(text) {
            Ok(spans) => spans,
            Err(e) => {
                log::warn!("EntityTagger: {} classification failed: {}", self.kind.tag_name(), e);
                return Vec::new();
            }
        };
        spans
            .into_iter()
            .filter(|s| s.label.eq_ignore_ascii_case(self.kind.label()))
            .filter_map(|s| text.get(s.start..s.end).map(|t| t.trim().to_string()))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

//! Registry of taggers.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{DateTagger, EntityTagger, NlpClassifier, SessionTagger, Tag, Tagger, TimeTagger, TitleTagger};

/// Registered taggers, one per tag name.
///
/// Taggers are shared as `Arc<dyn Tagger>` so the same instance serves
/// every node of a tree and can be handed to the predictor.
#[derive(Clone)]
pub struct TaggerRegistry {
    taggers: BTreeMap<String, Arc<dyn Tagger>>,
}

impl TaggerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            taggers: BTreeMap::new(),
        }
    }

    /// Create a registry with the rule-based taggers (time, date, title,
    /// session).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TimeTagger::new()));
        registry.register(Arc::new(DateTagger::new()));
        registry.register(Arc::new(TitleTagger::new()));
        registry.register(Arc::new(SessionTagger::new()));
        registry
    }

    /// Add the person and location taggers backed by `classifier`.
    pub fn with_classifier(mut self, classifier: Arc<dyn NlpClassifier>) -> Self {
        self.register(Arc::new(EntityTagger::person(classifier.clone())));
        self.register(Arc::new(EntityTagger::location(classifier)));
        self
    }

    /// Register a tagger, replacing any tagger for the same tag.
    pub fn register(&mut self, tagger: Arc<dyn Tagger>) {
        self.taggers.insert(tagger.tag().name().to_string(), tagger);
    }

    /// The tagger producing `tag`.
    pub fn get(&self, tag: &Tag) -> Option<Arc<dyn Tagger>> {
        self.get_by_name(tag.name())
    }

    /// The tagger for a tag name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Tagger>> {
        self.taggers.get(name).cloned()
    }

    /// All taggers in tag-name order.
    pub fn taggers(&self) -> impl Iterator<Item = &Arc<dyn Tagger>> {
        self.taggers.values()
    }

    /// Registered tag names.
    pub fn tag_names(&self) -> Vec<&str> {
        self.taggers.keys().map(|k| k.as_str()).collect()
    }

    /// Number of registered taggers.
    pub fn len(&self) -> usize {
        self.taggers.len()
    }

    /// Whether no tagger is registered.
    pub fn is_empty(&self) -> bool {
        self.taggers.is_empty()
    }
}

impl Default for TaggerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for TaggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggerRegistry")
            .field("tags", &self.tag_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::tagging::EntitySpan;

    struct Nothing;

    impl NlpClassifier for Nothing {
        fn classify(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_defaults() {
        let registry = TaggerRegistry::with_defaults();
        assert_eq!(registry.tag_names(), vec!["date", "session", "time", "title"]);
        assert!(registry.get(&Tag::new("time", "any")).is_some());
        assert!(registry.get_by_name("person").is_none());
    }

    #[test]
    fn test_with_classifier() {
        let registry = TaggerRegistry::with_defaults().with_classifier(Arc::new(Nothing));
        assert_eq!(registry.len(), 6);
        assert!(registry.get_by_name("location").is_some());
    }
}

//! Tag probabilities and tag-driven joining of logical nodes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::analysis::{FeatureAnalyzer, FeatureVector};
use crate::area::{AreaId, AreaTree};
use crate::error::Result;
use crate::logical::{LogicalId, LogicalTree, NodeJoinAnalyzer};

use super::{Tag, TaggerRegistry};

/// External classifier scoring how well a node's visual style fits a tag.
pub trait StyleClassifier: Send + Sync {
    /// Probability in `[0, 1]` that a node with these features carries `tag`.
    fn probability(&self, features: &FeatureVector, tag: &Tag) -> Result<f64>;
}

/// Combines tagger relevance with an optional style classifier.
///
/// Only tagged leaves have a non-zero probability. Without a classifier the
/// probability is the tagger's relevance; with one it is the mean of the
/// relevance and the classifier's output. Feature extraction needs valid
/// grids in the area tree.
#[derive(Clone)]
pub struct TagPredictor {
    registry: TaggerRegistry,
    classifier: Option<Arc<dyn StyleClassifier>>,
    features: FeatureAnalyzer,
    threshold: f64,
}

impl TagPredictor {
    /// Create a predictor for the taggers in `registry`.
    pub fn new(registry: TaggerRegistry) -> Self {
        Self {
            registry,
            classifier: None,
            features: FeatureAnalyzer::default(),
            threshold: 0.5,
        }
    }

    /// Consult a style classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn StyleClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use a feature analyzer with custom weights.
    pub fn with_features(mut self, features: FeatureAnalyzer) -> Self {
        self.features = features;
        self
    }

    /// Minimum probability for a tag to count.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Probability above which a tag counts.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Probability that area `id` carries `tag`.
    pub fn probability(&self, tree: &AreaTree, id: AreaId, tag: &Tag) -> f64 {
        if !tree.is_leaf(id) || !tree.has_tag(id, tag) {
            return 0.0;
        }
        let Some(tagger) = self.registry.get(tag) else {
            return 0.0;
        };
        let relevance = tagger.relevance();
        let Some(classifier) = &self.classifier else {
            return relevance;
        };
        let features = self.features.features(tree, id);
        match classifier.probability(&features, tag) {
            Ok(p) => (relevance + p.clamp(0.0, 1.0)) / 2.0,
            Err(e) => {
                log::warn!("TagPredictor: style classifier failed for {} on {}: {}", tag, id, e);
                relevance
            }
        }
    }

    /// Tags of an area with their probabilities.
    pub fn area_tags(&self, tree: &AreaTree, id: AreaId) -> Vec<(Tag, f64)> {
        tree.node(id)
            .tags()
            .iter()
            .map(|t| (t.clone(), self.probability(tree, id, t)))
            .collect()
    }

    /// Tags of a logical node at or above the threshold, each with the best
    /// probability among the node's areas.
    pub fn node_tags(&self, tree: &AreaTree, logical: &LogicalTree, id: LogicalId) -> Vec<(Tag, f64)> {
        let mut best: HashMap<Tag, f64> = HashMap::new();
        for area in logical.areas(id) {
            for (tag, p) in self.area_tags(tree, *area) {
                let entry = best.entry(tag).or_insert(0.0);
                if p > *entry {
                    *entry = p;
                }
            }
        }
        let mut tags: Vec<(Tag, f64)> = best.into_iter().filter(|(_, p)| *p >= self.threshold).collect();
        tags.sort_by(|a, b| a.0.cmp(&b.0));
        tags
    }

    fn allows_joining(&self, tag: &Tag) -> bool {
        self.registry.get(tag).is_some_and(|t| t.allows_joining())
    }

    fn coexist(&self, a: &Tag, b: &Tag) -> bool {
        let forward = self.registry.get(a).map_or(true, |t| t.may_coexist_with(b));
        let backward = self.registry.get(b).map_or(true, |t| t.may_coexist_with(a));
        forward && backward
    }
}

impl std::fmt::Debug for TagPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagPredictor")
            .field("registry", &self.registry)
            .field("classifier", &self.classifier.is_some())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl NodeJoinAnalyzer for TagPredictor {
    /// Two logical nodes are joinable when their areas are adjacent siblings
    /// of the same style, none of their tags refuses joining or coexistence,
    /// and they share a tag that permits joining.
    fn is_joinable(&self, areas: &AreaTree, logical: &LogicalTree, a: LogicalId, b: LogicalId) -> bool {
        let (Some(last), Some(first)) = (logical.areas(a).last(), logical.areas(b).first()) else {
            return false;
        };
        let (last, first) = (*last, *first);
        if areas.parent(last).is_none() || areas.parent(last) != areas.parent(first) {
            return false;
        }
        match (areas.child_index(last), areas.child_index(first)) {
            (Some(i), Some(j)) if j == i + 1 => {}
            _ => return false,
        }
        if areas.style(last) != areas.style(first) {
            return false;
        }

        let ta = self.node_tags(areas, logical, a);
        let tb = self.node_tags(areas, logical, b);
        if ta.iter().chain(&tb).any(|(t, _)| !self.allows_joining(t)) {
            return false;
        }
        for (x, _) in &ta {
            for (y, _) in &tb {
                if x != y && !self.coexist(x, y) {
                    return false;
                }
            }
        }
        ta.iter().any(|(x, _)| tb.iter().any(|(y, _)| x == y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::error::Error;
    use crate::geometry::Rect;
    use crate::logical::{LogicalTreeBuilder, SeparatedLogicalTree};
    use crate::tagging::TreeTagger;

    struct Confident;

    impl StyleClassifier for Confident {
        fn probability(&self, _features: &FeatureVector, _tag: &Tag) -> Result<f64> {
            Ok(1.0)
        }
    }

    struct Failing;

    impl StyleClassifier for Failing {
        fn probability(&self, _features: &FeatureVector, _tag: &Tag) -> Result<f64> {
            Err(Error::Classifier("offline".into()))
        }
    }

    fn tagged(texts: &[&str]) -> (AreaTree, LogicalTree) {
        let mut spec = BoxSpec::viewport(400, 200);
        for (i, text) in texts.iter().enumerate() {
            let y = 10 + 14 * i as i32;
            spec = spec.with_child(BoxSpec::text(*text, Rect::new(10, y, 390, y + 10)));
        }
        let mut areas = AreaTree::from_spec(spec).unwrap();
        TreeTagger::default().tag(&mut areas);
        let logical = SeparatedLogicalTree::default().build(&areas);
        (areas, logical)
    }

    #[test]
    fn test_probability_sources() {
        let (areas, _) = tagged(&["12:30 lunch"]);
        let leaf = areas.children(areas.root())[0];
        let time = Tag::new("time", "");
        let registry = TaggerRegistry::with_defaults();
        assert_eq!(TagPredictor::new(registry.clone()).probability(&areas, leaf, &time), 0.9);
        let with = TagPredictor::new(registry.clone()).with_classifier(Arc::new(Confident));
        assert!((with.probability(&areas, leaf, &time) - 0.95).abs() < 1e-9);
        let failing = TagPredictor::new(registry).with_classifier(Arc::new(Failing));
        assert_eq!(failing.probability(&areas, leaf, &time), 0.9);
        assert_eq!(
            TagPredictor::new(TaggerRegistry::with_defaults()).probability(&areas, areas.root(), &time),
            0.0
        );
    }

    #[test]
    fn test_shared_title_joins() {
        let (areas, logical) = tagged(&["Segmenting Pages by Visual Cues", "Another Title Of The Talk"]);
        let kids = logical.children(logical.root()).to_vec();
        let predictor = TagPredictor::new(TaggerRegistry::with_defaults());
        assert!(predictor.is_joinable(&areas, &logical, kids[0], kids[1]));
    }

    #[test]
    fn test_session_refuses_title() {
        let (areas, logical) = tagged(&["Segmenting Pages by Visual Cues", "Session 4A"]);
        let kids = logical.children(logical.root()).to_vec();
        let predictor = TagPredictor::new(TaggerRegistry::with_defaults());
        assert!(!predictor.is_joinable(&areas, &logical, kids[0], kids[1]));
    }
}

//! End-to-end segmentation of one page.
//!
//! The driver runs the passes in a fixed order: basic areas, the structural
//! operators (line joining, super areas, reordering), feature and layout
//! analysis, then a refinement loop that alternates logical grouping and
//! layout splitting until neither changes the tree or the iteration cap is
//! reached. The final logical tree is built after tagging.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{FeatureAnalyzer, LayoutAnalyzer};
use crate::area::AreaTree;
use crate::boxes::{BoxSpec, BoxTree};
use crate::error::Result;
use crate::logical::LogicalTree;
use crate::operator::{
    AreaTreeOperator, FindLineOperator, LayoutSplitOperator, LogicalLocalGroupingOperator, ReorderOperator,
    SuperAreaOperator,
};
use crate::options::SegmentOptions;
use crate::tagging::{NlpClassifier, StyleClassifier, TagPredictor, TaggerRegistry, TreeTagger};

/// Counters collected during one segmentation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationStats {
    /// Boxes in the input tree
    pub boxes: usize,

    /// Live areas in the final area tree
    pub areas: usize,

    /// Areas joined into text lines
    pub line_joins: usize,

    /// Super areas created by grouping
    pub super_areas: usize,

    /// Siblings swapped into reading order
    pub reorders: usize,

    /// Areas created by table and list splitting
    pub layout_splits: usize,

    /// Logical sections promoted into the area tree
    pub logical_groupings: usize,

    /// Rounds of the refinement loop
    pub iterations: usize,

    /// Whether the refinement loop stopped at its cap
    pub iteration_cap_hit: bool,

    /// Nodes of the final logical tree
    pub logical_nodes: usize,

    /// Leaves carrying at least one tag
    pub tagged_areas: usize,

    /// Logical siblings merged by shared tags
    pub tag_joins: usize,
}

impl SegmentationStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of segmenting a page.
#[derive(Debug)]
pub struct Segmentation {
    /// The visual area tree
    pub areas: AreaTree,

    /// The logical structure built over the areas
    pub logical: LogicalTree,

    /// Run statistics
    pub stats: SegmentationStats,
}

impl Segmentation {
    /// Plain text of the whole page in logical order.
    pub fn text(&self) -> String {
        self.logical.text(&self.areas, self.logical.root())
    }

    /// Indented outline of the logical tree.
    pub fn outline(&self) -> String {
        self.logical.outline(&self.areas)
    }
}

/// Configurable page segmenter.
///
/// # Example
///
/// ```no_run
/// use pageseg::{BoxSpec, Rect, Segmenter, SegmentOptions};
///
/// let page = BoxSpec::viewport(800, 600)
///     .with_child(BoxSpec::text("Hello", Rect::new(0, 0, 50, 10)));
/// let result = Segmenter::new(SegmentOptions::default()).segment(page)?;
/// println!("{}", result.outline());
/// # Ok::<(), pageseg::Error>(())
/// ```
#[derive(Clone)]
pub struct Segmenter {
    options: SegmentOptions,
    registry: TaggerRegistry,
    style_classifier: Option<Arc<dyn StyleClassifier>>,
}

impl Segmenter {
    /// Create a segmenter with the default taggers.
    pub fn new(options: SegmentOptions) -> Self {
        Self {
            options,
            registry: TaggerRegistry::with_defaults(),
            style_classifier: None,
        }
    }

    /// Use a custom tagger registry.
    pub fn with_registry(mut self, registry: TaggerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add person and location tagging through `classifier`.
    pub fn with_classifier(mut self, classifier: Arc<dyn NlpClassifier>) -> Self {
        self.registry = self.registry.with_classifier(classifier);
        self
    }

    /// Consult a style classifier for tag probabilities.
    pub fn with_style_classifier(mut self, classifier: Arc<dyn StyleClassifier>) -> Self {
        self.style_classifier = Some(classifier);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// The taggers applied to leaf areas.
    pub fn registry(&self) -> &TaggerRegistry {
        &self.registry
    }

    /// Segment renderer output.
    pub fn segment(&self, page: BoxSpec) -> Result<Segmentation> {
        self.options.validate()?;
        self.segment_tree(BoxTree::new(page)?)
    }

    /// Segment renderer output in JSON form.
    pub fn segment_json(&self, json: &str) -> Result<Segmentation> {
        self.options.validate()?;
        self.segment_tree(BoxTree::from_json(json)?)
    }

    /// Segment an already built box tree.
    pub fn segment_tree(&self, boxes: BoxTree) -> Result<Segmentation> {
        self.options.validate()?;
        let options = &self.options;
        let mut stats = SegmentationStats::new();
        stats.boxes = boxes.len();

        let mut areas = AreaTree::new(boxes);

        if options.find_lines {
            let op = FindLineOperator::new(options.max_line_em_space, options.consistent_line_style);
            stats.line_joins = op.apply(&mut areas);
        }
        if options.build_super_areas {
            let op = SuperAreaOperator::new(
                options.separator_strategy.build(&options.separator),
                options.group_strategy.build(options.separator.weight_tolerance),
                options.super_area_depth,
            );
            stats.super_areas = op.apply(&mut areas);
        }
        if options.reorder {
            stats.reorders = ReorderOperator::new().apply(&mut areas);
        }

        let features = FeatureAnalyzer::new(options.weights.clone());
        let layout = LayoutAnalyzer::new();
        features.analyze(&mut areas);
        layout.analyze(&mut areas);

        let builder = options
            .logical_strategy
            .build(options.flow_break_gap, options.indent_tolerance);
        let grouping = LogicalLocalGroupingOperator::new(options.garbage_limit);
        let split = LayoutSplitOperator::new();

        loop {
            stats.iterations += 1;
            let mut logical = builder.build(&areas);
            let grouped = grouping.apply(&mut areas, &mut logical);
            let splits = split.apply(&mut areas);
            stats.logical_groupings += grouped;
            stats.layout_splits += splits;
            if grouped + splits > 0 {
                features.analyze(&mut areas);
                layout.analyze(&mut areas);
            }
            log::trace!(
                "Segmenter: round {} grouped {} split {}",
                stats.iterations,
                grouped,
                splits
            );
            if grouped + splits == 0 {
                break;
            }
            if stats.iterations >= options.max_iterations {
                stats.iteration_cap_hit = true;
                log::warn!(
                    "Segmenter: refinement stopped after {} rounds without reaching a fixpoint",
                    stats.iterations
                );
                break;
            }
        }

        let tagger = TreeTagger::new(self.registry.clone()).with_parallel(options.parallel_tagging);
        tagger.tag(&mut areas);

        let mut logical = builder.build(&areas);
        if options.join_tagged_nodes {
            areas.update_grids();
            let mut predictor = TagPredictor::new(self.registry.clone())
                .with_features(features.clone())
                .with_threshold(options.tag_threshold);
            if let Some(classifier) = &self.style_classifier {
                predictor = predictor.with_classifier(classifier.clone());
            }
            stats.tag_joins = logical.join_siblings(&areas, &predictor);
        }

        let root = areas.root();
        stats.areas = areas.descendants(root).len();
        stats.logical_nodes = logical.descendants(logical.root()).len();
        stats.tagged_areas = areas
            .leaves(root)
            .iter()
            .filter(|id| !areas.node(**id).tags().is_empty())
            .count();

        log::debug!(
            "Segmenter: {} boxes -> {} areas, {} logical nodes in {} rounds",
            stats.boxes,
            stats.areas,
            stats.logical_nodes,
            stats.iterations
        );
        Ok(Segmentation { areas, logical, stats })
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentOptions::default())
    }
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("style_classifier", &self.style_classifier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::Rect;

    fn article() -> BoxSpec {
        BoxSpec::viewport(600, 400)
            .with_child(
                BoxSpec::text("Visual Page Segmentation", Rect::new(20, 10, 400, 34))
                    .with_font_size(24.0)
                    .bold(),
            )
            .with_child(BoxSpec::text("Pages are split", Rect::new(20, 50, 150, 62)))
            .with_child(BoxSpec::text("into areas.", Rect::new(154, 50, 260, 62)))
            .with_child(BoxSpec::text("Areas form a logical tree.", Rect::new(20, 66, 300, 78)))
    }

    #[test]
    fn test_segment_article() {
        let result = Segmenter::default().segment(article()).unwrap();
        assert_eq!(result.stats.line_joins, 1);
        assert!(result.stats.iterations >= 1);
        assert!(!result.stats.iteration_cap_hit);
        assert!(result.text().contains("Pages are split into areas."));
        assert!(result.stats.logical_nodes >= 2);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let segmenter = Segmenter::new(SegmentOptions::new().with_max_iterations(0));
        assert!(matches!(segmenter.segment(article()), Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_basic_areas_only() {
        let result = Segmenter::new(SegmentOptions::new().basic_areas())
            .segment(article())
            .unwrap();
        assert_eq!(result.stats.line_joins, 0);
        assert_eq!(result.stats.super_areas, 0);
        assert_eq!(result.areas.leaves(result.areas.root()).len(), 4);
    }
}

//! Segmentation options and configuration.

use serde::{Deserialize, Serialize};

use crate::analysis::MarkednessWeights;
use crate::error::{Error, Result};
use crate::group::GroupStrategyKind;
use crate::logical::LogicalStrategyKind;
use crate::separator::{SeparatorOptions, SeparatorStrategyKind};

/// Options for segmenting a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// Separator detection strategy
    pub separator_strategy: SeparatorStrategyKind,

    /// Group analyzer used to build super areas
    pub group_strategy: GroupStrategyKind,

    /// Logical tree construction strategy
    pub logical_strategy: LogicalStrategyKind,

    /// Whether to join areas on the same text line
    pub find_lines: bool,

    /// Link instead of join when styles differ on a line
    pub consistent_line_style: bool,

    /// Largest gap between joined areas, in ems of the larger font
    pub max_line_em_space: f64,

    /// Whether to group siblings into super areas
    pub build_super_areas: bool,

    /// Recursion depth of super area creation
    pub super_area_depth: usize,

    /// Whether to restore reading order of siblings on a row
    pub reorder: bool,

    /// Separator tunables
    pub separator: SeparatorOptions,

    /// Bad entries tolerated inside a logical group
    pub garbage_limit: usize,

    /// Safety cap of the refinement loop
    pub max_iterations: usize,

    /// Vertical gap (px) that ends a logical group
    pub flow_break_gap: i32,

    /// Horizontal tolerance (px) of the indentation strategy
    pub indent_tolerance: i32,

    /// Markedness component weights
    pub weights: MarkednessWeights,

    /// Minimum tag probability
    pub tag_threshold: f64,

    /// Whether to merge logical siblings sharing a tag
    pub join_tagged_nodes: bool,

    /// Whether to match taggers in parallel
    pub parallel_tagging: bool,
}

impl SegmentOptions {
    /// Create new segment options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator strategy.
    pub fn with_separator_strategy(mut self, kind: SeparatorStrategyKind) -> Self {
        self.separator_strategy = kind;
        self
    }

    /// Set the group analyzer.
    pub fn with_group_strategy(mut self, kind: GroupStrategyKind) -> Self {
        self.group_strategy = kind;
        self
    }

    /// Set the logical tree strategy.
    pub fn with_logical_strategy(mut self, kind: LogicalStrategyKind) -> Self {
        self.logical_strategy = kind;
        self
    }

    /// Enable or disable line joining.
    pub fn with_find_lines(mut self, enabled: bool) -> Self {
        self.find_lines = enabled;
        self
    }

    /// Keep differently styled areas on a line apart.
    pub fn with_consistent_line_style(mut self, consistent: bool) -> Self {
        self.consistent_line_style = consistent;
        self
    }

    /// Set the line join gap in ems.
    pub fn with_max_line_em_space(mut self, ems: f64) -> Self {
        self.max_line_em_space = ems;
        self
    }

    /// Enable or disable super area creation.
    pub fn with_super_areas(mut self, enabled: bool) -> Self {
        self.build_super_areas = enabled;
        self
    }

    /// Set the super area recursion depth.
    pub fn with_super_area_depth(mut self, depth: usize) -> Self {
        self.super_area_depth = depth;
        self
    }

    /// Enable or disable reordering.
    pub fn with_reorder(mut self, enabled: bool) -> Self {
        self.reorder = enabled;
        self
    }

    /// Set separator tunables.
    pub fn with_separator_options(mut self, options: SeparatorOptions) -> Self {
        self.separator = options;
        self
    }

    /// Set the logical grouping garbage limit.
    pub fn with_garbage_limit(mut self, limit: usize) -> Self {
        self.garbage_limit = limit;
        self
    }

    /// Set the refinement loop cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Set the flow break gap.
    pub fn with_flow_break_gap(mut self, px: i32) -> Self {
        self.flow_break_gap = px;
        self
    }

    /// Set the indentation tolerance.
    pub fn with_indent_tolerance(mut self, px: i32) -> Self {
        self.indent_tolerance = px;
        self
    }

    /// Set markedness weights.
    pub fn with_weights(mut self, weights: MarkednessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the tag probability threshold.
    pub fn with_tag_threshold(mut self, threshold: f64) -> Self {
        self.tag_threshold = threshold;
        self
    }

    /// Enable or disable tag-driven joining of logical nodes.
    pub fn with_tag_joining(mut self, enabled: bool) -> Self {
        self.join_tagged_nodes = enabled;
        self
    }

    /// Enable or disable parallel tagging.
    pub fn with_parallel_tagging(mut self, parallel: bool) -> Self {
        self.parallel_tagging = parallel;
        self
    }

    /// Only build basic areas: no line joining, super areas or reordering.
    pub fn basic_areas(mut self) -> Self {
        self.find_lines = false;
        self.build_super_areas = false;
        self.reorder = false;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidOptions("max_iterations must be at least 1".into()));
        }
        if self.max_line_em_space.is_nan() || self.max_line_em_space < 0.0 {
            return Err(Error::InvalidOptions(format!(
                "max_line_em_space must be non-negative, got {}",
                self.max_line_em_space
            )));
        }
        if !(0.0..=1.0).contains(&self.tag_threshold) {
            return Err(Error::InvalidOptions(format!(
                "tag_threshold must be within [0, 1], got {}",
                self.tag_threshold
            )));
        }
        Ok(())
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            separator_strategy: SeparatorStrategyKind::default(),
            group_strategy: GroupStrategyKind::default(),
            logical_strategy: LogicalStrategyKind::default(),
            find_lines: true,
            consistent_line_style: false,
            max_line_em_space: 1.5,
            build_super_areas: true,
            super_area_depth: 2,
            reorder: true,
            separator: SeparatorOptions::default(),
            garbage_limit: 1,
            max_iterations: 10,
            flow_break_gap: 10,
            indent_tolerance: 2,
            weights: MarkednessWeights::default(),
            tag_threshold: 0.5,
            join_tagged_nodes: true,
            parallel_tagging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let options = SegmentOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.max_iterations, 10);
        assert_eq!(options.separator.max_column_depth, 8);
    }

    #[test]
    fn test_builder() {
        let options = SegmentOptions::new()
            .with_group_strategy(GroupStrategyKind::ByFlooding)
            .with_logical_strategy(LogicalStrategyKind::Indentation)
            .with_parallel_tagging(true)
            .basic_areas();
        assert_eq!(options.group_strategy, GroupStrategyKind::ByFlooding);
        assert!(options.parallel_tagging);
        assert!(!options.find_lines && !options.build_super_areas && !options.reorder);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(matches!(
            SegmentOptions::new().with_max_iterations(0).validate(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(SegmentOptions::new().with_max_line_em_space(-1.0).validate().is_err());
        assert!(SegmentOptions::new().with_tag_threshold(1.5).validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let options: SegmentOptions = serde_json::from_str(r#"{"max_iterations": 3, "reorder": false}"#).unwrap();
        assert_eq!(options.max_iterations, 3);
        assert!(!options.reorder);
        assert!(options.find_lines);
    }
}

//! # pageseg
//!
//! Visual page segmentation for Rust.
//!
//! This library takes the positioned boxes produced by a layout renderer and
//! turns them into a tree of visual areas, a logical document-structure tree
//! built over those areas, and semantic tags on the leaves.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pageseg::{segment_json, Result};
//!
//! fn main() -> Result<()> {
//!     // Renderer output for one page
//!     let json = std::fs::read_to_string("page.json")?;
//!
//!     // Areas, logical structure and tags
//!     let result = segment_json(&json)?;
//!     println!("{}", result.outline());
//!     println!("{} areas, {} logical nodes", result.stats.areas, result.stats.logical_nodes);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Area tree**: grids over children, visual bounds, inherited backgrounds
//! - **Separator detection**: column carving, grid gaps, experimental single pass
//! - **Grouping**: super areas by separators, grid expansion or flood fill
//! - **Layout analysis**: table and list recognition among siblings
//! - **Markedness**: visual importance from font, color, position and contrast
//! - **Logical tree**: markedness or indentation based document structure
//! - **Tagging**: time, date, title, session, and classifier-backed person/location tags

pub mod analysis;
pub mod area;
pub mod boxes;
pub mod error;
pub mod geometry;
pub mod group;
pub mod logical;
pub mod operator;
pub mod options;
pub mod pipeline;
pub mod separator;
pub mod tagging;

// Re-export commonly used types
pub use analysis::{FeatureAnalyzer, FeatureVector, LayoutAnalyzer, MarkednessWeights};
pub use area::{Area, AreaGrid, AreaId, AreaNode, AreaTree, LayoutType, NodeStyle};
pub use boxes::{BorderWidths, BoxId, BoxSpec, BoxTree, FontSpec, ReplacedContent};
pub use error::{Error, Result};
pub use geometry::{Color, Rect};
pub use group::{GroupAnalyzer, GroupSelection, GroupStrategyKind};
pub use logical::{LogicalId, LogicalNode, LogicalStrategyKind, LogicalTree, LogicalTreeBuilder, NodeJoinAnalyzer};
pub use operator::AreaTreeOperator;
pub use options::SegmentOptions;
pub use pipeline::{Segmentation, SegmentationStats, Segmenter};
pub use separator::{Separator, SeparatorKind, SeparatorOptions, SeparatorSet, SeparatorStrategy, SeparatorStrategyKind};
pub use tagging::{EntitySpan, NlpClassifier, StyleClassifier, Tag, TagPredictor, Tagger, TaggerRegistry, TreeTagger};

use std::path::Path;

/// Segment a page with default options.
///
/// # Arguments
///
/// * `page` - Renderer output, rooted at the viewport box
///
/// # Returns
///
/// A `Result` containing the area tree, logical tree and statistics.
///
/// # Example
///
/// ```no_run
/// use pageseg::{segment, BoxSpec, Rect};
///
/// let page = BoxSpec::viewport(800, 600)
///     .with_child(BoxSpec::text("Hello", Rect::new(0, 0, 50, 10)))
///     .with_child(BoxSpec::text("World", Rect::new(55, 0, 100, 10)));
/// let result = segment(page).unwrap();
/// println!("{}", result.text());
/// ```
pub fn segment(page: BoxSpec) -> Result<Segmentation> {
    Segmenter::default().segment(page)
}

/// Segment a page with custom options.
///
/// # Arguments
///
/// * `page` - Renderer output, rooted at the viewport box
/// * `options` - Segmentation options
///
/// # Example
///
/// ```no_run
/// use pageseg::{segment_with_options, BoxSpec, LogicalStrategyKind, SegmentOptions};
///
/// let options = SegmentOptions::new()
///     .with_logical_strategy(LogicalStrategyKind::Indentation)
///     .with_max_iterations(5);
/// let result = segment_with_options(BoxSpec::viewport(800, 600), options).unwrap();
/// ```
pub fn segment_with_options(page: BoxSpec, options: SegmentOptions) -> Result<Segmentation> {
    Segmenter::new(options).segment(page)
}

/// Segment a page given as JSON renderer output.
///
/// # Arguments
///
/// * `json` - A serialized `BoxSpec` tree
///
/// # Example
///
/// ```no_run
/// use pageseg::segment_json;
///
/// let json = r#"{"bounds": {"x1": 0, "y1": 0, "x2": 800, "y2": 600}}"#;
/// let result = segment_json(json).unwrap();
/// ```
pub fn segment_json(json: &str) -> Result<Segmentation> {
    Segmenter::default().segment_json(json)
}

/// Segment a page stored as a JSON file.
///
/// # Example
///
/// ```no_run
/// use pageseg::segment_file;
///
/// let result = segment_file("page.json").unwrap();
/// println!("{}", result.outline());
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<Segmentation> {
    Segmenter::default().segment_tree(BoxTree::from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_hello_world() {
        let page = BoxSpec::viewport(800, 600)
            .with_child(BoxSpec::text("Hello", Rect::new(0, 0, 50, 10)))
            .with_child(BoxSpec::text("World", Rect::new(55, 0, 100, 10)));
        let result = segment(page).unwrap();
        assert_eq!(result.stats.line_joins, 1);
        assert_eq!(result.text(), "Hello World");
    }

    #[test]
    fn test_segment_json_invalid() {
        assert!(matches!(segment_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_segment_empty_viewport() {
        assert!(matches!(segment(BoxSpec::viewport(0, 0)), Err(Error::EmptyPage)));
    }

    #[test]
    fn test_segment_file_missing() {
        assert!(matches!(segment_file("/nonexistent/page.json"), Err(Error::Io(_))));
    }
}

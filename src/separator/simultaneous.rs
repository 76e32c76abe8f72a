//! Experimental single-pass separator detection.

use crate::area::{AreaId, AreaTree};
use crate::geometry::Rect;

use super::{content_children, finish, region, SeparatorOptions, SeparatorSet, SeparatorStrategy};

/// Carves horizontal and vertical separators from one shared view.
///
/// The view starts as the whole area. Every content child is subtracted
/// from each piece it overlaps, leaving the bands above and below it and the
/// bands left and right of it. Pieces running the full width are horizontal
/// and all others vertical. Vertical fragments stacked with no content in
/// between are joined by the shared post-processing. This strategy is experimental
/// and not a replacement for [`super::ColumnSeparators`].
#[derive(Debug, Clone, Default)]
pub struct SimultaneousSeparators {
    options: SeparatorOptions,
}

impl SimultaneousSeparators {
    /// Create the strategy.
    pub fn new(options: SeparatorOptions) -> Self {
        Self { options }
    }
}

impl SeparatorStrategy for SimultaneousSeparators {
    fn name(&self) -> &'static str {
        "simultaneous"
    }

    fn find(&self, tree: &AreaTree, node: AreaId, filter: Option<Rect>) -> SeparatorSet {
        let region = region(tree, node, filter);
        if region.is_empty() {
            return SeparatorSet::empty(tree, node);
        }
        let mut view = vec![region];
        for (_, child) in content_children(tree, node, &region) {
            view = view
                .into_iter()
                .flat_map(|piece| piece.subtract(&child))
                .collect();
        }

        let mut horizontal = Vec::new();
        let mut vertical = Vec::new();
        for piece in view {
            if piece.x1 == region.x1 && piece.x2 == region.x2 {
                horizontal.push(piece);
            } else {
                vertical.push(piece);
            }
        }
        log::trace!(
            "SimultaneousSeparators: area {}: {} pieces",
            node,
            horizontal.len() + vertical.len()
        );
        finish(tree, node, region, horizontal, vertical, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{BorderWidths, BoxSpec};

    #[test]
    fn test_every_child_is_carved() {
        let page = BoxSpec::viewport(200, 200)
            .with_child(BoxSpec::text("Top", Rect::new(10, 10, 190, 40)))
            .with_child(BoxSpec::container(Rect::new(10, 90, 190, 91)).with_border(BorderWidths::uniform(1)))
            .with_child(BoxSpec::text("Bottom", Rect::new(10, 150, 190, 180)));
        let tree = AreaTree::from_spec(page).unwrap();
        let seps = SimultaneousSeparators::default().find(&tree, tree.root(), None);
        assert_eq!(seps.horizontal().len(), 1);
        let h = seps.horizontal()[0].rect();
        assert_eq!((h.y1, h.y2), (41, 149));
        assert!(seps.vertical().is_empty());
        assert_eq!(seps.box_separators().len(), 1);
        assert!(seps.box_separators()[0].is_horizontal());
    }

    #[test]
    fn test_column_gap_between_lines() {
        let mut page = BoxSpec::viewport(300, 200);
        for i in 0..3 {
            let y = 10 + i * 16;
            page = page
                .with_child(BoxSpec::text("Left line", Rect::new(10, y, 130, y + 12)))
                .with_child(BoxSpec::text("Right line", Rect::new(170, y, 290, y + 12)));
        }
        let tree = AreaTree::from_spec(page).unwrap();
        let seps = SimultaneousSeparators::default().find(&tree, tree.root(), None);
        assert_eq!(seps.vertical().len(), 1);
        let v = seps.vertical()[0].rect();
        assert_eq!((v.x1, v.x2), (131, 169));
        assert_eq!((v.y1, v.y2), (10, 54));
    }
}

//! Separators by carving children out of whole-area separators.

use crate::area::{AreaId, AreaTree};
use crate::geometry::Rect;

use super::{content_children, finish, region, remove_marginal, SeparatorOptions, SeparatorSet, SeparatorStrategy};

/// Carves every child out of one whole-area horizontal and one whole-area
/// vertical separator.
///
/// A child splits each horizontal separator it overlaps into the parts above
/// and below it, and each vertical separator into the parts left and right
/// of it. What is left are the empty bands running edge to edge. When no
/// vertical separator survives, the area is cut along the horizontal
/// separators and every band is searched for columns of its own, up to
/// [`SeparatorOptions::max_column_depth`] levels deep.
#[derive(Debug, Clone, Default)]
pub struct ColumnSeparators {
    options: SeparatorOptions,
}

impl ColumnSeparators {
    /// Create the strategy.
    pub fn new(options: SeparatorOptions) -> Self {
        Self { options }
    }

    fn search(&self, children: &[(AreaId, Rect)], region: Rect, depth: usize) -> (Vec<Rect>, Vec<Rect>) {
        let (mut horizontal, mut vertical) = carve(children, region);
        remove_marginal(&mut horizontal, &mut vertical, &region);

        if !vertical.is_empty() || horizontal.is_empty() || depth >= self.options.max_column_depth {
            return (horizontal, vertical);
        }

        let bands = sub_bands(&region, &horizontal);
        if bands.len() <= 1 {
            return (horizontal, vertical);
        }
        log::trace!(
            "ColumnSeparators: no column in {}, searching {} bands at depth {}",
            region,
            bands.len(),
            depth + 1
        );
        for band in bands {
            let inside: Vec<(AreaId, Rect)> = children
                .iter()
                .filter(|(_, r)| r.intersects(&band))
                .copied()
                .collect();
            if inside.len() < 2 {
                continue;
            }
            let (h, v) = self.search(&inside, band, depth + 1);
            horizontal.extend(h);
            vertical.extend(v);
        }
        (horizontal, vertical)
    }
}

impl SeparatorStrategy for ColumnSeparators {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn find(&self, tree: &AreaTree, node: AreaId, filter: Option<Rect>) -> SeparatorSet {
        let region = region(tree, node, filter);
        if region.is_empty() {
            return SeparatorSet::empty(tree, node);
        }
        let children = content_children(tree, node, &region);
        let (horizontal, vertical) = self.search(&children, region, 0);
        finish(tree, node, region, horizontal, vertical, &self.options)
    }
}

/// Carve all children out of whole-region separators.
pub(crate) fn carve(children: &[(AreaId, Rect)], region: Rect) -> (Vec<Rect>, Vec<Rect>) {
    let mut horizontal = vec![region];
    let mut vertical = vec![region];
    for (_, child) in children {
        horizontal = split_all(horizontal, child, Rect::v_split);
        vertical = split_all(vertical, child, Rect::h_split);
    }
    (horizontal, vertical)
}

fn split_all(seps: Vec<Rect>, child: &Rect, split: fn(&mut Rect, &Rect) -> Option<Rect>) -> Vec<Rect> {
    let mut out = Vec::with_capacity(seps.len() + 1);
    for mut sep in seps {
        if !sep.intersects(child) {
            out.push(sep);
            continue;
        }
        let rest = split(&mut sep, child);
        if !sep.is_empty() && !sep.intersects(child) {
            out.push(sep);
        }
        if let Some(rest) = rest {
            out.push(rest);
        }
    }
    out
}

/// Bands of `region` between consecutive horizontal separators.
fn sub_bands(region: &Rect, horizontal: &[Rect]) -> Vec<Rect> {
    let mut cuts: Vec<&Rect> = horizontal.iter().collect();
    cuts.sort_by_key(|r| r.y1);
    let mut bands = Vec::new();
    let mut top = region.y1;
    for cut in cuts {
        if cut.y1 > top {
            bands.push(Rect::new(region.x1, top, region.x2, cut.y1 - 1));
        }
        top = top.max(cut.y2 + 1);
    }
    if top <= region.y2 {
        bands.push(Rect::new(region.x1, top, region.x2, region.y2));
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;

    #[test]
    fn test_carve_between_rows() {
        let children = vec![
            (AreaId(1), Rect::new(0, 0, 99, 9)),
            (AreaId(2), Rect::new(0, 20, 99, 29)),
        ];
        let (h, v) = carve(&children, Rect::new(0, 0, 99, 39));
        assert!(h.contains(&Rect::new(0, 10, 99, 19)));
        assert!(h.contains(&Rect::new(0, 30, 99, 39)));
        assert!(v.is_empty());
    }

    #[test]
    fn test_columns_found_in_bands() {
        // a full-width header above two columns
        let page = BoxSpec::viewport(300, 300)
            .with_child(BoxSpec::text("Header", Rect::new(10, 10, 290, 40)))
            .with_child(BoxSpec::text("Left", Rect::new(10, 60, 130, 290)))
            .with_child(BoxSpec::text("Right", Rect::new(170, 60, 290, 290)));
        let tree = AreaTree::from_spec(page).unwrap();
        let seps = ColumnSeparators::default().find(&tree, tree.root(), None);
        assert_eq!(seps.horizontal().len(), 1);
        assert_eq!(seps.vertical().len(), 1);
        let v = seps.vertical()[0].rect();
        assert_eq!((v.x1, v.x2), (131, 169));
        assert!(v.y1 > 40);
    }

    #[test]
    fn test_depth_limit() {
        let options = SeparatorOptions {
            max_column_depth: 0,
            ..Default::default()
        };
        let page = BoxSpec::viewport(300, 300)
            .with_child(BoxSpec::text("Header", Rect::new(10, 10, 290, 40)))
            .with_child(BoxSpec::text("Left", Rect::new(10, 60, 130, 290)))
            .with_child(BoxSpec::text("Right", Rect::new(170, 60, 290, 290)));
        let tree = AreaTree::from_spec(page).unwrap();
        let seps = ColumnSeparators::new(options).find(&tree, tree.root(), None);
        assert!(seps.vertical().is_empty());
    }

    #[test]
    fn test_sub_bands() {
        let bands = sub_bands(&Rect::new(0, 0, 99, 99), &[Rect::new(0, 40, 99, 49)]);
        assert_eq!(bands, vec![Rect::new(0, 0, 99, 39), Rect::new(0, 50, 99, 99)]);
    }
}

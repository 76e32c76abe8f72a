//! Horizontal centering of an area within its parent.

use crate::area::{AreaId, AreaTree};

/// Allowed margin difference as a fraction of the parent width.
const CENTERING_THRESHOLD: f64 = 0.1;

/// Result of the centering test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    /// Clearly not centered
    No,
    /// Centered, or spanning the full parent width
    Yes,
    /// Margins are equal but too small to tell
    Unknown,
}

fn limit(parent_width: i32) -> i32 {
    ((parent_width as f64 * CENTERING_THRESHOLD) as i32).max(1)
}

/// Centering judged from the margins alone.
fn by_margins(tree: &AreaTree, id: AreaId) -> Centering {
    let Some(parent) = tree.parent(id) else {
        return Centering::No;
    };
    let pb = tree.bounds(parent);
    let b = tree.bounds(id);
    let left = b.x1 - pb.x1;
    let right = pb.x2 - b.x2;
    let limit = limit(pb.width());

    if left <= 0 && right <= 0 {
        Centering::Yes
    } else if (left - right).abs() > limit {
        Centering::No
    } else if left.min(right) <= limit {
        Centering::Unknown
    } else {
        Centering::Yes
    }
}

/// Decide whether an area is centered in its parent.
///
/// Ambiguous cases are resolved by the nearest siblings on either side that
/// can be decided from their margins: sharing a left or right edge with a
/// sibling that is not centered counts against centering, sharing the
/// center line with a centered sibling counts for it. Cases that stay
/// ambiguous are reported as [`Centering::No`].
pub fn centering(tree: &AreaTree, id: AreaId) -> Centering {
    let own = by_margins(tree, id);
    if own != Centering::Unknown {
        return own;
    }
    let Some(parent) = tree.parent(id) else {
        return Centering::No;
    };
    let siblings = tree.children(parent);
    let Some(index) = siblings.iter().position(|s| *s == id) else {
        return Centering::No;
    };
    let b = tree.bounds(id);
    let limit = limit(tree.bounds(parent).width());

    let before = siblings[..index].iter().rev();
    let after = siblings[index + 1..].iter();
    for side in [before.copied().collect::<Vec<_>>(), after.copied().collect()] {
        let Some((neighbour, verdict)) = side
            .into_iter()
            .map(|s| (s, by_margins(tree, s)))
            .find(|(_, c)| *c != Centering::Unknown)
        else {
            continue;
        };
        let nb = tree.bounds(neighbour);
        let aligned = (nb.x1 - b.x1).abs() <= 1 || (nb.x2 - b.x2).abs() <= 1;
        match verdict {
            Centering::No if aligned => return Centering::No,
            Centering::Yes if (nb.mid_x() - b.mid_x()).abs() <= limit && !aligned => {
                return Centering::Yes
            }
            _ => {}
        }
    }
    Centering::No
}

/// Whether an area is centered in its parent.
pub fn is_centered(tree: &AreaTree, id: AreaId) -> bool {
    centering(tree, id) == Centering::Yes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    #[test]
    fn test_centered_heading() {
        let page = BoxSpec::viewport(400, 200)
            .with_child(BoxSpec::text("Title", Rect::new(150, 10, 249, 30)))
            .with_child(BoxSpec::text("Body text", Rect::new(10, 50, 300, 60)));
        let tree = AreaTree::from_spec(page).unwrap();
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(centering(&tree, kids[0]), Centering::Yes);
        assert_eq!(centering(&tree, kids[1]), Centering::No);
    }

    #[test]
    fn test_ambiguous_resolved_by_aligned_neighbour() {
        let page = BoxSpec::viewport(400, 200)
            .with_child(BoxSpec::text("Left", Rect::new(10, 10, 200, 20)))
            .with_child(BoxSpec::text("Wide", Rect::new(10, 30, 389, 40)));
        let tree = AreaTree::from_spec(page).unwrap();
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(centering(&tree, kids[1]), Centering::No);
    }

    #[test]
    fn test_full_width_is_centered() {
        let page = BoxSpec::viewport(400, 200).with_child(BoxSpec::text("All", Rect::new(0, 10, 399, 20)));
        let tree = AreaTree::from_spec(page).unwrap();
        let kid = tree.children(tree.root())[0];
        assert!(is_centered(&tree, kid));
    }
}

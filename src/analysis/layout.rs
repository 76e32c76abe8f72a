//! Table and list detection among sibling areas.
//!
//! Both detectors work on grid positions in the parent's grid. A table is a
//! run of children aligned in at least two columns spanning at least three
//! rows; a list is a run of short, capitalised items in one column with at
//! most two styles, optionally followed on the same rows by more content.

use std::collections::{BTreeSet, HashSet};

use crate::area::{AreaId, AreaTree, LayoutType, NodeStyle};

/// Maximum number of words in a list item's first-column text.
const MAX_ITEM_WORDS: usize = 10;

/// Minimum number of items for a list.
const MIN_LIST_ITEMS: usize = 3;

/// Minimum number of distinct row starts for a table.
const MIN_TABLE_ROWS: usize = 3;

/// Minimum number of valid columns for a table.
const MIN_TABLE_COLUMNS: usize = 2;

/// Classifies the children of area nodes as tables, lists or normal flow.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer;

/// Running column statistics of a table candidate.
struct ColumnStats {
    counts: Vec<usize>,
    rows: BTreeSet<i32>,
}

impl ColumnStats {
    fn new(width: usize) -> Self {
        Self {
            counts: vec![0; width],
            rows: BTreeSet::new(),
        }
    }

    fn valid_columns(&self) -> usize {
        let Some(first) = self.counts.iter().position(|c| *c > 0) else {
            return 0;
        };
        1 + self.counts[first + 1..].iter().filter(|c| **c >= 2).count()
    }

    fn is_complete(&self) -> bool {
        self.valid_columns() >= MIN_TABLE_COLUMNS && self.rows.len() >= MIN_TABLE_ROWS
    }
}

/// Outcome of scanning a list candidate.
struct ListScan {
    end: Option<usize>,
    items: usize,
}

impl LayoutAnalyzer {
    /// Create the analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Classify the layout of a node's children.
    ///
    /// The node's grid must be valid.
    pub fn detect(&self, tree: &AreaTree, node: AreaId) -> LayoutType {
        let children = tree.children(node);
        if children.len() < 2 {
            return LayoutType::Normal;
        }
        if self.is_table(tree, node, children) {
            LayoutType::Table
        } else if self.is_list(tree, node, children) {
            LayoutType::List
        } else {
            LayoutType::Normal
        }
    }

    /// Classify every node of the tree; returns the number of tables and
    /// lists found.
    pub fn analyze(&self, tree: &mut AreaTree) -> usize {
        tree.update_grids();
        let mut found = 0;
        for id in tree.descendants(tree.root()) {
            let layout = self.detect(tree, id);
            if layout != LayoutType::Normal {
                found += 1;
            }
            tree.set_layout(id, layout);
        }
        log::debug!("LayoutAnalyzer: {} tables or lists", found);
        found
    }

    /// Whether the given children of `parent` form a complete table.
    pub fn is_table(&self, tree: &AreaTree, parent: AreaId, children: &[AreaId]) -> bool {
        !children.is_empty() && self.find_table_end(tree, parent, children, 0) == Some(children.len() - 1)
    }

    /// Index of the last child of a table starting at `start`, if any.
    ///
    /// Children are consumed while each occupies a single grid column that
    /// no earlier child has spanned. A child spanning several columns ends
    /// the run; the table is then trimmed back to the children lying
    /// completely above that child's first row.
    pub fn find_table_end(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        children: &[AreaId],
        start: usize,
    ) -> Option<usize> {
        let grid = tree.grid(parent);
        let mut stats = ColumnStats::new(grid.width());
        let mut disabled = vec![false; grid.width()];
        let mut last_complete = None;
        let mut breaker = None;

        for (i, child) in children.iter().enumerate().skip(start) {
            let Some(pos) = grid.position(*child) else {
                break;
            };
            let (c1, c2) = (pos.x1 as usize, pos.x2 as usize);
            if c1 != c2 || disabled[c1] {
                for flag in &mut disabled[c1..=c2] {
                    *flag = true;
                }
                breaker = Some(pos);
                break;
            }
            stats.counts[c1] += 1;
            stats.rows.insert(pos.y1);
            if stats.is_complete() {
                last_complete = Some(i);
            }
        }

        let mut end = last_complete?;
        if let Some(breaker) = breaker {
            loop {
                let pos = grid.position(children[end])?;
                if pos.y2 < breaker.y1 {
                    break;
                }
                if end == start {
                    return None;
                }
                end -= 1;
            }
            let mut trimmed = ColumnStats::new(grid.width());
            for child in &children[start..=end] {
                let pos = grid.position(*child)?;
                trimmed.counts[pos.x1 as usize] += 1;
                trimmed.rows.insert(pos.y1);
            }
            if !trimmed.is_complete() {
                return None;
            }
        }
        log::trace!("LayoutAnalyzer: table in {} from {} to {}", parent, start, end);
        Some(end)
    }

    /// Whether the given children of `parent` form a complete list.
    pub fn is_list(&self, tree: &AreaTree, parent: AreaId, children: &[AreaId]) -> bool {
        let scan = self.scan_list(tree, parent, children, 0);
        scan.items >= MIN_LIST_ITEMS && scan.end == Some(children.len().saturating_sub(1))
    }

    /// Index of the last child of a list starting at `start`, if any.
    pub fn find_list_end(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        children: &[AreaId],
        start: usize,
    ) -> Option<usize> {
        self.scan_list(tree, parent, children, start).end
    }

    /// Number of items of the list starting at `start` together with its end.
    pub(crate) fn list_run(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        children: &[AreaId],
        start: usize,
    ) -> Option<(usize, usize)> {
        let scan = self.scan_list(tree, parent, children, start);
        if scan.items >= MIN_LIST_ITEMS {
            scan.end.map(|end| (end, scan.items))
        } else {
            None
        }
    }

    fn scan_list(&self, tree: &AreaTree, parent: AreaId, children: &[AreaId], start: usize) -> ListScan {
        let mut scan = ListScan { end: None, items: 0 };
        if start >= children.len() {
            return scan;
        }
        let grid = tree.grid(parent);
        let Some(first) = grid.position(children[start]) else {
            return scan;
        };
        let first_column = first.x1;
        let mut styles: Vec<(NodeStyle, usize)> = Vec::new();
        let mut used_rows: HashSet<i32> = HashSet::new();

        for (i, child) in children.iter().enumerate().skip(start) {
            let Some(pos) = grid.position(*child) else {
                break;
            };
            if pos.x1 == first_column {
                if !is_item_text(&tree.text(*child)) {
                    break;
                }
                let style = tree.style(*child);
                let mut candidate = styles.clone();
                match candidate.iter_mut().find(|(s, _)| *s == style) {
                    Some((_, n)) => *n += 1,
                    None => candidate.push((style, 1)),
                }
                if !styles_acceptable(&candidate) {
                    break;
                }
                styles = candidate;
                scan.items += 1;
                used_rows.extend(pos.y1..=pos.y2);
            } else if pos.x1 > first_column && used_rows.contains(&pos.y1) {
                // continuation on an item's row
            } else {
                break;
            }
            scan.end = Some(i);
        }
        scan
    }
}

/// At most two styles, at most one of them used more than once, and a
/// secondary style must keep the font size of the primary one.
fn styles_acceptable(styles: &[(NodeStyle, usize)]) -> bool {
    if styles.len() > 2 {
        return false;
    }
    let repeated = styles.iter().filter(|(_, n)| *n > 1).count();
    let count_ok = repeated <= 1;
    let size_ok = match styles {
        [(a, _), (b, _)] => a.same_size(b),
        _ => true,
    };
    count_ok && size_ok
}

/// A list item starts with a capital letter (after any bullet) and is short.
fn is_item_text(text: &str) -> bool {
    let body = text.trim_start_matches(|c: char| c.is_whitespace() || is_bullet(c));
    let capital = body.chars().next().is_some_and(|c| c.is_uppercase());
    capital && body.split_whitespace().count() <= MAX_ITEM_WORDS
}

fn is_bullet(c: char) -> bool {
    matches!(c, '•' | '·' | '▪' | '◦' | '‣' | '-' | '–' | '*' | '>')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    fn tree_of(children: Vec<BoxSpec>) -> AreaTree {
        AreaTree::from_spec(BoxSpec::viewport(400, 400).with_children(children)).unwrap()
    }

    fn table(rows: i32) -> AreaTree {
        let mut boxes = Vec::new();
        for r in 0..rows {
            let y = 10 + r * 30;
            boxes.push(BoxSpec::text("Name", Rect::new(10, y, 100, y + 15)));
            boxes.push(BoxSpec::text("Value", Rect::new(150, y, 250, y + 15)));
        }
        tree_of(boxes)
    }

    #[test]
    fn test_three_by_two_is_table() {
        let tree = table(3);
        let root = tree.root();
        let analyzer = LayoutAnalyzer::new();
        assert!(analyzer.is_table(&tree, root, tree.children(root)));
        assert_eq!(analyzer.detect(&tree, root), LayoutType::Table);
    }

    #[test]
    fn test_two_rows_is_not_table() {
        let tree = table(2);
        let root = tree.root();
        assert!(!LayoutAnalyzer::new().is_table(&tree, root, tree.children(root)));
    }

    #[test]
    fn test_table_trimmed_before_spanning_child() {
        let mut boxes = Vec::new();
        for r in 0..3 {
            let y = 10 + r * 30;
            boxes.push(BoxSpec::text("Name", Rect::new(10, y, 100, y + 15)));
            boxes.push(BoxSpec::text("Value", Rect::new(150, y, 250, y + 15)));
        }
        boxes.push(BoxSpec::text("A footer spanning both columns", Rect::new(10, 120, 250, 135)));
        let tree = tree_of(boxes);
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        let analyzer = LayoutAnalyzer::new();
        assert_eq!(analyzer.find_table_end(&tree, root, &kids, 0), Some(5));
        assert!(!analyzer.is_table(&tree, root, &kids));
    }

    #[test]
    fn test_list_of_five() {
        let boxes = (0..5)
            .map(|i| BoxSpec::text(format!("Item number {}", i), Rect::new(20, 10 + i * 20, 200, 22 + i * 20)))
            .collect();
        let tree = tree_of(boxes);
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        let analyzer = LayoutAnalyzer::new();
        assert_eq!(analyzer.find_list_end(&tree, root, &kids, 0), Some(4));
        assert!(analyzer.is_list(&tree, root, &kids));
    }

    #[test]
    fn test_lowercase_item_ends_list() {
        let boxes = vec![
            BoxSpec::text("First", Rect::new(20, 10, 200, 22)),
            BoxSpec::text("Second", Rect::new(20, 30, 200, 42)),
            BoxSpec::text("third", Rect::new(20, 50, 200, 62)),
        ];
        let tree = tree_of(boxes);
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        let analyzer = LayoutAnalyzer::new();
        assert_eq!(analyzer.find_list_end(&tree, root, &kids, 0), Some(1));
        assert!(!analyzer.is_list(&tree, root, &kids));
    }

    #[test]
    fn test_item_text() {
        assert!(is_item_text("• Apples and pears"));
        assert!(!is_item_text("apples"));
        assert!(!is_item_text("One two three four five six seven eight nine ten eleven"));
    }

    #[test]
    fn test_style_rules() {
        let mut a = crate::area::TextStats::default();
        a.add_run(3, 12.0, false, false, crate::geometry::Color::BLACK);
        let mut b = crate::area::TextStats::default();
        b.add_run(3, 12.0, true, false, crate::geometry::Color::BLACK);
        let mut c = crate::area::TextStats::default();
        c.add_run(3, 18.0, true, false, crate::geometry::Color::BLACK);
        let (sa, sb, sc) = (NodeStyle::from_stats(&a), NodeStyle::from_stats(&b), NodeStyle::from_stats(&c));
        assert!(styles_acceptable(&[(sa, 4), (sb, 1)]));
        assert!(!styles_acceptable(&[(sa, 4), (sb, 2)]));
        assert!(!styles_acceptable(&[(sa, 4), (sc, 1)]));
    }
}

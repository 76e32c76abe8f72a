//! The area tree: an arena of area nodes with epoch-checked grids.

use serde::{Deserialize, Serialize};

use crate::boxes::{BoxId, BoxSpec, BoxTree};
use crate::error::Result;
use crate::geometry::Rect;
use crate::tagging::Tag;

use super::{Area, AreaGrid, NodeStyle, TextStats};

/// Index of a node in an [`AreaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AreaId(pub(crate) usize);

impl AreaId {
    /// Raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the children of a node are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutType {
    /// Regular flow
    #[default]
    Normal,
    /// Children form a table
    Table,
    /// Children form a list
    List,
}

/// A node of the area tree.
#[derive(Debug, Clone)]
pub struct AreaNode {
    id: AreaId,
    area: Area,
    parent: Option<AreaId>,
    children: Vec<AreaId>,
    epoch: u64,
    grid: Option<AreaGrid>,
    layout: LayoutType,
    markedness: f64,
    markedness_fixed: bool,
    importance: f64,
    atomic: bool,
    separated: bool,
    previous_on_line: Option<AreaId>,
    next_on_line: Option<AreaId>,
    tags: Vec<Tag>,
    removed: bool,
}

impl AreaNode {
    fn new(id: AreaId, area: Area, epoch: u64) -> Self {
        Self {
            id,
            area,
            parent: None,
            children: Vec::new(),
            epoch,
            grid: None,
            layout: LayoutType::Normal,
            markedness: 0.0,
            markedness_fixed: false,
            importance: 0.0,
            atomic: false,
            separated: false,
            previous_on_line: None,
            next_on_line: None,
            tags: Vec::new(),
            removed: false,
        }
    }

    /// Node identifier.
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// The wrapped area.
    pub fn area(&self) -> &Area {
        &self.area
    }

    /// Absolute bounds.
    pub fn bounds(&self) -> Rect {
        self.area.bounds()
    }

    /// Parent node.
    pub fn parent(&self) -> Option<AreaId> {
        self.parent
    }

    /// Child nodes in order.
    pub fn children(&self) -> &[AreaId] {
        &self.children
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Structural version; bumped on every edit of the node or its children.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Layout of the children.
    pub fn layout(&self) -> LayoutType {
        self.layout
    }

    /// Visual importance score.
    pub fn markedness(&self) -> f64 {
        self.markedness
    }

    /// Whether the markedness has been pinned.
    pub fn is_markedness_fixed(&self) -> bool {
        self.markedness_fixed
    }

    /// Importance assigned by downstream consumers.
    pub fn importance(&self) -> f64 {
        self.importance
    }

    /// Whether the children must keep their order.
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Whether the node was explicitly marked as separated.
    pub fn is_separated(&self) -> bool {
        self.separated
    }

    /// Preceding node on the same text line.
    pub fn previous_on_line(&self) -> Option<AreaId> {
        self.previous_on_line
    }

    /// Following node on the same text line.
    pub fn next_on_line(&self) -> Option<AreaId> {
        self.next_on_line
    }

    /// Assigned tags.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Whether the node was removed from the tree.
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Tree of visual areas built from a [`BoxTree`].
///
/// Nodes live in an arena and refer to each other by [`AreaId`]. Removed
/// nodes stay in the arena, marked as removed and detached. Every structural
/// edit bumps the epoch of the affected nodes; grids remember the epoch they
/// were built at and [`AreaTree::grid`] refuses to serve a stale one.
#[derive(Debug, Clone)]
pub struct AreaTree {
    boxes: BoxTree,
    nodes: Vec<AreaNode>,
    root: AreaId,
    clock: u64,
}

impl AreaTree {
    /// Build the basic area tree: one area per visually separated box,
    /// following the box nesting, with grids for every node.
    pub fn new(boxes: BoxTree) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: AreaId(0),
            clock: 0,
            boxes,
        };
        let root_box = tree.boxes.root();
        let root_area = Area::from_box(&tree.boxes, root_box);
        tree.root = tree.push(root_area);

        let mut stack: Vec<(BoxId, AreaId)> = vec![(root_box, tree.root)];
        while let Some((box_id, area_id)) = stack.pop() {
            let kids: Vec<BoxId> = tree.boxes.children(box_id).to_vec();
            for child in kids {
                let area = Area::from_box(&tree.boxes, child);
                let node = tree.push(area);
                tree.attach(area_id, node, None);
                stack.push((child, node));
            }
        }
        let built = tree.update_grids();
        log::debug!("AreaTree: {} basic areas, {} grids", tree.len(), built);
        tree
    }

    /// Build the box tree and the area tree from renderer input.
    pub fn from_spec(spec: BoxSpec) -> Result<Self> {
        Ok(Self::new(BoxTree::new(spec)?))
    }

    /// The underlying box tree.
    pub fn boxes(&self) -> &BoxTree {
        &self.boxes
    }

    /// The root node (the viewport area).
    pub fn root(&self) -> AreaId {
        self.root
    }

    /// Access a node.
    pub fn node(&self, id: AreaId) -> &AreaNode {
        &self.nodes[id.0]
    }

    /// The area of a node.
    pub fn area(&self, id: AreaId) -> &Area {
        &self.nodes[id.0].area
    }

    /// Absolute bounds of a node.
    pub fn bounds(&self, id: AreaId) -> Rect {
        self.nodes[id.0].area.bounds()
    }

    /// Children of a node.
    pub fn children(&self, id: AreaId) -> &[AreaId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node.
    pub fn parent(&self, id: AreaId) -> Option<AreaId> {
        self.nodes[id.0].parent
    }

    /// Whether a node has no children.
    pub fn is_leaf(&self, id: AreaId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// Position of a node among its siblings.
    pub fn child_index(&self, id: AreaId) -> Option<usize> {
        let parent = self.nodes[id.0].parent?;
        self.nodes[parent.0].children.iter().position(|c| *c == id)
    }

    /// Number of nodes in the tree (removed nodes excluded).
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    /// Whether the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes[self.root.0].children.is_empty()
    }

    /// All nodes of the subtree rooted at `id`, pre-order.
    pub fn descendants(&self, id: AreaId) -> Vec<AreaId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.nodes[cur.0].children.iter().rev().copied());
        }
        out
    }

    /// Leaves of the subtree rooted at `id`, in document order.
    pub fn leaves(&self, id: AreaId) -> Vec<AreaId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| self.is_leaf(*n))
            .collect()
    }

    /// Distance from the root.
    pub fn depth(&self, id: AreaId) -> usize {
        let mut depth = 0;
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.nodes[p.0].parent;
        }
        depth
    }

    /// Whether `ancestor` lies on the path from `id` to the root.
    pub fn is_ancestor(&self, ancestor: AreaId, id: AreaId) -> bool {
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes[p.0].parent;
        }
        false
    }

    // ---- grids -------------------------------------------------------

    /// Structural epoch of a node.
    pub fn epoch(&self, id: AreaId) -> u64 {
        self.nodes[id.0].epoch
    }

    /// Whether the node's grid matches its current children.
    pub fn has_valid_grid(&self, id: AreaId) -> bool {
        let node = &self.nodes[id.0];
        node.grid.as_ref().is_some_and(|g| g.epoch() == node.epoch)
    }

    /// The grid of a node.
    ///
    /// # Panics
    ///
    /// Panics when the grid is missing or was built before the last
    /// structural edit of the node. Call [`AreaTree::rebuild_grid`] or
    /// [`AreaTree::update_grids`] after editing.
    pub fn grid(&self, id: AreaId) -> &AreaGrid {
        let node = &self.nodes[id.0];
        match &node.grid {
            Some(grid) => {
                assert!(
                    grid.epoch() == node.epoch,
                    "stale grid for area {}: built at epoch {}, node is at epoch {}",
                    id,
                    grid.epoch(),
                    node.epoch
                );
                grid
            }
            None => panic!("area {} has no grid", id),
        }
    }

    /// Grid position of a node in its parent's grid.
    pub fn grid_position(&self, id: AreaId) -> Option<Rect> {
        let parent = self.nodes[id.0].parent?;
        self.grid(parent).position(id)
    }

    /// Rebuild the grid of one node.
    pub fn rebuild_grid(&mut self, id: AreaId) {
        let children: Vec<(AreaId, Rect)> = self.nodes[id.0]
            .children
            .iter()
            .map(|c| (*c, self.nodes[c.0].area.bounds()))
            .collect();
        let node = &self.nodes[id.0];
        let grid = AreaGrid::build(node.epoch, node.area.bounds(), &children);
        self.nodes[id.0].grid = Some(grid);
    }

    /// Make sure a node has a valid grid.
    pub fn ensure_grid(&mut self, id: AreaId) {
        if !self.has_valid_grid(id) {
            self.rebuild_grid(id);
        }
    }

    /// Rebuild every stale grid in the tree; returns how many were rebuilt.
    pub fn update_grids(&mut self) -> usize {
        let mut rebuilt = 0;
        for id in self.descendants(self.root) {
            if !self.has_valid_grid(id) {
                self.rebuild_grid(id);
                rebuilt += 1;
            }
        }
        rebuilt
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Mark a node's children as changed.
    fn invalidate(&mut self, id: AreaId) {
        let epoch = self.tick();
        self.nodes[id.0].epoch = epoch;
    }

    // ---- structural edits --------------------------------------------

    fn push(&mut self, area: Area) -> AreaId {
        let id = AreaId(self.nodes.len());
        let epoch = self.tick();
        self.nodes.push(AreaNode::new(id, area, epoch));
        id
    }

    fn attach(&mut self, parent: AreaId, child: AreaId, index: Option<usize>) {
        let bounds = self.nodes[child.0].area.bounds();
        self.nodes[child.0].parent = Some(parent);
        let kids = &mut self.nodes[parent.0].children;
        match index {
            Some(i) if i <= kids.len() => kids.insert(i, child),
            _ => kids.push(child),
        }
        self.invalidate(parent);
        self.grow_ancestors(child, &bounds);
    }

    fn detach(&mut self, child: AreaId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != child);
            self.invalidate(parent);
        }
    }

    /// Extend the ancestors of `id` so that they enclose `bounds`.
    fn grow_ancestors(&mut self, id: AreaId, bounds: &Rect) {
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            if self.nodes[p.0].area.bounds().encloses(bounds) {
                break;
            }
            self.nodes[p.0].area.extend_bounds(bounds);
            self.invalidate(p);
            if let Some(gp) = self.nodes[p.0].parent {
                self.invalidate(gp);
            }
            cur = self.nodes[p.0].parent;
        }
    }

    fn mark_removed(&mut self, id: AreaId) {
        for n in self.descendants(id) {
            let node = &mut self.nodes[n.0];
            node.removed = true;
            node.grid = None;
            self.clear_line_links_to(n);
        }
    }

    /// Add a new area as the last child of `parent`.
    pub fn add_child(&mut self, parent: AreaId, area: Area) -> AreaId {
        let id = self.push(area);
        self.attach(parent, id, None);
        id
    }

    /// Swap two children of a node.
    pub fn swap_children(&mut self, parent: AreaId, i: usize, j: usize) {
        self.nodes[parent.0].children.swap(i, j);
        self.invalidate(parent);
    }

    /// Join `other` into `target`.
    ///
    /// The area of `other` is absorbed, its children are appended to
    /// `target`, and `other` is removed from the tree. Same-line links that
    /// pointed at `other` are redirected to `target`.
    pub fn join(&mut self, target: AreaId, other: AreaId) {
        assert!(target != other, "cannot join area {} with itself", target);
        let absorbed = self.nodes[other.0].area.clone();
        self.nodes[target.0].area.absorb(&absorbed);
        self.nodes[target.0].markedness_fixed = false;

        let kids = std::mem::take(&mut self.nodes[other.0].children);
        for kid in &kids {
            self.nodes[kid.0].parent = Some(target);
        }
        self.nodes[target.0].children.extend(kids);

        let next = self.nodes[other.0].next_on_line;
        let prev = self.nodes[other.0].previous_on_line;
        for tag in self.nodes[other.0].tags.clone() {
            self.add_tag(target, tag);
        }

        self.detach(other);
        self.nodes[other.0].removed = true;
        self.nodes[other.0].grid = None;
        for node in &mut self.nodes {
            if node.previous_on_line == Some(other) {
                node.previous_on_line = Some(target);
            }
            if node.next_on_line == Some(other) {
                node.next_on_line = Some(target);
            }
        }
        let t = &mut self.nodes[target.0];
        if t.next_on_line == Some(target) {
            t.next_on_line = next.filter(|n| *n != target);
        }
        if t.previous_on_line == Some(target) {
            t.previous_on_line = prev.filter(|n| *n != target);
        }

        self.invalidate(target);
        if let Some(parent) = self.nodes[target.0].parent {
            self.invalidate(parent);
        }
        let bounds = self.nodes[target.0].area.bounds();
        self.grow_ancestors(target, &bounds);
    }

    /// Absorb a child's area into its parent, promoting the child's children
    /// to its former position.
    pub fn join_child(&mut self, target: AreaId, child: AreaId) {
        assert_eq!(self.nodes[child.0].parent, Some(target), "area {} is not a child of {}", child, target);
        let absorbed = self.nodes[child.0].area.clone();
        self.nodes[target.0].area.absorb(&absorbed);
        self.nodes[target.0].markedness_fixed = false;

        let index = self.child_index(child).unwrap_or(0);
        let kids = std::mem::take(&mut self.nodes[child.0].children);
        self.detach(child);
        self.nodes[child.0].removed = true;
        self.nodes[child.0].grid = None;
        for (offset, kid) in kids.into_iter().enumerate() {
            self.nodes[kid.0].parent = Some(target);
            self.nodes[target.0].children.insert(index + offset, kid);
        }
        self.clear_line_links_to(child);
        self.invalidate(target);
    }

    fn clear_line_links_to(&mut self, id: AreaId) {
        for node in &mut self.nodes {
            if node.previous_on_line == Some(id) {
                node.previous_on_line = None;
            }
            if node.next_on_line == Some(id) {
                node.next_on_line = None;
            }
        }
    }

    /// Wrap some children of `parent` into a new synthetic area.
    ///
    /// The new node is inserted where the first selected child was, and the
    /// selected children move under it in their current order. Returns
    /// `None` if nothing was selected.
    pub fn create_super_area(&mut self, parent: AreaId, selected: &[AreaId]) -> Option<AreaId> {
        let mut ordered: Vec<(usize, AreaId)> = selected
            .iter()
            .filter_map(|id| {
                self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|c| c == id)
                    .map(|i| (i, *id))
            })
            .collect();
        if ordered.is_empty() {
            return None;
        }
        ordered.sort_unstable();
        ordered.dedup();

        let bounds = ordered
            .iter()
            .map(|(_, id)| self.nodes[id.0].area.bounds())
            .reduce(|a, b| a.union(&b))?;
        let background = self.nodes[parent.0].area.efficient_background();
        let index = ordered[0].0;

        let id = self.push(Area::new(bounds, background));
        for (_, child) in &ordered {
            self.detach(*child);
        }
        self.attach(parent, id, Some(index));
        for (_, child) in &ordered {
            self.attach(id, *child, None);
        }
        log::trace!("AreaTree: super area {} at {} over {} children", id, bounds, ordered.len());
        Some(id)
    }

    /// Replace the subtree of `id` by a single leaf carrying all its boxes
    /// and its concatenated text.
    pub fn collapse(&mut self, id: AreaId) {
        if self.is_leaf(id) {
            return;
        }
        let boxes = self.subtree_boxes(id);
        let text = self.text(id);
        let stats = self.stats(id);
        let kids = std::mem::take(&mut self.nodes[id.0].children);
        for kid in kids {
            self.nodes[kid.0].parent = None;
            self.mark_removed(kid);
        }
        self.nodes[id.0].area.replace_content(boxes, text, stats);
        self.invalidate(id);
    }

    // ---- attributes --------------------------------------------------

    /// Record that `next` follows `prev` on the same text line.
    pub fn set_line_link(&mut self, prev: AreaId, next: AreaId) {
        if prev == next {
            return;
        }
        self.nodes[prev.0].next_on_line = Some(next);
        self.nodes[next.0].previous_on_line = Some(prev);
    }

    /// Set the layout type of a node.
    pub fn set_layout(&mut self, id: AreaId, layout: LayoutType) {
        self.nodes[id.0].layout = layout;
    }

    /// Set the markedness of a node unless it was fixed.
    pub fn set_markedness(&mut self, id: AreaId, value: f64) {
        let node = &mut self.nodes[id.0];
        if !node.markedness_fixed {
            node.markedness = value;
        }
    }

    /// Pin the markedness of a node; later feature passes keep it.
    pub fn fix_markedness(&mut self, id: AreaId, value: f64) {
        let node = &mut self.nodes[id.0];
        node.markedness = value;
        node.markedness_fixed = true;
    }

    /// Set the importance of a node.
    pub fn set_importance(&mut self, id: AreaId, value: f64) {
        self.nodes[id.0].importance = value;
    }

    /// Exempt the children of a node from reordering.
    pub fn set_atomic(&mut self, id: AreaId, atomic: bool) {
        self.nodes[id.0].atomic = atomic;
    }

    /// Mark a node as explicitly separated.
    pub fn set_separated(&mut self, id: AreaId, separated: bool) {
        self.nodes[id.0].separated = separated;
    }

    /// Attach a tag; returns false if a tag of that name was already present.
    pub fn add_tag(&mut self, id: AreaId, tag: Tag) -> bool {
        let tags = &mut self.nodes[id.0].tags;
        if tags.contains(&tag) {
            false
        } else {
            tags.push(tag);
            true
        }
    }

    /// Whether a node carries a tag.
    pub fn has_tag(&self, id: AreaId, tag: &Tag) -> bool {
        self.nodes[id.0].tags.contains(tag)
    }

    /// Remove all tags from the tree.
    pub fn clear_tags(&mut self) {
        for node in &mut self.nodes {
            node.tags.clear();
        }
    }

    // ---- projections -------------------------------------------------

    /// Text of the subtree, own text first, joined with spaces.
    pub fn text(&self, id: AreaId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for n in self.descendants(id) {
            let text = self.nodes[n.0].area.text();
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    /// Text statistics of the whole subtree.
    pub fn stats(&self, id: AreaId) -> TextStats {
        let mut stats = TextStats::default();
        for n in self.descendants(id) {
            stats.merge(self.nodes[n.0].area.stats());
        }
        stats
    }

    /// Style snapshot of the subtree.
    pub fn style(&self, id: AreaId) -> NodeStyle {
        NodeStyle::from_stats(&self.stats(id))
    }

    /// Average font size of the subtree.
    pub fn font_size(&self, id: AreaId) -> f64 {
        self.stats(id).font_size()
    }

    /// All boxes of the subtree.
    pub fn subtree_boxes(&self, id: AreaId) -> Vec<BoxId> {
        self.descendants(id)
            .into_iter()
            .flat_map(|n| self.nodes[n.0].area.boxes().to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_words() -> AreaTree {
        let page = BoxSpec::viewport(200, 100)
            .with_child(BoxSpec::text("Hello", Rect::new(0, 0, 50, 10)))
            .with_child(BoxSpec::text("World", Rect::new(55, 0, 100, 10)));
        AreaTree::from_spec(page).unwrap()
    }

    #[test]
    fn test_basic_areas() {
        let tree = two_words();
        assert_eq!(tree.children(tree.root()).len(), 2);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.text(tree.root()), "Hello World");
        assert!(tree.has_valid_grid(tree.root()));
    }

    #[test]
    fn test_join_extends_bounds() {
        let mut tree = two_words();
        let kids = tree.children(tree.root()).to_vec();
        let before = tree.bounds(kids[0]).union(&tree.bounds(kids[1]));
        tree.join(kids[0], kids[1]);
        assert!(tree.bounds(kids[0]).encloses(&before));
        assert_eq!(tree.children(tree.root()), &[kids[0]]);
        assert!(tree.node(kids[1]).is_removed());
        assert_eq!(tree.area(kids[0]).text(), "Hello World");
    }

    #[test]
    #[should_panic(expected = "stale grid")]
    fn test_stale_grid_panics() {
        let mut tree = two_words();
        let kids = tree.children(tree.root()).to_vec();
        tree.join(kids[0], kids[1]);
        let _ = tree.grid(tree.root());
    }

    #[test]
    fn test_update_grids_after_edit() {
        let mut tree = two_words();
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        tree.join(kids[0], kids[1]);
        assert!(!tree.has_valid_grid(root));
        assert!(tree.update_grids() >= 1);
        assert!(tree.has_valid_grid(root));
        assert!(tree.grid_position(kids[0]).is_some());
    }

    #[test]
    fn test_create_super_area() {
        let page = BoxSpec::viewport(200, 200)
            .with_child(BoxSpec::text("A", Rect::new(0, 0, 50, 10)))
            .with_child(BoxSpec::text("B", Rect::new(0, 20, 50, 30)))
            .with_child(BoxSpec::text("C", Rect::new(0, 40, 50, 50)));
        let mut tree = AreaTree::from_spec(page).unwrap();
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        let sup = tree.create_super_area(root, &[kids[2], kids[1]]).unwrap();
        assert_eq!(tree.children(root), &[kids[0], sup]);
        assert_eq!(tree.children(sup), &[kids[1], kids[2]]);
        assert_eq!(tree.bounds(sup), Rect::new(0, 20, 50, 50));
        assert!(tree.create_super_area(root, &[]).is_none());
    }

    #[test]
    fn test_collapse() {
        let page = BoxSpec::viewport(200, 200).with_child(
            BoxSpec::container(Rect::new(0, 0, 100, 60))
                .with_background(crate::geometry::Color::rgb(0, 0, 200))
                .with_child(BoxSpec::text("One", Rect::new(0, 0, 50, 10)))
                .with_child(BoxSpec::text("Two", Rect::new(0, 20, 50, 30))),
        );
        let mut tree = AreaTree::from_spec(page).unwrap();
        let block = tree.children(tree.root())[0];
        assert_eq!(tree.children(block).len(), 2);
        tree.collapse(block);
        assert!(tree.is_leaf(block));
        assert_eq!(tree.area(block).text(), "One Two");
        assert_eq!(tree.area(block).boxes().len(), 3);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_fixed_markedness_is_kept() {
        let mut tree = two_words();
        let id = tree.children(tree.root())[0];
        tree.fix_markedness(id, 42.0);
        tree.set_markedness(id, 1.0);
        assert_eq!(tree.node(id).markedness(), 42.0);
    }
}

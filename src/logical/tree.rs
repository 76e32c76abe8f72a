//! The logical tree: document structure over area nodes.

use crate::area::{AreaId, AreaTree};

use super::NodeJoinAnalyzer;

/// Index of a node in a [`LogicalTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalId(pub(crate) usize);

impl LogicalId {
    /// Raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A logical unit: one or more sibling areas.
#[derive(Debug, Clone)]
pub struct LogicalNode {
    id: LogicalId,
    areas: Vec<AreaId>,
    content_tree: Option<AreaId>,
    parent: Option<LogicalId>,
    children: Vec<LogicalId>,
}

impl LogicalNode {
    /// Node identifier.
    pub fn id(&self) -> LogicalId {
        self.id
    }

    /// Area nodes represented by this logical node.
    pub fn areas(&self) -> &[AreaId] {
        &self.areas
    }

    /// The first represented area.
    pub fn first_area(&self) -> AreaId {
        self.areas[0]
    }

    /// Area subtree folded into this node instead of logical children.
    pub fn content_tree(&self) -> Option<AreaId> {
        self.content_tree
    }

    /// Parent node.
    pub fn parent(&self) -> Option<LogicalId> {
        self.parent
    }

    /// Child nodes.
    pub fn children(&self) -> &[LogicalId] {
        &self.children
    }

    /// Whether the node has no logical children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Hierarchy of logical units built from an area tree.
#[derive(Debug, Clone)]
pub struct LogicalTree {
    nodes: Vec<LogicalNode>,
    root: LogicalId,
}

impl LogicalTree {
    /// Create a tree whose root represents `root_area`.
    pub fn new(root_area: AreaId) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: LogicalId(0),
        };
        tree.root = tree.push(vec![root_area], None);
        tree
    }

    pub(crate) fn push(&mut self, areas: Vec<AreaId>, content_tree: Option<AreaId>) -> LogicalId {
        let id = LogicalId(self.nodes.len());
        self.nodes.push(LogicalNode {
            id,
            areas,
            content_tree,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn attach(&mut self, parent: LogicalId, child: LogicalId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// The root node.
    pub fn root(&self) -> LogicalId {
        self.root
    }

    /// Access a node.
    pub fn node(&self, id: LogicalId) -> &LogicalNode {
        &self.nodes[id.0]
    }

    /// Children of a node.
    pub fn children(&self, id: LogicalId) -> &[LogicalId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node.
    pub fn parent(&self, id: LogicalId) -> Option<LogicalId> {
        self.nodes[id.0].parent
    }

    /// Areas represented by a node.
    pub fn areas(&self, id: LogicalId) -> &[AreaId] {
        &self.nodes[id.0].areas
    }

    /// Distance from the root.
    pub fn depth(&self, id: LogicalId) -> usize {
        let mut depth = 0;
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.nodes[p.0].parent;
        }
        depth
    }

    /// Nodes of the subtree rooted at `id`, pre-order.
    pub fn descendants(&self, id: LogicalId) -> Vec<LogicalId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.nodes[cur.0].children.iter().rev().copied());
        }
        out
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[self.root.0].children.is_empty()
    }

    /// The node representing an area, if any.
    pub fn find_by_area(&self, area: AreaId) -> Option<LogicalId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.nodes[id.0].areas.contains(&area))
    }

    /// Insert a new node representing `area` between `id` and its parent.
    pub(crate) fn wrap(&mut self, id: LogicalId, area: AreaId) -> LogicalId {
        let wrapper = self.push(vec![area], None);
        if let Some(parent) = self.nodes[id.0].parent {
            let kids = &mut self.nodes[parent.0].children;
            if let Some(i) = kids.iter().position(|c| *c == id) {
                kids[i] = wrapper;
            }
            self.nodes[wrapper.0].parent = Some(parent);
        }
        self.nodes[id.0].parent = Some(wrapper);
        self.nodes[wrapper.0].children.push(id);
        wrapper
    }

    /// Text of the node's own areas.
    ///
    /// Areas standing for a whole area subtree (leaves and content trees)
    /// contribute their full text, others only their own text.
    pub fn own_text(&self, areas: &AreaTree, id: LogicalId) -> String {
        let node = &self.nodes[id.0];
        let parts: Vec<String> = node
            .areas
            .iter()
            .map(|a| {
                if node.content_tree == Some(*a) || areas.is_leaf(*a) {
                    areas.text(*a)
                } else {
                    areas.area(*a).text().to_string()
                }
            })
            .filter(|t| !t.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Plain text of a subtree, one logical unit per line.
    pub fn text(&self, areas: &AreaTree, id: LogicalId) -> String {
        self.descendants(id)
            .into_iter()
            .map(|n| self.own_text(areas, n))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Indented outline of the whole tree.
    pub fn outline(&self, areas: &AreaTree) -> String {
        let mut out = String::new();
        for id in self.descendants(self.root) {
            let text = self.own_text(areas, id);
            if text.is_empty() {
                continue;
            }
            let depth = self.depth(id).saturating_sub(1);
            out.push_str(&"  ".repeat(depth));
            out.push_str(&text);
            out.push('\n');
        }
        out
    }

    /// Merge adjacent sibling nodes that the analyzer considers joinable.
    ///
    /// The second node's areas and children move to the first one. Returns
    /// the number of merges.
    pub fn join_siblings(&mut self, areas: &AreaTree, analyzer: &dyn NodeJoinAnalyzer) -> usize {
        let mut joined = 0;
        for parent in self.descendants(self.root) {
            let mut i = 0;
            while i + 1 < self.nodes[parent.0].children.len() {
                let a = self.nodes[parent.0].children[i];
                let b = self.nodes[parent.0].children[i + 1];
                if analyzer.is_joinable(areas, self, a, b) {
                    let moved_areas = std::mem::take(&mut self.nodes[b.0].areas);
                    let moved_kids = std::mem::take(&mut self.nodes[b.0].children);
                    for kid in &moved_kids {
                        self.nodes[kid.0].parent = Some(a);
                    }
                    self.nodes[a.0].areas.extend(moved_areas);
                    self.nodes[a.0].children.extend(moved_kids);
                    if self.nodes[a.0].content_tree.is_none() {
                        self.nodes[a.0].content_tree = self.nodes[b.0].content_tree;
                    }
                    self.nodes[b.0].parent = None;
                    self.nodes[parent.0].children.remove(i + 1);
                    joined += 1;
                } else {
                    i += 1;
                }
            }
        }
        if joined > 0 {
            log::debug!("LogicalTree: joined {} sibling pairs", joined);
        }
        joined
    }
}

//! Box tree: rendered boxes re-nested by geometric containment.
//!
//! The renderer's own hierarchy is only used for paint order. Boxes are
//! flattened and nested twice: first by their content bounds, to compute
//! inherited backgrounds and visual bounds, then by their visual bounds
//! restricted to boxes that are visually separated from their surroundings.
//! The second tree is the input of the area tree.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::{Color, Rect};

use super::spec::{BorderWidths, BoxSpec, FontSpec, ReplacedContent};

/// Minimal share of the child's area that must overlap a parent candidate
/// when the paint order decides the containment.
const SHARED_AREA_RATIO: f64 = 0.9;

/// Corners closer than this to the parent edge are not "inside with overlap".
const CORNER_OVERLAP: i32 = 1;

/// Index of a node in a [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub(crate) usize);

impl BoxId {
    /// Raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a box renders.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// The page viewport (tree root)
    Viewport,
    /// A block or inline container
    Container,
    /// A text run
    Text(String),
    /// Replaced content such as an image
    Replaced(ReplacedContent),
}

/// Which rectangle drives a nesting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NestBy {
    Content,
    Visual,
}

/// A box in the tree together with its derived geometry.
#[derive(Debug, Clone)]
pub struct BoxNode {
    id: BoxId,
    order: usize,
    kind: BoxKind,
    border: BorderWidths,
    background: Option<Color>,
    color: Color,
    font: FontSpec,
    clip: Option<Rect>,
    content_bounds: Rect,
    visual_bounds: Option<Rect>,
    bounds: Rect,
    background_separated: bool,
    efficient_background: Color,
    nearest_parent: Option<BoxId>,
    parent: Option<BoxId>,
    children: Vec<BoxId>,
}

impl BoxNode {
    fn new(id: BoxId, order: usize, kind: BoxKind, spec: &BoxSpec, content_bounds: Rect) -> Self {
        Self {
            id,
            order,
            kind,
            border: spec.border,
            background: spec.background,
            color: spec.color.unwrap_or_default(),
            font: spec.font.clone(),
            clip: spec.clip,
            content_bounds,
            visual_bounds: None,
            bounds: content_bounds,
            background_separated: false,
            efficient_background: Color::WHITE,
            nearest_parent: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node identifier.
    pub fn id(&self) -> BoxId {
        self.id
    }

    /// Paint order (0 for the viewport, increasing in document order).
    pub fn order(&self) -> usize {
        self.order
    }

    /// What the box renders.
    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    /// Text content for text boxes.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BoxKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the box is a text box.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, BoxKind::Text(_))
    }

    /// Whether the box renders replaced content.
    pub fn is_replaced(&self) -> bool {
        matches!(self.kind, BoxKind::Replaced(_))
    }

    /// Border widths.
    pub fn border(&self) -> &BorderWidths {
        &self.border
    }

    /// Declared background color.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Text color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Font metrics.
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Renderer bounds clipped to the clip rectangle.
    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    /// Bounds of what is actually visible (borders, background, text, images).
    pub fn visual_bounds(&self) -> Option<Rect> {
        self.visual_bounds
    }

    /// Union of the visual bounds and the bounds of all child nodes.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the background differs from the one inherited from the parent.
    pub fn is_background_separated(&self) -> bool {
        self.background_separated
    }

    /// Background color in effect for this box (own or inherited).
    pub fn efficient_background(&self) -> Color {
        self.efficient_background
    }

    /// Parent node.
    pub fn parent(&self) -> Option<BoxId> {
        self.parent
    }

    /// Child nodes in paint order.
    pub fn children(&self) -> &[BoxId] {
        &self.children
    }

    /// Whether the box stands out visually from its surroundings.
    pub fn is_visually_separated(&self) -> bool {
        match self.kind {
            BoxKind::Viewport => true,
            BoxKind::Text(_) | BoxKind::Replaced(_) => true,
            BoxKind::Container => self.border.count() > 0 || self.background_separated,
        }
    }

    fn nest_bounds(&self, by: NestBy) -> Option<Rect> {
        match by {
            NestBy::Content => Some(self.content_bounds),
            NestBy::Visual => self.visual_bounds,
        }
    }
}

/// Decide whether `parent` visually encloses `child`.
///
/// Counts the child's corners inside the parent, both with a small overlap
/// margin and exactly. Full overlaps and corner overlaps are decided by the
/// paint order, requiring most of the child's area to be shared; partial
/// overlaps are decided the same way unless the child in turn contains the
/// parent.
pub fn visually_encloses(parent: &Rect, parent_order: usize, child: &Rect, child_order: usize) -> bool {
    let corners = |r: &Rect| [(r.x1, r.y1), (r.x2, r.y1), (r.x1, r.y2), (r.x2, r.y2)];

    let inner = Rect::new(
        parent.x1 + CORNER_OVERLAP,
        parent.y1 + CORNER_OVERLAP,
        parent.x2 - CORNER_OVERLAP,
        parent.y2 - CORNER_OVERLAP,
    );
    let overlap_count = corners(child)
        .iter()
        .filter(|(x, y)| inner.contains(*x, *y))
        .count();
    let exact_count = corners(child)
        .iter()
        .filter(|(x, y)| parent.contains(*x, *y))
        .count();
    let reverse_count = corners(parent)
        .iter()
        .filter(|(x, y)| child.contains(*x, *y))
        .count();

    let child_area = child.area();
    let shared = if child_area > 0 {
        parent.intersection(child).area() as f64 / child_area as f64
    } else {
        0.0
    };
    let order_decides = parent_order < child_order && shared >= SHARED_AREA_RATIO;

    if exact_count == 0 {
        false
    } else if parent == child || (overlap_count == 1 && exact_count <= 1) {
        order_decides
    } else if exact_count == 4 {
        true
    } else if exact_count >= 2 {
        reverse_count != 4 && order_decides
    } else {
        false
    }
}

/// A page's boxes nested by geometric containment.
#[derive(Debug, Clone)]
pub struct BoxTree {
    nodes: Vec<BoxNode>,
    root: BoxId,
}

impl BoxTree {
    /// Build the box tree from the renderer's viewport box.
    pub fn new(viewport: BoxSpec) -> Result<Self> {
        if viewport.bounds.is_empty() {
            return Err(Error::EmptyPage);
        }
        validate(&viewport)?;

        let mut tree = Self {
            nodes: Vec::new(),
            root: BoxId(0),
        };
        let root_bounds = match viewport.clip {
            Some(clip) => viewport.bounds.clip(&clip),
            None => viewport.bounds,
        };
        if root_bounds.is_empty() {
            return Err(Error::EmptyPage);
        }
        tree.nodes
            .push(BoxNode::new(BoxId(0), 0, BoxKind::Viewport, &viewport, root_bounds));
        tree.flatten(&viewport)?;
        log::debug!("BoxTree: {} visible boxes", tree.nodes.len() - 1);

        let all: Vec<BoxId> = (1..tree.nodes.len()).map(BoxId).collect();
        tree.nest(&all, NestBy::Content);
        tree.compute_backgrounds();
        tree.compute_visual_bounds();

        let separated: Vec<BoxId> = all
            .into_iter()
            .filter(|id| {
                let node = tree.node(*id);
                node.is_visually_separated() && node.visual_bounds.is_some()
            })
            .collect();
        log::debug!("BoxTree: {} visually separated boxes", separated.len());
        tree.nest(&separated, NestBy::Visual);
        tree.compute_bounds();

        Ok(tree)
    }

    /// Build the box tree from renderer JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: BoxSpec = serde_json::from_str(json)?;
        Self::new(spec)
    }

    /// Build the box tree from a reader producing renderer JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let spec: BoxSpec = serde_json::from_reader(reader)?;
        Self::new(spec)
    }

    /// Build the box tree from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// The viewport node.
    pub fn root(&self) -> BoxId {
        self.root
    }

    /// Access a node.
    pub fn node(&self, id: BoxId) -> &BoxNode {
        &self.nodes[id.0]
    }

    /// Children of a node in the final (visual) nesting.
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        &self.nodes[id.0].children
    }

    /// Number of boxes including the viewport.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the viewport.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over all nodes in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxNode> {
        self.nodes.iter()
    }

    /// Nodes reachable from the root in the final nesting, pre-order.
    pub fn descendants(&self, id: BoxId) -> Vec<BoxId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.nodes[cur.0].children.iter().rev().copied());
        }
        out
    }

    /// Flatten the visible, non-empty boxes in paint order.
    fn flatten(&mut self, viewport: &BoxSpec) -> Result<()> {
        let mut stack: Vec<&BoxSpec> = viewport.children.iter().rev().collect();
        while let Some(spec) = stack.pop() {
            validate(spec)?;
            stack.extend(spec.children.iter().rev());

            if !spec.visible {
                continue;
            }
            let bounds = match spec.clip {
                Some(clip) => spec.bounds.clip(&clip),
                None => spec.bounds,
            };
            if bounds.is_empty() {
                continue;
            }
            let kind = if let Some(replaced) = &spec.replaced {
                BoxKind::Replaced(replaced.clone())
            } else if let Some(text) = &spec.text {
                if !spec.has_text() {
                    continue;
                }
                BoxKind::Text(text.trim().to_string())
            } else {
                BoxKind::Container
            };
            let id = BoxId(self.nodes.len());
            self.nodes.push(BoxNode::new(id, id.0, kind, spec, bounds));
        }
        Ok(())
    }

    /// Re-nest `candidates` under the root by containment of the given bounds.
    ///
    /// Boxes that are not candidates are detached from the tree.
    fn nest(&mut self, candidates: &[BoxId], by: NestBy) {
        for node in &mut self.nodes {
            node.parent = None;
            node.children.clear();
            node.nearest_parent = None;
        }

        for &child in candidates {
            let Some(child_rect) = self.nodes[child.0].nest_bounds(by) else {
                continue;
            };
            let child_order = self.nodes[child.0].order;
            let mut nearest: Option<BoxId> = None;
            for &cand in candidates {
                if cand == child {
                    continue;
                }
                let Some(cand_rect) = self.nodes[cand.0].nest_bounds(by) else {
                    continue;
                };
                let cand_order = self.nodes[cand.0].order;
                if !visually_encloses(&cand_rect, cand_order, &child_rect, child_order) {
                    continue;
                }
                nearest = match nearest {
                    None => Some(cand),
                    Some(best) => {
                        let best_node = &self.nodes[best.0];
                        let tighter = best_node.nest_bounds(by).is_some_and(|best_rect| {
                            visually_encloses(&best_rect, best_node.order, &cand_rect, cand_order)
                        });
                        if tighter {
                            Some(cand)
                        } else {
                            Some(best)
                        }
                    }
                };
            }
            self.nodes[child.0].nearest_parent = nearest;
        }

        let root = self.root;
        for &child in candidates {
            let parent = self.nodes[child.0].nearest_parent.unwrap_or(root);
            self.nodes[child.0].parent = Some(parent);
        }

        // Overlapping boxes may point at each other; reattach loops to the root.
        let limit = candidates.len() + 1;
        for &child in candidates {
            let mut cur = self.nodes[child.0].parent;
            let mut steps = 0;
            while let Some(p) = cur {
                if p == child {
                    log::trace!("BoxTree: breaking nesting cycle at box {}", child.0);
                    self.nodes[child.0].parent = Some(root);
                    break;
                }
                if p == root || steps > limit {
                    break;
                }
                cur = self.nodes[p.0].parent;
                steps += 1;
            }
        }

        let mut ordered: Vec<BoxId> = candidates.to_vec();
        ordered.sort_by_key(|id| self.nodes[id.0].order);
        for child in ordered {
            if let Some(parent) = self.nodes[child.0].parent {
                self.nodes[parent.0].children.push(child);
            }
        }
    }

    /// Propagate backgrounds top-down and mark background-separated boxes.
    fn compute_backgrounds(&mut self) {
        let root = self.root;
        let root_bg = self.nodes[root.0].background.unwrap_or(Color::WHITE);
        self.nodes[root.0].efficient_background = root_bg;
        self.nodes[root.0].background_separated = false;

        let mut stack: Vec<BoxId> = self.nodes[root.0].children.clone();
        while let Some(id) = stack.pop() {
            let inherited = self.nodes[id.0]
                .parent
                .map(|p| self.nodes[p.0].efficient_background)
                .unwrap_or(root_bg);
            let node = &mut self.nodes[id.0];
            match node.background {
                Some(bg) => {
                    node.efficient_background = bg;
                    node.background_separated = bg != inherited;
                }
                None => {
                    node.efficient_background = inherited;
                    node.background_separated = false;
                }
            }
            stack.extend(node.children.iter().copied());
        }
    }

    /// Compute visual bounds bottom-up over the content nesting.
    fn compute_visual_bounds(&mut self) {
        for id in self.post_order() {
            let visual = self.synthesize_visual_bounds(id);
            self.nodes[id.0].visual_bounds = visual;
        }
    }

    fn synthesize_visual_bounds(&self, id: BoxId) -> Option<Rect> {
        let node = &self.nodes[id.0];
        let own = node.content_bounds;
        let borders = node.border.count();

        let visual = match node.kind {
            BoxKind::Viewport | BoxKind::Text(_) | BoxKind::Replaced(_) => own,
            BoxKind::Container => {
                if borders >= 2 || (borders == 1 && node.background_separated) {
                    own
                } else if borders == 1 {
                    border_strip(&own, &node.border)
                } else if node.background_separated {
                    own
                } else {
                    let mut union: Option<Rect> = None;
                    for child in &node.children {
                        if let Some(v) = self.nodes[child.0].visual_bounds {
                            union = Some(match union {
                                Some(u) => u.union(&v),
                                None => v,
                            });
                        }
                    }
                    union?
                }
            }
        };

        let clipped = match node.clip {
            Some(clip) => visual.clip(&clip),
            None => visual,
        };
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }

    /// Compute the final bounds bottom-up over the visual nesting.
    fn compute_bounds(&mut self) {
        for id in self.post_order() {
            let node = &self.nodes[id.0];
            let mut bounds = node.visual_bounds.unwrap_or(node.content_bounds);
            for child in &node.children {
                bounds = bounds.union(&self.nodes[child.0].bounds);
            }
            self.nodes[id.0].bounds = bounds;
        }
    }

    fn post_order(&self) -> Vec<BoxId> {
        let mut out = self.descendants(self.root);
        out.reverse();
        out
    }
}

/// The thin strip covered by the single border of a box.
fn border_strip(bounds: &Rect, border: &BorderWidths) -> Rect {
    if border.top > 0 {
        Rect::new(bounds.x1, bounds.y1, bounds.x2, bounds.y1 + border.top - 1)
    } else if border.bottom > 0 {
        Rect::new(bounds.x1, bounds.y2 - border.bottom + 1, bounds.x2, bounds.y2)
    } else if border.left > 0 {
        Rect::new(bounds.x1, bounds.y1, bounds.x1 + border.left - 1, bounds.y2)
    } else {
        Rect::new(bounds.x2 - border.right + 1, bounds.y1, bounds.x2, bounds.y2)
    }
}

fn validate(spec: &BoxSpec) -> Result<()> {
    let b = spec.bounds;
    if b.x2 < b.x1 - 1 || b.y2 < b.y1 - 1 {
        return Err(Error::InvalidBox(format!("inverted bounds {}", b)));
    }
    if spec.border.is_negative() {
        return Err(Error::InvalidBox(format!("negative border at {}", b)));
    }
    Ok(())
}

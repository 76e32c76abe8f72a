//! Application of all taggers to an area tree.

use rayon::prelude::*;

use crate::area::{AreaId, AreaTree};

use super::{Tag, TaggerRegistry};

/// Runs every registered tagger over the leaves of an area tree.
///
/// Matching reads the tree only and may run in parallel; tags are attached
/// afterwards in document order. A second pass extends tagged runs: a leaf
/// following a leaf tagged `t` receives `t` when the tagger of `t` accepts
/// it as a continuation.
#[derive(Debug, Clone)]
pub struct TreeTagger {
    registry: TaggerRegistry,
    parallel: bool,
}

impl TreeTagger {
    /// Create a tree tagger applying every tagger in `registry`.
    pub fn new(registry: TaggerRegistry) -> Self {
        Self {
            registry,
            parallel: false,
        }
    }

    /// Match leaves in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The taggers applied.
    pub fn registry(&self) -> &TaggerRegistry {
        &self.registry
    }

    /// Tags whose taggers claim a leaf.
    pub fn matching_tags(&self, tree: &AreaTree, id: AreaId) -> Vec<Tag> {
        self.registry
            .taggers()
            .filter(|t| t.belongs_to(tree, id))
            .map(|t| t.tag())
            .collect()
    }

    /// Tag the leaves of `tree`; returns the number of tags attached.
    pub fn tag(&self, tree: &mut AreaTree) -> usize {
        let leaves = tree.leaves(tree.root());
        let matches: Vec<(AreaId, Vec<Tag>)> = {
            let shared: &AreaTree = tree;
            if self.parallel {
                leaves
                    .par_iter()
                    .map(|id| (*id, self.matching_tags(shared, *id)))
                    .collect()
            } else {
                leaves
                    .iter()
                    .map(|id| (*id, self.matching_tags(shared, *id)))
                    .collect()
            }
        };

        let mut attached = 0;
        for (id, tags) in matches {
            for tag in tags {
                if tree.add_tag(id, tag) {
                    attached += 1;
                }
            }
        }

        let mut continued = 0;
        for tagger in self.registry.taggers() {
            let tag = tagger.tag();
            for pair in leaves.windows(2) {
                let (prev, next) = (pair[0], pair[1]);
                if tree.has_tag(prev, &tag)
                    && !tree.has_tag(next, &tag)
                    && tagger.allows_continuation(tree, next)
                    && tree.add_tag(next, tag.clone())
                {
                    continued += 1;
                }
            }
        }

        log::debug!(
            "TreeTagger: {} tags on {} leaves, {} continuations",
            attached,
            leaves.len(),
            continued
        );
        attached + continued
    }
}

impl Default for TreeTagger {
    fn default() -> Self {
        Self::new(TaggerRegistry::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    fn programme() -> AreaTree {
        AreaTree::from_spec(
            BoxSpec::viewport(400, 200)
                .with_child(BoxSpec::text("10:30", Rect::new(10, 10, 50, 20)))
                .with_child(BoxSpec::text("-", Rect::new(10, 22, 20, 32)))
                .with_child(BoxSpec::text("Session 4A", Rect::new(60, 10, 200, 20)))
                .with_child(BoxSpec::text("Learning to Segment Web Pages", Rect::new(60, 40, 390, 50))),
        )
        .unwrap()
    }

    #[test]
    fn test_tags_leaves() {
        let mut tree = programme();
        let kids = tree.children(tree.root()).to_vec();
        let attached = TreeTagger::default().tag(&mut tree);
        assert_eq!(attached, 4);
        assert!(tree.has_tag(kids[0], &Tag::new("time", "")));
        assert!(tree.has_tag(kids[1], &Tag::new("time", "")));
        assert!(tree.has_tag(kids[2], &Tag::new("session", "")));
        assert!(tree.has_tag(kids[3], &Tag::new("title", "")));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = programme();
        let mut b = programme();
        let n = TreeTagger::default().tag(&mut a);
        let m = TreeTagger::default().with_parallel(true).tag(&mut b);
        assert_eq!(n, m);
        for id in a.leaves(a.root()) {
            assert_eq!(a.node(id).tags(), b.node(id).tags());
        }
    }
}

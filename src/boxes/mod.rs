//! Rendered boxes and their containment tree.
//!
//! [`BoxSpec`] is the renderer input, [`BoxTree`] the re-nested tree of the
//! visually separated boxes that the area tree is built from.

mod spec;
mod tree;

pub use spec::{BorderWidths, BoxSpec, FontSpec, ReplacedContent};
pub use tree::{visually_encloses, BoxId, BoxKind, BoxNode, BoxTree};

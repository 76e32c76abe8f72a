//! Geometry primitives shared by every stage of the pipeline.

mod color;
mod rect;

pub use color::Color;
pub use rect::Rect;

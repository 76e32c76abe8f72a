//! Layout classification and visual feature analysis.

mod centering;
mod features;
mod layout;

pub use centering::{centering, is_centered, Centering};
pub use features::{markedness_eq, FeatureAnalyzer, FeatureVector, MarkednessWeights, MARKEDNESS_EQUALITY};
pub use layout::LayoutAnalyzer;

//! Comparable style snapshot of an area node.

use serde::Serialize;

use crate::geometry::Color;

use super::TextStats;

/// Font size, weight, style and color of a node, used to decide whether two
/// nodes "look the same".
///
/// The font size is kept in tenths of a pixel so the snapshot can be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeStyle {
    font_size_tenths: i32,
    bold: bool,
    italic: bool,
    color: Color,
}

impl NodeStyle {
    /// Snapshot the style of aggregated text statistics.
    pub fn from_stats(stats: &TextStats) -> Self {
        Self {
            font_size_tenths: (stats.font_size() * 10.0).round() as i32,
            bold: stats.font_weight() > 0.5,
            italic: stats.font_style() > 0.5,
            color: stats.dominant_color().unwrap_or_default(),
        }
    }

    /// Average font size in pixels.
    pub fn font_size(&self) -> f64 {
        self.font_size_tenths as f64 / 10.0
    }

    /// Mostly bold text.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Mostly italic text.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Dominant text color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether both styles use the same font size.
    pub fn same_size(&self, other: &NodeStyle) -> bool {
        self.font_size_tenths == other.font_size_tenths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_equality() {
        let mut a = TextStats::default();
        a.add_run(5, 12.0, true, false, Color::BLACK);
        let mut b = TextStats::default();
        b.add_run(50, 12.0, true, false, Color::BLACK);
        assert_eq!(NodeStyle::from_stats(&a), NodeStyle::from_stats(&b));

        let mut c = TextStats::default();
        c.add_run(5, 12.0, false, false, Color::BLACK);
        assert_ne!(NodeStyle::from_stats(&a), NodeStyle::from_stats(&c));
        assert!(NodeStyle::from_stats(&a).same_size(&NodeStyle::from_stats(&c)));
    }
}

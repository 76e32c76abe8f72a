//! Renderer input: positioned boxes as produced by an external layout engine.

use serde::{Deserialize, Serialize};

use crate::geometry::{Color, Rect};

/// A rendered box with absolute geometry.
///
/// This is the input contract with the layout renderer. Children are listed
/// in paint order. The root box of a page is the viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSpec {
    /// Absolute border-box bounds
    pub bounds: Rect,

    /// Clip rectangle applied by the renderer (None = unclipped)
    pub clip: Option<Rect>,

    /// Border widths per side
    pub border: BorderWidths,

    /// Declared background color (None = transparent)
    pub background: Option<Color>,

    /// Text color (None = inherited default, black)
    pub color: Option<Color>,

    /// Literal text for text boxes
    pub text: Option<String>,

    /// Replaced content (images, embeds)
    pub replaced: Option<ReplacedContent>,

    /// Font metrics
    pub font: FontSpec,

    /// Whether the box is visible
    pub visible: bool,

    /// Child boxes in paint order
    pub children: Vec<BoxSpec>,
}

impl Default for BoxSpec {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            clip: None,
            border: BorderWidths::default(),
            background: None,
            color: None,
            text: None,
            replaced: None,
            font: FontSpec::default(),
            visible: true,
            children: Vec::new(),
        }
    }
}

impl BoxSpec {
    /// Create a viewport box of the given page size with a white background.
    pub fn viewport(width: i32, height: i32) -> Self {
        Self {
            bounds: Rect::from_size(0, 0, width, height),
            background: Some(Color::WHITE),
            ..Default::default()
        }
    }

    /// Create a plain container box.
    pub fn container(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Create a text box.
    pub fn text(text: impl Into<String>, bounds: Rect) -> Self {
        Self {
            bounds,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create a replaced (image) box.
    pub fn image(bounds: Rect) -> Self {
        Self {
            bounds,
            replaced: Some(ReplacedContent::new("img")),
            ..Default::default()
        }
    }

    /// Add a child box.
    pub fn with_child(mut self, child: BoxSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child boxes.
    pub fn with_children(mut self, children: impl IntoIterator<Item = BoxSpec>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Set the text color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the border widths.
    pub fn with_border(mut self, border: BorderWidths) -> Self {
        self.border = border;
        self
    }

    /// Set the clip rectangle.
    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font.size = size;
        self
    }

    /// Mark the font as bold.
    pub fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }

    /// Mark the font as italic.
    pub fn italic(mut self) -> Self {
        self.font.italic = true;
        self
    }

    /// Hide the box.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Whether this is a text box with at least one visible glyph.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Border widths of a box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderWidths {
    /// Top border
    pub top: i32,
    /// Right border
    pub right: i32,
    /// Bottom border
    pub bottom: i32,
    /// Left border
    pub left: i32,
}

impl BorderWidths {
    /// The same width on all four sides.
    pub fn uniform(width: i32) -> Self {
        Self {
            top: width,
            right: width,
            bottom: width,
            left: width,
        }
    }

    /// Only a bottom border (underline rule).
    pub fn bottom(width: i32) -> Self {
        Self {
            bottom: width,
            ..Default::default()
        }
    }

    /// Number of sides with a visible border.
    pub fn count(&self) -> usize {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .filter(|w| **w > 0)
            .count()
    }

    /// Whether any side has a negative width.
    pub fn is_negative(&self) -> bool {
        self.top < 0 || self.right < 0 || self.bottom < 0 || self.left < 0
    }
}

/// Font metrics of a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// Font family name
    pub family: String,
    /// Font size in pixels
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Italic style
    pub italic: bool,
    /// Small-caps variant
    pub small_caps: bool,
    /// Underline decoration
    pub underline: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "serif".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
            small_caps: false,
            underline: false,
        }
    }
}

/// Handle to replaced content (image, embedded object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedContent {
    /// Kind of content, e.g. "img" or "object"
    pub kind: String,
    /// Source URL, if known
    #[serde(default)]
    pub source: Option<String>,
}

impl ReplacedContent {
    /// Create a replaced content handle of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_spec_builder() {
        let spec = BoxSpec::viewport(800, 600).with_child(
            BoxSpec::text("Hello", Rect::new(10, 10, 60, 22))
                .with_font_size(16.0)
                .bold(),
        );
        assert_eq!(spec.bounds.width(), 800);
        assert_eq!(spec.children.len(), 1);
        assert!(spec.children[0].has_text());
        assert!(spec.children[0].font.bold);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"bounds":{"x1":0,"y1":0,"x2":99,"y2":19},"text":"Hi"}"#;
        let spec: BoxSpec = serde_json::from_str(json).unwrap();
        assert!(spec.visible);
        assert_eq!(spec.font.size, 12.0);
        assert_eq!(spec.border.count(), 0);
        assert!(spec.children.is_empty());
    }

    #[test]
    fn test_border_count() {
        assert_eq!(BorderWidths::uniform(1).count(), 4);
        assert_eq!(BorderWidths::bottom(2).count(), 1);
        assert!(!BorderWidths::default().is_negative());
    }
}

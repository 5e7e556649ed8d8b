use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::VizResult;
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Complete scene of one chart redraw.
///
/// Frames are never patched: each pass builds a new one, and backends clear
/// before drawing bars, then axis strokes, then labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Rejects frames a backend could not draw faithfully.
    pub fn validate(&self) -> VizResult<()> {
        self.viewport.ensure_valid()?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }

    /// Labels in draw order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(|text| text.text.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.lines.is_empty() && self.texts.is_empty()
    }
}

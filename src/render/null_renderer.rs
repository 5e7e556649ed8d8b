use crate::error::VizResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer used by tests and by hosts that consume frames directly.
///
/// It validates every frame and keeps the last one so callers can inspect
/// exactly what would have been drawn.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn last_rect_count(&self) -> usize {
        self.last_frame.as_ref().map_or(0, |frame| frame.rects.len())
    }

    #[must_use]
    pub fn last_text_count(&self) -> usize {
        self.last_frame.as_ref().map_or(0, |frame| frame.texts.len())
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> VizResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

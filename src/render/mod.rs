mod bar_frame;
mod frame;
mod null_renderer;
mod primitives;
mod theme;
mod transition;

pub use bar_frame::{BarFrameState, BarFrameStyle, build_bar_frame};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};
pub use theme::{ChartPalette, Theme};
pub use transition::{BarTransition, Easing};

use crate::error::VizResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` and must replace
/// whatever they drew before: there is no incremental patching.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> VizResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};

use std::f64::consts::{FRAC_PI_2, PI};
use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::trace;

use crate::core::Viewport;
use crate::error::{VizError, VizResult};
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

const FONT_FAMILY: &str = "Sans";

/// Primitive counts of the last pass; zero-height bars are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub bars: usize,
    pub strokes: usize,
    pub labels: usize,
}

/// Offscreen Cairo/Pango backend.
///
/// Every pass repaints the whole surface with the background color before
/// drawing, so nothing from an earlier frame survives a redraw.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    background: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> VizResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(VizError::InvalidViewport {
                width: width.max(0).unsigned_abs(),
                height: height.max(0).unsigned_abs(),
            });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| cairo_error("create surface", err))?;
        Ok(Self {
            surface,
            background: Color::from_hex(0xFFFFFF),
            last_stats: CairoRenderStats::default(),
        })
    }

    /// Surface sized to `viewport`.
    pub fn for_viewport(viewport: Viewport) -> VizResult<Self> {
        let viewport = viewport.ensure_valid()?;
        let invalid = || VizError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        };
        Self::new(
            i32::try_from(viewport.width).map_err(|_| invalid())?,
            i32::try_from(viewport.height).map_err(|_| invalid())?,
        )
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> VizResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    pub fn write_png<W: Write>(&self, writer: &mut W) -> VizResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| VizError::InvalidData(format!("png encoding failed: {err}")))
    }

    /// Draws `frame` on a caller-owned context (e.g. a toolkit draw callback).
    pub fn render_on_context(&mut self, context: &Context, frame: &RenderFrame) -> VizResult<()> {
        frame.validate()?;

        set_source(context, self.background);
        context
            .paint()
            .map_err(|err| cairo_error("paint background", err))?;

        let mut stats = CairoRenderStats::default();
        for bar in frame.rects.iter().filter(|bar| bar.height > 0.0 && bar.width > 0.0) {
            fill_bar(context, bar)?;
            stats.bars += 1;
        }
        for line in &frame.lines {
            stroke_line(context, line)?;
            stats.strokes += 1;
        }
        for label in &frame.texts {
            show_label(context, label)?;
            stats.labels += 1;
        }

        trace!(
            bars = stats.bars,
            strokes = stats.strokes,
            labels = stats.labels,
            "cairo pass finished"
        );
        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> VizResult<()> {
        let context =
            Context::new(&self.surface).map_err(|err| cairo_error("create context", err))?;
        self.render_on_context(&context, frame)
    }
}

/// Bars stand on the baseline, so only their top corners are rounded.
fn fill_bar(context: &Context, bar: &RectPrimitive) -> VizResult<()> {
    let radius = bar.corner_radius.min(bar.width / 2.0).min(bar.height);
    let (left, top) = (bar.x, bar.y);
    let (right, bottom) = (bar.x + bar.width, bar.y + bar.height);

    context.new_path();
    if radius > 0.0 {
        context.move_to(left, bottom);
        context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
        context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
        context.line_to(right, bottom);
        context.close_path();
    } else {
        context.rectangle(left, top, bar.width, bar.height);
    }
    set_source(context, bar.fill_color);
    context.fill().map_err(|err| cairo_error("fill bar", err))
}

fn stroke_line(context: &Context, line: &LinePrimitive) -> VizResult<()> {
    set_source(context, line.color);
    context.set_line_width(line.stroke_width);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context.stroke().map_err(|err| cairo_error("stroke axis", err))
}

fn show_label(context: &Context, label: &TextPrimitive) -> VizResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let font = FontDescription::from_string(&format!("{FONT_FAMILY} {}px", label.font_size_px));
    layout.set_font_description(Some(&font));
    layout.set_text(&label.text);

    let (width, _) = layout.pixel_size();
    let anchor_x = match label.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -f64::from(width) / 2.0,
        TextHAlign::Right => -f64::from(width),
    };

    context.save().map_err(|err| cairo_error("save state", err))?;
    context.translate(label.x, label.y);
    if label.rotation_deg != 0.0 {
        context.rotate(label.rotation_deg.to_radians());
    }
    set_source(context, label.color);
    context.move_to(anchor_x, 0.0);
    pangocairo::functions::show_layout(context, &layout);
    context.restore().map_err(|err| cairo_error("restore state", err))
}

fn set_source(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn cairo_error(action: &str, err: cairo::Error) -> VizError {
    VizError::InvalidData(format!("cairo failed to {action}: {err}"))
}

use serde::{Deserialize, Serialize};

use crate::core::{ChartLayout, Viewport};
use crate::render::{
    ChartPalette, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

const TICK_SIZE_PX: f64 = 6.0;
const TICK_LABEL_GAP_PX: f64 = 3.0;
const AXIS_STROKE_PX: f64 = 1.0;
const CATEGORY_TITLE_BOTTOM_PX: f64 = 10.0;
const VALUE_TITLE_LEFT_PX: f64 = 15.0;

/// Visual parameters of one bar-chart pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarFrameStyle {
    pub palette: ChartPalette,
    pub corner_radius: f64,
    pub tick_font_px: f64,
    pub label_font_px: f64,
    pub category_axis_label: String,
    pub value_axis_label: String,
}

/// Per-pass dynamic inputs: animation progress, fade and hover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFrameState {
    /// Eased transition progress in `[0, 1]`.
    pub progress: f64,
    /// Opacity multiplier applied to every primitive.
    pub opacity: f64,
    pub hovered: Option<usize>,
}

impl Default for BarFrameState {
    fn default() -> Self {
        Self {
            progress: 1.0,
            opacity: 1.0,
            hovered: None,
        }
    }
}

/// Builds the complete scene for one redraw.
///
/// Without a layout (empty series) the frame holds at most the placeholder
/// message. Otherwise bars grow from the baseline by `state.progress`, and
/// axes and titles are emitted after them.
#[must_use]
pub fn build_bar_frame(
    viewport: Viewport,
    layout: Option<&ChartLayout>,
    style: &BarFrameStyle,
    state: BarFrameState,
    placeholder: Option<&str>,
) -> RenderFrame {
    let mut frame = RenderFrame::new(viewport);
    let opacity = state.opacity.clamp(0.0, 1.0);
    let axis_color = style.palette.axis.faded(opacity);

    let Some(layout) = layout else {
        if let Some(message) = placeholder.filter(|message| !message.is_empty()) {
            frame.texts.push(TextPrimitive::new(
                message,
                f64::from(viewport.width) / 2.0,
                f64::from(viewport.height) / 2.0 - style.label_font_px / 2.0,
                style.label_font_px,
                axis_color,
                TextHAlign::Center,
            ));
        }
        return frame;
    };

    let geometry = layout.geometry;
    let baseline = geometry.baseline_y;
    let progress = state.progress.clamp(0.0, 1.0);

    for bar in &layout.bars {
        let fill = if state.hovered == Some(bar.index) {
            style.palette.bar_hover
        } else {
            style.palette.bar
        };
        let height = bar.height * progress;
        frame.rects.push(
            RectPrimitive::new(bar.x, baseline - height, bar.width, height, fill.faded(opacity))
                .with_corner_radius(style.corner_radius),
        );
    }

    // Category axis: domain line without outer ticks.
    frame.lines.push(LinePrimitive::new(
        geometry.plot_left,
        baseline,
        geometry.plot_right,
        baseline,
        AXIS_STROKE_PX,
        axis_color,
    ));
    for tick in &layout.category_ticks {
        frame.lines.push(LinePrimitive::new(
            tick.position,
            baseline,
            tick.position,
            baseline + TICK_SIZE_PX,
            AXIS_STROKE_PX,
            axis_color,
        ));
        frame.texts.push(TextPrimitive::new(
            tick.label.clone(),
            tick.position,
            baseline + TICK_SIZE_PX + TICK_LABEL_GAP_PX,
            style.tick_font_px,
            axis_color,
            TextHAlign::Center,
        ));
    }

    // Value axis: ticks only, the domain line is omitted.
    for tick in &layout.value_ticks {
        frame.lines.push(LinePrimitive::new(
            geometry.plot_left - TICK_SIZE_PX,
            tick.position,
            geometry.plot_left,
            tick.position,
            AXIS_STROKE_PX,
            axis_color,
        ));
        frame.texts.push(TextPrimitive::new(
            tick.label.clone(),
            geometry.plot_left - TICK_SIZE_PX - TICK_LABEL_GAP_PX,
            tick.position - style.tick_font_px / 2.0,
            style.tick_font_px,
            axis_color,
            TextHAlign::Right,
        ));
    }

    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    if !style.category_axis_label.is_empty() {
        frame.texts.push(TextPrimitive::new(
            style.category_axis_label.clone(),
            width / 2.0,
            height - CATEGORY_TITLE_BOTTOM_PX - style.label_font_px,
            style.label_font_px,
            axis_color,
            TextHAlign::Center,
        ));
    }
    if !style.value_axis_label.is_empty() {
        frame.texts.push(
            TextPrimitive::new(
                style.value_axis_label.clone(),
                VALUE_TITLE_LEFT_PX,
                height / 2.0,
                style.label_font_px,
                axis_color,
                TextHAlign::Center,
            )
            .rotated(-90.0),
        );
    }

    frame
}

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::scale::{BandScale, LinearScale, NICE_TICK_COUNT};
use crate::core::series::{Category, MetricSeries, format_number};
use crate::core::types::{Margins, Viewport};
use crate::error::{VizError, VizResult};

/// Tuning for one bar-chart layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub margins: Margins,
    /// Fraction of each band step left empty between bars.
    pub band_padding: f64,
    /// Requested number of value-axis ticks.
    pub value_tick_count: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            band_padding: 0.25,
            value_tick_count: 5,
        }
    }
}

impl LayoutOptions {
    pub fn validate(self) -> VizResult<Self> {
        self.margins.validate()?;
        if !self.band_padding.is_finite() || !(0.0..1.0).contains(&self.band_padding) {
            return Err(VizError::InvalidData(
                "band padding must be in [0, 1)".to_owned(),
            ));
        }
        if self.value_tick_count == 0 {
            return Err(VizError::InvalidData(
                "value tick count must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Pixel frame of the plot area, derived from the viewport on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pub viewport: Viewport,
    pub margins: Margins,
    pub plot_left: f64,
    pub plot_right: f64,
    pub plot_top: f64,
    /// Y pixel of the zero value.
    pub baseline_y: f64,
}

impl LayoutGeometry {
    #[must_use]
    pub fn plot_width(self) -> f64 {
        self.plot_right - self.plot_left
    }

    #[must_use]
    pub fn plot_height(self) -> f64 {
        self.baseline_y - self.plot_top
    }
}

/// Final (fully transitioned) geometry of one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub index: usize,
    pub category: Category,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BarGeometry {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Pixel position along the axis (x for the category axis, y for values).
    pub position: f64,
    pub label: String,
}

pub type ValueTicks = SmallVec<[AxisTick; 12]>;

/// Output of [`compute_layout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub category_scale: BandScale,
    pub value_scale: LinearScale,
    pub geometry: LayoutGeometry,
    pub bars: Vec<BarGeometry>,
    pub category_ticks: Vec<AxisTick>,
    pub value_ticks: ValueTicks,
}

impl ChartLayout {
    /// Index of the bar under the pointer, in viewport-local pixels.
    ///
    /// Bars are hit-tested on their full band column between the plot top and
    /// the baseline so short bars stay hoverable.
    #[must_use]
    pub fn bar_at(&self, x: f64, y: f64) -> Option<usize> {
        if y < self.geometry.plot_top || y > self.geometry.baseline_y {
            return None;
        }
        self.category_scale.index_at(x)
    }
}

/// Computes scales and bar geometry for `series` inside `viewport`.
///
/// Returns `Ok(None)` for an empty series or when the margins leave no plot
/// area: there is nothing to draw and that is not an error. The result
/// depends only on its inputs.
pub fn compute_layout(
    series: &MetricSeries,
    viewport: Viewport,
    options: &LayoutOptions,
) -> VizResult<Option<ChartLayout>> {
    let viewport = viewport.ensure_valid()?;
    let options = options.validate()?;
    if series.is_empty() {
        return Ok(None);
    }

    let margins = options.margins;
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let plot_left = margins.left;
    let plot_right = width - margins.right;
    let plot_top = margins.top;
    let baseline_y = height - margins.bottom;
    if plot_right <= plot_left || baseline_y <= plot_top {
        debug!(
            width = viewport.width,
            height = viewport.height,
            "plot area collapsed; skipping layout"
        );
        return Ok(None);
    }

    let category_scale =
        BandScale::tiled(series.len(), (plot_left, plot_right), options.band_padding)?;

    let max_value = series.max_value();
    let domain_end = if max_value > 0.0 { max_value } else { 1.0 };
    let value_scale =
        LinearScale::new((0.0, domain_end), (baseline_y, plot_top))?.nice(NICE_TICK_COUNT);

    let bandwidth = category_scale.bandwidth();
    let mut bars = Vec::with_capacity(series.len());
    let mut category_ticks = Vec::with_capacity(series.len());
    for (index, (category, value)) in series.iter().enumerate() {
        let Some(x) = category_scale.band_start(index) else {
            continue;
        };
        let y = value_scale.map(value);
        bars.push(BarGeometry {
            index,
            category: category.clone(),
            value,
            x,
            y,
            width: bandwidth,
            height: baseline_y - y,
        });
        category_ticks.push(AxisTick {
            position: x + bandwidth / 2.0,
            label: category.to_string(),
        });
    }

    let value_ticks = value_scale
        .ticks(options.value_tick_count)
        .into_iter()
        .map(|value| AxisTick {
            position: value_scale.map(value),
            label: format_number(value),
        })
        .collect();

    Ok(Some(ChartLayout {
        category_scale,
        value_scale,
        geometry: LayoutGeometry {
            viewport,
            margins,
            plot_left,
            plot_right,
            plot_top,
            baseline_y,
        },
        bars,
        category_ticks,
        value_ticks,
    }))
}

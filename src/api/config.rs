use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{LayoutOptions, Margins, MetricPoint};
use crate::error::{VizError, VizResult};
use crate::refresh::{FadeConfig, OverlapPolicy};
use crate::render::{BarFrameStyle, Easing, Theme};

/// Public live-chart configuration.
///
/// Serializable so dashboards can keep chart setup in a config file; every
/// field has a default, so partial documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveChartConfig {
    #[serde(default = "default_height_px")]
    pub height_px: u32,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    #[serde(default = "default_value_tick_count")]
    pub value_tick_count: usize,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
    #[serde(default = "default_fade_dimmed_opacity")]
    pub fade_dimmed_opacity: f64,
    #[serde(default = "default_fade_min_hold_ms")]
    pub fade_min_hold_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "default_bar_corner_radius")]
    pub bar_corner_radius: f64,
    #[serde(default = "default_tick_font_px")]
    pub tick_font_px: f64,
    #[serde(default = "default_label_font_px")]
    pub label_font_px: f64,
    #[serde(default = "default_category_axis_label")]
    pub category_axis_label: String,
    #[serde(default = "default_value_axis_label")]
    pub value_axis_label: String,
    /// Tooltip text; `{value}` and `{category}` are substituted.
    #[serde(default = "default_tooltip_template")]
    pub tooltip_template: String,
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

impl Default for LiveChartConfig {
    fn default() -> Self {
        Self {
            height_px: default_height_px(),
            margins: Margins::default(),
            band_padding: default_band_padding(),
            value_tick_count: default_value_tick_count(),
            refresh_interval_ms: default_refresh_interval_ms(),
            overlap_policy: OverlapPolicy::default(),
            fade_dimmed_opacity: default_fade_dimmed_opacity(),
            fade_min_hold_ms: default_fade_min_hold_ms(),
            transition_ms: default_transition_ms(),
            easing: Easing::default(),
            bar_corner_radius: default_bar_corner_radius(),
            tick_font_px: default_tick_font_px(),
            label_font_px: default_label_font_px(),
            category_axis_label: default_category_axis_label(),
            value_axis_label: default_value_axis_label(),
            tooltip_template: default_tooltip_template(),
            empty_message: default_empty_message(),
        }
    }
}

impl LiveChartConfig {
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval_ms = interval.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_fade_min_hold(mut self, hold: Duration) -> Self {
        self.fade_min_hold_ms = hold.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_transition(mut self, duration: Duration, easing: Easing) -> Self {
        self.transition_ms = duration.as_millis() as u64;
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    #[must_use]
    pub fn with_axis_labels(
        mut self,
        category_axis_label: impl Into<String>,
        value_axis_label: impl Into<String>,
    ) -> Self {
        self.category_axis_label = category_axis_label.into();
        self.value_axis_label = value_axis_label.into();
        self
    }

    #[must_use]
    pub fn with_tooltip_template(mut self, template: impl Into<String>) -> Self {
        self.tooltip_template = template.into();
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    #[must_use]
    pub fn fade_config(&self) -> FadeConfig {
        FadeConfig {
            dimmed_opacity: self.fade_dimmed_opacity,
            min_hold: Duration::from_millis(self.fade_min_hold_ms),
        }
    }

    #[must_use]
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            margins: self.margins,
            band_padding: self.band_padding,
            value_tick_count: self.value_tick_count,
        }
    }

    #[must_use]
    pub fn frame_style(&self, theme: Theme) -> BarFrameStyle {
        BarFrameStyle {
            palette: theme.palette(),
            corner_radius: self.bar_corner_radius,
            tick_font_px: self.tick_font_px,
            label_font_px: self.label_font_px,
            category_axis_label: self.category_axis_label.clone(),
            value_axis_label: self.value_axis_label.clone(),
        }
    }

    /// Renders the tooltip text for one datum.
    #[must_use]
    pub fn tooltip_text(&self, point: &MetricPoint) -> String {
        self.tooltip_template
            .replace("{value}", &crate::core::format_number(point.value))
            .replace("{category}", &point.category.to_string())
    }

    pub fn validate(&self) -> VizResult<()> {
        if self.height_px == 0 {
            return Err(VizError::InvalidData("height must be > 0".to_owned()));
        }
        self.layout_options().validate()?;
        self.fade_config().validate()?;
        if self.refresh_interval_ms == 0 {
            return Err(VizError::InvalidData(
                "refresh interval must be > 0".to_owned(),
            ));
        }
        if !self.bar_corner_radius.is_finite() || self.bar_corner_radius < 0.0 {
            return Err(VizError::InvalidData(
                "bar corner radius must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("tick font size", self.tick_font_px),
            ("label font size", self.label_font_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(VizError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> VizResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VizError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    pub fn from_json_str(input: &str) -> VizResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| VizError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_height_px() -> u32 {
    250
}

fn default_band_padding() -> f64 {
    0.25
}

fn default_value_tick_count() -> usize {
    5
}

fn default_refresh_interval_ms() -> u64 {
    60_000
}

fn default_fade_dimmed_opacity() -> f64 {
    0.3
}

fn default_fade_min_hold_ms() -> u64 {
    300
}

fn default_transition_ms() -> u64 {
    800
}

fn default_bar_corner_radius() -> f64 {
    4.0
}

fn default_tick_font_px() -> f64 {
    11.0
}

fn default_label_font_px() -> f64 {
    12.0
}

fn default_category_axis_label() -> String {
    "Age".to_owned()
}

fn default_value_axis_label() -> String {
    "Count".to_owned()
}

fn default_tooltip_template() -> String {
    "{value} at {category}".to_owned()
}

fn default_empty_message() -> String {
    "No data available".to_owned()
}

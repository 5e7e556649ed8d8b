use serde::{Deserialize, Serialize};

use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored preference value; anything but `"dark"` is light.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn palette(self) -> ChartPalette {
        match self {
            // indigo-600 / indigo-500 bars, gray-600 axes, white card
            Self::Light => ChartPalette {
                bar: Color::from_hex(0x4F46E5),
                bar_hover: Color::from_hex(0x6366F1),
                axis: Color::from_hex(0x4B5563),
                background: Color::from_hex(0xFFFFFF),
            },
            // indigo-400 / indigo-300 bars, gray-400 axes, gray-800 card
            Self::Dark => ChartPalette {
                bar: Color::from_hex(0x818CF8),
                bar_hover: Color::from_hex(0xA5B4FC),
                axis: Color::from_hex(0x9CA3AF),
                background: Color::from_hex(0x1F2937),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPalette {
    pub bar: Color,
    pub bar_hover: Color,
    /// Tick marks, tick labels and axis titles.
    pub axis: Color,
    /// Card background behind the chart; painted by raster backends only.
    pub background: Color,
}

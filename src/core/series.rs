use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{VizError, VizResult};

/// Key of one bar on the categorical axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl Category {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_number(value.0)),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for Category {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Formats a value the way it is shown to users: integral values without a
/// fractional part, everything else with at most two decimals.
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub category: Category,
    pub value: f64,
}

impl MetricPoint {
    #[must_use]
    pub fn new(category: impl Into<Category>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }
}

/// Ordered category -> value pairs driving one chart.
///
/// Categories are unique and values are finite and non-negative. An empty
/// series is valid and renders nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<MetricPoint>", into = "Vec<MetricPoint>")]
pub struct MetricSeries {
    values: IndexMap<Category, f64>,
}

impl MetricSeries {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series, rejecting duplicate categories and negative or
    /// non-finite values.
    pub fn new(points: Vec<MetricPoint>) -> VizResult<Self> {
        let mut values = IndexMap::with_capacity(points.len());
        for point in points {
            if !point.value.is_finite() || point.value < 0.0 {
                return Err(VizError::InvalidData(format!(
                    "value for category `{}` must be finite and >= 0",
                    point.category
                )));
            }
            if values.contains_key(&point.category) {
                return Err(VizError::InvalidData(format!(
                    "duplicate category `{}`",
                    point.category
                )));
            }
            values.insert(point.category, point.value);
        }
        Ok(Self { values })
    }

    /// Builds a series from loosely-typed input: invalid values become `0` and
    /// repeated categories keep their first occurrence.
    #[must_use]
    pub fn from_points_lossy(points: impl IntoIterator<Item = MetricPoint>) -> Self {
        let mut values = IndexMap::new();
        for point in points {
            let value = if point.value.is_finite() && point.value > 0.0 {
                point.value
            } else {
                0.0
            };
            if values.contains_key(&point.category) {
                warn!(category = %point.category, "dropping duplicate category");
                continue;
            }
            values.insert(point.category, value);
        }
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<MetricPoint> {
        self.values
            .get_index(index)
            .map(|(category, value)| MetricPoint::new(category.clone(), *value))
    }

    #[must_use]
    pub fn value_of(&self, category: &Category) -> Option<f64> {
        self.values.get(category).copied()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, f64)> {
        self.values.iter().map(|(category, value)| (category, *value))
    }

    /// Largest value, `0` for an empty series.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.values().copied().fold(0.0, f64::max)
    }

    #[must_use]
    pub fn to_points(&self) -> Vec<MetricPoint> {
        self.iter()
            .map(|(category, value)| MetricPoint::new(category.clone(), value))
            .collect()
    }
}

impl TryFrom<Vec<MetricPoint>> for MetricSeries {
    type Error = VizError;

    fn try_from(points: Vec<MetricPoint>) -> VizResult<Self> {
        Self::new(points)
    }
}

impl From<MetricSeries> for Vec<MetricPoint> {
    fn from(series: MetricSeries) -> Self {
        series.to_points()
    }
}

pub mod layout;
pub mod scale;
pub mod series;
pub mod types;

pub use layout::{
    AxisTick, BarGeometry, ChartLayout, LayoutGeometry, LayoutOptions, ValueTicks, compute_layout,
};
pub use scale::{BandScale, LinearScale, NICE_TICK_COUNT};
pub use series::{Category, MetricPoint, MetricSeries, format_number};
pub use types::{Margins, Viewport};

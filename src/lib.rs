//! fraudscope: live-refreshing bar charts for fraud analytics dashboards.
//!
//! The crate is headless. It polls a read-only aggregation backend through a
//! pluggable transport, orders concurrent refreshes, fades the chart while a
//! refresh is outstanding, lays bars out on nice scales and hands complete
//! frames to a renderer backend.

pub mod api;
pub mod core;
pub mod error;
pub mod fetch;
pub mod interaction;
pub mod refresh;
pub mod render;
pub mod telemetry;

pub use api::{LiveBarChart, LiveChartConfig, MerchantLeaderboard};
pub use error::{VizError, VizResult};

//! Public surface: configured live charts, the merchant leaderboard, theme
//! preferences and state snapshots.

mod config;
mod leaderboard;
mod live_chart;
mod preferences;
mod snapshot;

pub use config::LiveChartConfig;
pub use leaderboard::{
    DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardView, MerchantLeaderboard, RankTier,
    rank_merchants,
};
pub use live_chart::{LiveBarChart, RenderReport};
pub use preferences::{
    JsonFilePreferenceStore, MemoryPreferenceStore, ThemePreferenceStore, restore_theme,
    toggle_theme,
};
pub use snapshot::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1};

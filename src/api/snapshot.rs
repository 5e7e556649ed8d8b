use serde::{Deserialize, Serialize};

use crate::core::MetricPoint;
use crate::error::{VizError, VizResult};
use crate::interaction::{TooltipService, TooltipState};
use crate::refresh::{RefreshStateKind, SchedulerPhase};
use crate::render::{Renderer, Theme};

use super::LiveBarChart;

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable view of one chart's observable state, for diagnostics and
/// regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub chart_id: u64,
    pub scheduler_phase: SchedulerPhase,
    pub refresh_state: RefreshStateKind,
    /// Last error message while the refresh state is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub theme: Theme,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub series: Vec<MetricPoint>,
    pub in_flight: usize,
    pub opacity: f64,
    pub hovered: Option<usize>,
    pub tooltip: TooltipState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl<R: Renderer, T: TooltipService> LiveBarChart<R, T> {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        let viewport = self.viewport();
        let last_error = match self.refresh_state() {
            crate::refresh::RefreshState::Failed(message) => Some(message.clone()),
            _ => None,
        };
        ChartSnapshot {
            chart_id: self.id().get(),
            scheduler_phase: self.scheduler_phase(),
            refresh_state: self.refresh_state().kind(),
            last_error,
            theme: self.theme(),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            series: self
                .displayed_series()
                .map(|series| series.to_points())
                .unwrap_or_default(),
            in_flight: self.in_flight(),
            opacity: self.opacity(),
            hovered: self.hovered(),
            tooltip: self.tooltip().state(),
        }
    }
}

impl ChartSnapshot {
    pub fn to_json_pretty(&self) -> VizResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VizError::InvalidData(format!("failed to serialize snapshot json: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> VizResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            VizError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> VizResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            VizError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(VizError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{VizError, VizResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeConfig {
    /// Opacity applied while a refresh is in progress.
    pub dimmed_opacity: f64,
    /// Minimum time the dim is held after the last fetch completes.
    pub min_hold: Duration,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            dimmed_opacity: 0.3,
            min_hold: Duration::from_millis(300),
        }
    }
}

impl FadeConfig {
    pub fn validate(self) -> VizResult<Self> {
        if !self.dimmed_opacity.is_finite() || !(0.0..=1.0).contains(&self.dimmed_opacity) {
            return Err(VizError::InvalidData(
                "dimmed opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Settled,
    Refreshing,
    /// Fetches are done; dim stays on until `until`.
    Holding { until: Instant },
}

/// Dims a visualization while it refreshes.
///
/// Transitions only on four events: refresh start, refresh completion
/// (success or failure alike), elapsed hold, and reset.
#[derive(Debug, Clone)]
pub struct FadeCoordinator {
    config: FadeConfig,
    phase: FadePhase,
    outstanding: usize,
}

impl FadeCoordinator {
    pub fn new(config: FadeConfig) -> VizResult<Self> {
        Ok(Self {
            config: config.validate()?,
            phase: FadePhase::Settled,
            outstanding: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> FadeConfig {
        self.config
    }

    #[must_use]
    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        !matches!(self.phase, FadePhase::Settled)
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        if self.is_dimmed() {
            self.config.dimmed_opacity
        } else {
            1.0
        }
    }

    /// Instant at which the hold ends, if holding.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            FadePhase::Holding { until } => Some(until),
            _ => None,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.outstanding += 1;
        if self.phase != FadePhase::Refreshing {
            trace!(outstanding = self.outstanding, "fade -> refreshing");
        }
        self.phase = FadePhase::Refreshing;
    }

    /// Marks one refresh as finished. The hold starts once none is left.
    pub fn finish_refresh(&mut self, now: Instant) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 && self.phase == FadePhase::Refreshing {
            let until = now + self.config.min_hold;
            trace!(hold_ms = self.config.min_hold.as_millis() as u64, "fade -> holding");
            self.phase = FadePhase::Holding { until };
        }
    }

    /// Releases an elapsed hold. Returns `true` when the phase changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.phase {
            FadePhase::Holding { until } if now >= until => {
                trace!("fade -> settled");
                self.phase = FadePhase::Settled;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.outstanding = 0;
        self.phase = FadePhase::Settled;
    }
}

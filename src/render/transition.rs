use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Easing curves for bar transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadOut,
    #[default]
    CubicOut,
}

impl Easing {
    /// Applies the curve to a normalized time value, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Self::Linear => t,
            Self::QuadOut => t * (2.0 - t),
            Self::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
        }
    }
}

/// One grow-from-baseline animation of every bar of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarTransition {
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl BarTransition {
    #[must_use]
    pub fn start(now: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            started_at: now,
            duration,
            easing,
        }
    }

    #[must_use]
    pub fn started_at(self) -> Instant {
        self.started_at
    }

    #[must_use]
    pub fn ends_at(self) -> Instant {
        self.started_at + self.duration
    }

    /// Eased progress in `[0, 1]`; `1` once the duration elapsed.
    #[must_use]
    pub fn progress(self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.apply(t)
    }

    #[must_use]
    pub fn is_finished(self, now: Instant) -> bool {
        now >= self.ends_at()
    }
}

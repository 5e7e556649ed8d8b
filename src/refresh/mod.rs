//! Polling lifecycle of one visualization instance.
//!
//! The scheduler never sleeps or spawns: the host passes the current
//! monotonic instant into [`RefreshScheduler::start`] and
//! [`RefreshScheduler::poll`], runs the fetch for each returned
//! [`FetchTicket`] however it likes, and reports the outcome through
//! [`RefreshScheduler::complete`].

pub mod fade;

pub use fade::{FadeConfig, FadeCoordinator, FadePhase};

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::MetricSeries;
use crate::error::{VizError, VizResult};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerPhase {
    Stopped,
    Running,
}

/// What to do when the timer fires while a fetch is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Start the new fetch anyway; completions are ordered by sequence number.
    #[default]
    Concurrent,
    /// Skip the tick until the outstanding fetch completes.
    SkipWhileInFlight,
}

/// Data applied by the most recent accepted completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settled<T> {
    pub data: T,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshState<T = MetricSeries> {
    Idle,
    Fetching,
    Settled(Settled<T>),
    Failed(String),
}

impl<T> RefreshState<T> {
    #[must_use]
    pub fn kind(&self) -> RefreshStateKind {
        match self {
            Self::Idle => RefreshStateKind::Idle,
            Self::Fetching => RefreshStateKind::Fetching,
            Self::Settled(_) => RefreshStateKind::Settled,
            Self::Failed(_) => RefreshStateKind::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStateKind {
    Idle,
    Fetching,
    Settled,
    Failed,
}

/// Handle of one issued fetch. Its sequence number orders completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    seq: u64,
    issued_at: Instant,
}

impl FetchTicket {
    #[must_use]
    pub fn seq(self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn issued_at(self) -> Instant {
        self.issued_at
    }
}

/// Result of reporting a completion to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// New data became the displayed data.
    Applied,
    /// The fetch failed; previously settled data is kept.
    Failed,
    /// A newer fetch already completed; this result was discarded.
    Stale,
    /// The scheduler was torn down or never issued this ticket.
    Ignored,
}

impl CompletionOutcome {
    /// Whether this completion counted against an outstanding fetch.
    #[must_use]
    pub fn finished_outstanding(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Interval-driven fetch lifecycle with a sequence guard on completions.
///
/// Every ticket handed out counts as in flight until it is passed back
/// through [`complete`](Self::complete) or [`abandon`](Self::abandon). A host
/// that drops tickets on the floor keeps them outstanding forever, which
/// blocks `SkipWhileInFlight` ticks and keeps the chart dimmed.
#[derive(Debug, Clone)]
pub struct RefreshScheduler<T = MetricSeries> {
    interval: Duration,
    overlap: OverlapPolicy,
    phase: SchedulerPhase,
    torn_down: bool,
    next_due: Option<Instant>,
    next_seq: u64,
    last_completed_seq: u64,
    in_flight: SmallVec<[u64; 4]>,
    state: RefreshState<T>,
    last_settled: Option<Settled<T>>,
}

impl<T: Clone> RefreshScheduler<T> {
    pub fn new(interval: Duration, overlap: OverlapPolicy) -> VizResult<Self> {
        if interval.is_zero() {
            return Err(VizError::InvalidData(
                "refresh interval must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            interval,
            overlap,
            phase: SchedulerPhase::Stopped,
            torn_down: false,
            next_due: None,
            next_seq: 1,
            last_completed_seq: 0,
            in_flight: SmallVec::new(),
            state: RefreshState::Idle,
            last_settled: None,
        })
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    #[must_use]
    pub fn state(&self) -> &RefreshState<T> {
        &self.state
    }

    /// Data that should be on screen: the last accepted success, kept across
    /// later failures.
    #[must_use]
    pub fn displayed(&self) -> Option<&Settled<T>> {
        self.last_settled.as_ref()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Instant of the next scheduled fetch; `None` once stopped.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// `Stopped -> Running`: issues the initial fetch immediately.
    pub fn start(&mut self, now: Instant) -> VizResult<FetchTicket> {
        if self.torn_down {
            return Err(VizError::InvalidState(
                "refresh scheduler was torn down".to_owned(),
            ));
        }
        if self.phase == SchedulerPhase::Running {
            return Err(VizError::InvalidState(
                "refresh scheduler is already running".to_owned(),
            ));
        }
        self.phase = SchedulerPhase::Running;
        self.next_due = Some(now + self.interval);
        Ok(self.issue(now))
    }

    /// Issues a fetch when the interval elapsed since the previous one.
    ///
    /// A late poll issues a single fetch and re-arms relative to `now`;
    /// missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        if self.phase != SchedulerPhase::Running {
            return None;
        }
        let due = self.next_due?;
        if now < due {
            return None;
        }

        let missed = (now - due).as_nanos() / self.interval.as_nanos().max(1);
        let mut next = due + self.interval;
        if missed > 0 {
            next = now + self.interval;
        }
        self.next_due = Some(next);

        if self.overlap == OverlapPolicy::SkipWhileInFlight && !self.in_flight.is_empty() {
            debug!(in_flight = self.in_flight.len(), "refresh tick skipped");
            return None;
        }
        Some(self.issue(now))
    }

    fn issue(&mut self, now: Instant) -> FetchTicket {
        let ticket = FetchTicket {
            seq: self.next_seq,
            issued_at: now,
        };
        self.next_seq += 1;
        self.in_flight.push(ticket.seq);
        self.state = RefreshState::Fetching;
        debug!(seq = ticket.seq, in_flight = self.in_flight.len(), "refresh issued");
        ticket
    }

    /// Applies a completed fetch if it is the newest completion seen so far.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: VizResult<T>,
        fetched_at: DateTime<Utc>,
    ) -> CompletionOutcome {
        if self.torn_down {
            debug!(seq = ticket.seq, "completion after teardown ignored");
            return CompletionOutcome::Ignored;
        }
        let Some(position) = self.in_flight.iter().position(|&seq| seq == ticket.seq) else {
            debug!(seq = ticket.seq, "completion for unknown ticket ignored");
            return CompletionOutcome::Ignored;
        };
        self.in_flight.remove(position);

        if ticket.seq <= self.last_completed_seq {
            debug!(
                seq = ticket.seq,
                newest = self.last_completed_seq,
                "stale completion discarded"
            );
            return CompletionOutcome::Stale;
        }
        self.last_completed_seq = ticket.seq;

        match result {
            Ok(data) => {
                let settled = Settled { data, fetched_at };
                self.last_settled = Some(settled.clone());
                self.state = RefreshState::Settled(settled);
                CompletionOutcome::Applied
            }
            Err(err) => {
                warn!(seq = ticket.seq, error = %err, "refresh failed; keeping previous data");
                self.state = RefreshState::Failed(err.to_string());
                CompletionOutcome::Failed
            }
        }
    }

    /// Forgets a fetch the host gave up on (cancelled request, lost
    /// callback). The sequence guard and displayed data are untouched.
    /// Returns `false` when the ticket was not outstanding.
    pub fn abandon(&mut self, ticket: FetchTicket) -> bool {
        let Some(position) = self.in_flight.iter().position(|&seq| seq == ticket.seq) else {
            return false;
        };
        self.in_flight.remove(position);
        if self.in_flight.is_empty() && matches!(self.state, RefreshState::Fetching) {
            self.state = match &self.last_settled {
                Some(settled) => RefreshState::Settled(settled.clone()),
                None => RefreshState::Idle,
            };
        }
        debug!(seq = ticket.seq, in_flight = self.in_flight.len(), "refresh abandoned");
        true
    }

    /// `Running -> Stopped`: cancels the pending tick and turns every
    /// outstanding completion into a no-op. Terminal.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        debug!(in_flight = self.in_flight.len(), "refresh scheduler torn down");
        self.torn_down = true;
        self.phase = SchedulerPhase::Stopped;
        self.next_due = None;
        self.in_flight.clear();
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

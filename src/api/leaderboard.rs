use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VizResult;
use crate::fetch::{Endpoint, MerchantFraudRate};
use crate::refresh::{
    CompletionOutcome, FadeConfig, FadeCoordinator, FetchTicket, OverlapPolicy,
    RefreshScheduler, RefreshState,
};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 20;

/// Highlight tier of one leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    /// Rank 1.
    Top,
    /// Ranks 2 to 5.
    Elevated,
    Normal,
}

impl RankTier {
    #[must_use]
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::Top,
            2..=5 => Self::Elevated,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub merchant: String,
    pub fraud_rate: f64,
    pub fraud_count: f64,
    pub total_transactions: f64,
    pub tier: RankTier,
    /// Fill of the inline rate bar, clamped to `[0, 1]`.
    pub bar_fraction: f64,
    /// Rate as a percentage with one decimal, e.g. `"12.5%"`.
    pub percent_label: String,
}

/// Ranks merchants by descending fraud rate and keeps the first `limit`.
///
/// Ties keep their input order.
#[must_use]
pub fn rank_merchants(records: &[MerchantFraudRate], limit: usize) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&MerchantFraudRate> = records.iter().collect();
    sorted.sort_by(|left, right| right.fraud_rate.total_cmp(&left.fraud_rate));

    sorted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, record)| {
            let rank = index + 1;
            LeaderboardEntry {
                rank,
                merchant: record.merchant.clone(),
                fraud_rate: record.fraud_rate,
                fraud_count: record.fraud_count,
                total_transactions: record.total_transactions,
                tier: RankTier::for_rank(rank),
                bar_fraction: record.fraud_rate.clamp(0.0, 1.0),
                percent_label: format!("{:.1}%", record.fraud_rate * 100.0),
            }
        })
        .collect()
}

/// What the leaderboard panel shows right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub entries: Vec<LeaderboardEntry>,
    pub opacity: f64,
    /// Set when there is nothing to list.
    pub empty_message: Option<String>,
}

/// Periodically refreshed "suspicious merchant activity" panel.
#[derive(Debug, Clone)]
pub struct MerchantLeaderboard {
    limit: usize,
    empty_message: String,
    scheduler: RefreshScheduler<Vec<MerchantFraudRate>>,
    fade: FadeCoordinator,
}

impl MerchantLeaderboard {
    pub fn new(limit: usize, refresh_interval: Duration, fade: FadeConfig) -> VizResult<Self> {
        Ok(Self {
            limit,
            empty_message: "No data available".to_owned(),
            scheduler: RefreshScheduler::new(refresh_interval, OverlapPolicy::Concurrent)?,
            fade: FadeCoordinator::new(fade)?,
        })
    }

    #[must_use]
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Route this panel polls.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::sorted_fraudulent_merchants(self.limit)
    }

    #[must_use]
    pub fn refresh_state(&self) -> &RefreshState<Vec<MerchantFraudRate>> {
        self.scheduler.state()
    }

    pub fn mount(&mut self, now: Instant) -> VizResult<FetchTicket> {
        let ticket = self.scheduler.start(now)?;
        self.fade.begin_refresh();
        Ok(ticket)
    }

    pub fn on_timer(&mut self, now: Instant) -> Option<FetchTicket> {
        self.fade.poll(now);
        let ticket = self.scheduler.poll(now)?;
        self.fade.begin_refresh();
        Some(ticket)
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: VizResult<Vec<MerchantFraudRate>>,
        now: Instant,
    ) -> CompletionOutcome {
        let outcome = self.scheduler.complete(ticket, result, Utc::now());
        if outcome.finished_outstanding() {
            self.fade.finish_refresh(now);
        }
        debug!(seq = ticket.seq(), ?outcome, "leaderboard fetch completed");
        outcome
    }

    pub fn abandon_fetch(&mut self, ticket: FetchTicket, now: Instant) -> bool {
        let abandoned = self.scheduler.abandon(ticket);
        if abandoned {
            self.fade.finish_refresh(now);
        }
        abandoned
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.scheduler.next_due(), self.fade.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Current rows and fade opacity, after releasing an elapsed fade hold.
    pub fn view(&mut self, now: Instant) -> LeaderboardView {
        self.fade.poll(now);
        let entries = self
            .scheduler
            .displayed()
            .map(|settled| rank_merchants(&settled.data, self.limit))
            .unwrap_or_default();
        let empty_message = entries.is_empty().then(|| self.empty_message.clone());
        LeaderboardView {
            entries,
            opacity: self.fade.opacity(),
            empty_message,
        }
    }

    pub fn teardown(&mut self) {
        self.scheduler.teardown();
        self.fade.reset();
    }
}

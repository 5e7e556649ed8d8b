use std::time::{Duration, Instant};

use fraudscope::api::{
    DEFAULT_LEADERBOARD_LIMIT, MerchantLeaderboard, RankTier, rank_merchants,
};
use fraudscope::error::VizError;
use fraudscope::fetch::MerchantFraudRate;
use fraudscope::refresh::{CompletionOutcome, FadeConfig};

fn merchant(name: &str, fraud_rate: f64) -> MerchantFraudRate {
    MerchantFraudRate {
        merchant: name.to_owned(),
        total_transactions: 100.0,
        fraud_count: fraud_rate * 100.0,
        fraud_rate,
    }
}

fn leaderboard() -> MerchantLeaderboard {
    MerchantLeaderboard::new(
        DEFAULT_LEADERBOARD_LIMIT,
        Duration::from_secs(60),
        FadeConfig::default(),
    )
    .expect("leaderboard init")
}

#[test]
fn ranking_sorts_by_rate_and_assigns_tiers() {
    let records: Vec<MerchantFraudRate> = (0..8)
        .map(|i| merchant(&format!("m{i}"), f64::from(i) / 10.0))
        .collect();

    let entries = rank_merchants(&records, 6);

    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0].merchant, "m7");
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].tier, RankTier::Top);
    assert_eq!(entries[4].tier, RankTier::Elevated);
    assert_eq!(entries[5].tier, RankTier::Normal);
    assert_eq!(entries[0].percent_label, "70.0%");
}

#[test]
fn ties_keep_backend_order_and_bar_fraction_is_clamped() {
    let records = vec![
        merchant("first", 0.25),
        merchant("second", 0.25),
        merchant("overflow", 1.7),
    ];

    let entries = rank_merchants(&records, 10);

    let names: Vec<&str> = entries.iter().map(|entry| entry.merchant.as_str()).collect();
    assert_eq!(names, vec!["overflow", "first", "second"]);
    assert_eq!(entries[0].bar_fraction, 1.0);
    assert_eq!(entries[1].bar_fraction, 0.25);
    assert_eq!(entries[1].percent_label, "25.0%");
}

#[test]
fn leaderboard_polls_limited_endpoint() {
    assert_eq!(
        leaderboard().endpoint().path("/api"),
        "/api/getSortedFraudulentMerchants/20"
    );
}

#[test]
fn view_fades_during_refresh_and_lists_entries_after() {
    let t0 = Instant::now();
    let mut board = leaderboard();
    let ticket = board.mount(t0).expect("mount");

    let loading = board.view(t0);
    assert_eq!(loading.opacity, 0.3);
    assert_eq!(loading.empty_message.as_deref(), Some("No data available"));

    let outcome = board.complete_fetch(
        ticket,
        Ok(vec![merchant("fraud_Kuhn", 0.12), merchant("fraud_Abbott", 0.4)]),
        t0,
    );
    assert_eq!(outcome, CompletionOutcome::Applied);

    let view = board.view(t0 + Duration::from_millis(300));
    assert_eq!(view.opacity, 1.0);
    assert_eq!(view.empty_message, None);
    assert_eq!(view.entries[0].merchant, "fraud_Abbott");
    assert_eq!(view.entries[1].percent_label, "12.0%");
}

#[test]
fn failed_refresh_keeps_previous_rows_and_teardown_stops_polling() {
    let t0 = Instant::now();
    let mut board = leaderboard();
    let first = board.mount(t0).expect("mount");
    board.complete_fetch(first, Ok(vec![merchant("fraud_Kuhn", 0.12)]), t0);

    let tick = t0 + Duration::from_secs(60);
    let second = board.on_timer(tick).expect("refresh due");
    let outcome = board.complete_fetch(
        second,
        Err(VizError::Http {
            endpoint: "/api/getSortedFraudulentMerchants/20".to_owned(),
            status: 500,
        }),
        tick,
    );
    assert_eq!(outcome, CompletionOutcome::Failed);
    assert_eq!(board.view(tick + Duration::from_secs(1)).entries.len(), 1);

    let third = board
        .on_timer(tick + Duration::from_secs(60))
        .expect("refresh due");
    board.teardown();
    assert_eq!(board.next_deadline(), None);
    assert_eq!(
        board.complete_fetch(third, Ok(Vec::new()), tick + Duration::from_secs(61)),
        CompletionOutcome::Ignored
    );
    assert_eq!(board.view(tick + Duration::from_secs(62)).entries.len(), 1);
}

#[test]
fn abandoned_initial_fetch_undims_the_panel() {
    let t0 = Instant::now();
    let mut board = leaderboard();
    let ticket = board.mount(t0).expect("mount");

    assert!(board.abandon_fetch(ticket, t0));
    let view = board.view(t0 + Duration::from_millis(300));
    assert_eq!(view.opacity, 1.0);
    assert!(view.entries.is_empty());
}

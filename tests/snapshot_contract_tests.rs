use std::time::{Duration, Instant};

use fraudscope::api::{
    CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, LiveBarChart, LiveChartConfig,
};
use fraudscope::core::{MetricPoint, MetricSeries};
use fraudscope::interaction::{PointerPosition, TooltipOverlay};
use fraudscope::refresh::{RefreshStateKind, SchedulerPhase};
use fraudscope::render::{NullRenderer, Theme};

fn hovered_chart() -> LiveBarChart<NullRenderer, TooltipOverlay> {
    let t0 = Instant::now();
    let mut chart = LiveBarChart::new(
        NullRenderer::default(),
        TooltipOverlay::default(),
        LiveChartConfig::default(),
        540,
    )
    .expect("chart init")
    .with_theme(Theme::Dark);
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || {
        MetricSeries::new(vec![
            MetricPoint::new(18.0, 12.0),
            MetricPoint::new(23.0, 30.0),
        ])
    });
    chart
        .render(t0 + Duration::from_secs(1))
        .expect("render");
    chart
        .pointer_move(PointerPosition::local(401.25, 150.0))
        .expect("hover");
    chart
}

#[test]
fn snapshot_captures_observable_state() {
    let chart = hovered_chart();
    let snapshot = chart.snapshot();

    assert_eq!(snapshot.chart_id, chart.id().get());
    assert_eq!(snapshot.scheduler_phase, SchedulerPhase::Running);
    assert_eq!(snapshot.refresh_state, RefreshStateKind::Settled);
    assert_eq!(snapshot.theme, Theme::Dark);
    assert_eq!(snapshot.series.len(), 2);
    assert_eq!(snapshot.hovered, Some(1));
    assert_eq!(snapshot.tooltip.text, "30 at 23");
    assert_eq!(snapshot.opacity, 1.0);
    assert_eq!(snapshot.last_error, None);
}

#[test]
fn contract_v1_round_trips() {
    let snapshot = hovered_chart().snapshot();

    let json = snapshot
        .to_json_contract_v1_pretty()
        .expect("contract should serialize");
    assert!(json.contains("\"schema_version\": 1"));

    let restored = ChartSnapshot::from_json_compat_str(&json).expect("contract should parse");
    assert_eq!(restored, snapshot);
}

#[test]
fn bare_snapshot_json_is_accepted() {
    let snapshot = hovered_chart().snapshot();
    let json = snapshot.to_json_pretty().expect("snapshot should serialize");

    let restored = ChartSnapshot::from_json_compat_str(&json).expect("bare snapshot parses");
    assert_eq!(restored, snapshot);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let snapshot = hovered_chart().snapshot();
    let json = snapshot
        .to_json_contract_v1_pretty()
        .expect("contract should serialize")
        .replace(
            &format!("\"schema_version\": {CHART_SNAPSHOT_JSON_SCHEMA_V1}"),
            "\"schema_version\": 7",
        );

    assert!(ChartSnapshot::from_json_compat_str(&json).is_err());
}

use std::time::{Duration, Instant};

use fraudscope::api::{LiveBarChart, LiveChartConfig};
use fraudscope::core::{MetricPoint, MetricSeries};
use fraudscope::error::VizError;
use fraudscope::interaction::{
    DEFAULT_TOOLTIP_OFFSET_Y, PointerPosition, SharedTooltip, TooltipOverlay, TooltipService,
};
use fraudscope::refresh::{CompletionOutcome, OverlapPolicy, RefreshStateKind, SchedulerPhase};
use fraudscope::render::{NullRenderer, Theme};

type TestChart = LiveBarChart<NullRenderer, TooltipOverlay>;

fn ages(points: &[(f64, f64)]) -> MetricSeries {
    MetricSeries::new(
        points
            .iter()
            .map(|(age, count)| MetricPoint::new(*age, *count))
            .collect(),
    )
    .expect("valid series")
}

fn chart() -> TestChart {
    LiveBarChart::new(
        NullRenderer::default(),
        TooltipOverlay::default(),
        LiveChartConfig::default(),
        540,
    )
    .expect("chart init")
}

fn http_failure() -> VizError {
    VizError::Http {
        endpoint: "/api/getAgeHistogram".to_owned(),
        status: 502,
    }
}

#[test]
fn mount_fetch_and_render_full_cycle() {
    let t0 = Instant::now();
    let mut chart = chart();

    let ticket = chart.mount(t0).expect("mount");
    assert!(chart.is_dimmed());
    assert_eq!(chart.scheduler_phase(), SchedulerPhase::Running);

    let outcome = chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 12.0), (23.0, 30.0)])));
    assert_eq!(outcome, CompletionOutcome::Applied);

    let mid = chart
        .render(t0 + Duration::from_millis(100))
        .expect("render mid transition");
    assert!(mid.animating);
    assert!(mid.progress > 0.0 && mid.progress < 1.0);
    assert_eq!(mid.opacity, 0.3);

    let settled = chart
        .render(t0 + Duration::from_millis(800))
        .expect("render settled");
    assert_eq!(settled.bars_drawn, 2);
    assert_eq!(settled.progress, 1.0);
    assert_eq!(settled.opacity, 1.0);
    assert!(!settled.animating);
    assert_eq!(chart.renderer().frames_rendered, 2);
}

#[test]
fn hovering_second_bar_shows_count_at_age() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 12.0), (23.0, 30.0)])));

    let hovered = chart
        .pointer_move(PointerPosition::local(401.25, 150.0).with_page(801.25, 450.0))
        .expect("pointer move");

    assert_eq!(hovered, Some(1));
    let tooltip = chart.tooltip().state();
    assert!(tooltip.visible);
    assert_eq!(tooltip.text, "30 at 23");
    assert_eq!(tooltip.x, 801.25);
    assert_eq!(tooltip.y, 450.0 - DEFAULT_TOOLTIP_OFFSET_Y);

    chart
        .render(t0 + Duration::from_secs(1))
        .expect("render hovered");
    let frame = chart.renderer().last_frame.clone().expect("frame");
    assert_eq!(frame.rects[1].fill_color, Theme::Light.palette().bar_hover);

    let hovered = chart
        .pointer_move(PointerPosition::local(30.0, 150.0))
        .expect("pointer move");
    assert_eq!(hovered, None);
    assert!(!chart.tooltip().state().visible);
}

#[test]
fn failed_refresh_keeps_displayed_data() {
    let t0 = Instant::now();
    let mut chart = chart();
    let first = chart.mount(t0).expect("mount");
    chart.run_fetch(first, t0, || Ok(ages(&[(18.0, 12.0)])));

    let tick = t0 + Duration::from_secs(60);
    let second = chart.on_timer(tick).expect("refresh due");
    let outcome = chart.complete_fetch(second, Err(http_failure()), tick);

    assert_eq!(outcome, CompletionOutcome::Failed);
    assert_eq!(chart.refresh_state().kind(), RefreshStateKind::Failed);
    assert_eq!(chart.displayed_series().map(MetricSeries::len), Some(1));

    let report = chart
        .render(tick + Duration::from_secs(1))
        .expect("render after failure");
    assert_eq!(report.bars_drawn, 1);
    assert_eq!(report.opacity, 1.0);
}

#[test]
fn failure_without_data_shows_placeholder() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.complete_fetch(ticket, Err(http_failure()), t0);

    let report = chart
        .render(t0 + Duration::from_secs(1))
        .expect("render placeholder");

    assert_eq!(report.bars_drawn, 0);
    let frame = chart.renderer().last_frame.clone().expect("frame");
    assert_eq!(frame.texts.len(), 1);
    assert_eq!(frame.texts[0].text, "No data available");
}

#[test]
fn empty_series_renders_zero_bars_without_error() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || Ok(MetricSeries::empty()));

    let report = chart
        .render(t0 + Duration::from_secs(1))
        .expect("empty data is not an error");

    assert_eq!(report.bars_drawn, 0);
    assert!(chart.layout().expect("layout").is_none());
    assert_eq!(chart.renderer().last_rect_count(), 0);
}

#[test]
fn teardown_after_one_cycle_stops_everything() {
    let t0 = Instant::now();
    let mut chart = chart();
    let first = chart.mount(t0).expect("mount");
    chart.run_fetch(first, t0, || Ok(ages(&[(18.0, 12.0), (23.0, 30.0)])));
    let tick = t0 + Duration::from_secs(60);
    let pending = chart.on_timer(tick).expect("refresh due");
    chart
        .pointer_move(PointerPosition::local(401.25, 150.0))
        .expect("pointer move");

    chart.teardown();

    assert!(chart.is_torn_down());
    assert_eq!(chart.next_deadline(tick), None);
    assert_eq!(chart.in_flight(), 0);
    assert!(!chart.tooltip().state().visible);

    let outcome = chart.complete_fetch(pending, Ok(ages(&[(99.0, 1.0)])), tick);
    assert_eq!(outcome, CompletionOutcome::Ignored);
    assert_eq!(chart.displayed_series().map(MetricSeries::len), Some(2));
    assert!(chart.on_timer(tick + Duration::from_secs(60)).is_none());
    assert!(chart.render(tick).is_err());
    assert_eq!(
        chart.pointer_move(PointerPosition::local(401.25, 150.0)).expect("no-op"),
        None
    );
}

#[test]
fn out_of_order_responses_display_the_newest() {
    let t0 = Instant::now();
    let mut chart = chart();
    let fetch_a = chart.mount(t0).expect("mount");
    let tick = t0 + Duration::from_secs(60);
    let fetch_b = chart.on_timer(tick).expect("refresh due");

    chart.complete_fetch(fetch_b, Ok(ages(&[(40.0, 4.0)])), tick);
    let outcome = chart.complete_fetch(fetch_a, Ok(ages(&[(30.0, 3.0)])), tick);

    assert_eq!(outcome, CompletionOutcome::Stale);
    let shown = chart.displayed_series().expect("data");
    assert_eq!(shown.get(0).map(|point| point.value), Some(4.0));
    assert_eq!(chart.in_flight(), 0);
}

#[test]
fn next_deadline_tracks_refresh_fade_and_transition() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    assert_eq!(chart.next_deadline(t0), Some(t0 + Duration::from_secs(60)));

    chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 12.0)])));
    assert_eq!(chart.next_deadline(t0), Some(t0 + Duration::from_millis(300)));

    chart.render(t0 + Duration::from_millis(300)).expect("render");
    assert_eq!(
        chart.next_deadline(t0 + Duration::from_millis(300)),
        Some(t0 + Duration::from_millis(800))
    );
    assert_eq!(
        chart.next_deadline(t0 + Duration::from_millis(800)),
        Some(t0 + Duration::from_secs(60))
    );
}

#[test]
fn abandoned_fetch_releases_the_dim() {
    let t0 = Instant::now();
    let mut chart = chart();
    let first = chart.mount(t0).expect("mount");
    chart.run_fetch(first, t0, || Ok(ages(&[(18.0, 12.0)])));

    let tick = t0 + Duration::from_secs(60);
    let lost = chart.on_timer(tick).expect("refresh due");
    assert!(chart.is_dimmed());

    assert!(chart.abandon_fetch(lost, tick));
    assert_eq!(chart.in_flight(), 0);
    chart
        .render(tick + Duration::from_millis(300))
        .expect("render");
    assert!(!chart.is_dimmed());
    assert!(!chart.abandon_fetch(lost, tick));
}

#[test]
fn skip_policy_does_not_dim_for_skipped_ticks() {
    let t0 = Instant::now();
    let config = LiveChartConfig::default().with_overlap_policy(OverlapPolicy::SkipWhileInFlight);
    let mut chart =
        LiveBarChart::new(NullRenderer::default(), TooltipOverlay::default(), config, 540)
            .expect("chart init");
    let first = chart.mount(t0).expect("mount");

    assert!(chart.on_timer(t0 + Duration::from_secs(60)).is_none());
    assert_eq!(chart.in_flight(), 1);

    chart.run_fetch(first, t0 + Duration::from_secs(61), || Ok(ages(&[(18.0, 1.0)])));
    chart
        .render(t0 + Duration::from_secs(62))
        .expect("render");
    assert!(!chart.is_dimmed());
}

#[test]
fn resize_recomputes_layout_and_rejects_zero_width() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 12.0), (23.0, 30.0)])));

    let before = chart.layout().expect("layout").expect("non-empty");
    chart.resize(1080).expect("resize");
    let after = chart.layout().expect("layout").expect("non-empty");

    assert!(after.category_scale.bandwidth() > before.category_scale.bandwidth());
    assert!(chart.resize(0).is_err());
    assert_eq!(chart.viewport().width, 1080);
}

#[test]
fn shrinking_below_margins_clears_bars_instead_of_failing() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 12.0)])));
    chart.render(t0 + Duration::from_secs(1)).expect("render");
    assert_eq!(chart.renderer().last_rect_count(), 1);

    chart.resize(60).expect("resize");
    let report = chart
        .render(t0 + Duration::from_secs(2))
        .expect("narrow container still renders");

    assert_eq!(report.bars_drawn, 0);
    assert_eq!(chart.renderer().frames_rendered, 2);
    assert!(chart.renderer().last_frame.as_ref().is_some_and(|frame| frame.is_empty()));
    assert_eq!(
        chart
            .pointer_move(PointerPosition::local(30.0, 150.0))
            .expect("hit test on collapsed plot"),
        None
    );

    chart.resize(540).expect("resize back");
    let report = chart.render(t0 + Duration::from_secs(3)).expect("render");
    assert_eq!(report.bars_drawn, 1);
}

#[test]
fn huge_backend_value_still_renders() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 1.7e308)])));

    let report = chart
        .render(t0 + Duration::from_secs(1))
        .expect("finite geometry");
    assert_eq!(report.bars_drawn, 1);
}

#[test]
fn theme_switch_restarts_transition_with_new_palette() {
    let t0 = Instant::now();
    let mut chart = chart();
    let ticket = chart.mount(t0).expect("mount");
    chart.run_fetch(ticket, t0, || Ok(ages(&[(18.0, 12.0)])));
    chart.render(t0 + Duration::from_secs(2)).expect("render");

    let switched_at = t0 + Duration::from_secs(3);
    chart.set_theme(Theme::Dark, switched_at);
    let report = chart.render(switched_at).expect("render dark");

    assert!(report.animating);
    assert_eq!(report.progress, 0.0);
    let frame = chart.renderer().last_frame.clone().expect("frame");
    assert_eq!(frame.rects[0].fill_color, Theme::Dark.palette().bar);
}

#[test]
fn two_charts_share_one_tooltip_overlay() {
    let t0 = Instant::now();
    let page = SharedTooltip::default();
    let data = ages(&[(18.0, 12.0), (23.0, 30.0)]);
    let mut left = LiveBarChart::new(
        NullRenderer::default(),
        page.clone(),
        LiveChartConfig::default(),
        540,
    )
    .expect("left chart");
    let mut right = LiveBarChart::new(
        NullRenderer::default(),
        page.clone(),
        LiveChartConfig::default(),
        540,
    )
    .expect("right chart");
    for chart in [&mut left, &mut right] {
        let ticket = chart.mount(t0).expect("mount");
        let data = data.clone();
        chart.run_fetch(ticket, t0, move || Ok(data));
    }

    left.pointer_move(PointerPosition::local(100.0, 150.0))
        .expect("left hover");
    right
        .pointer_move(PointerPosition::local(401.25, 150.0))
        .expect("right hover");
    left.pointer_leave();

    assert_eq!(page.owner(), Some(right.id()));
    assert_eq!(page.state().text, "30 at 23");
    assert_eq!(page.overlay().live_elements(), 1);

    right.teardown();
    assert!(!page.state().visible);
}

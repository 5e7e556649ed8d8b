use fraudscope::core::{
    LayoutOptions, LinearScale, MetricPoint, MetricSeries, NICE_TICK_COUNT, Viewport,
    compute_layout,
};
use fraudscope::render::{BarFrameState, Theme, build_bar_frame};
use fraudscope::api::LiveChartConfig;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn age_histogram() -> MetricSeries {
    MetricSeries::new(
        (18..90)
            .map(|age| {
                let age = f64::from(age);
                MetricPoint::new(age, (age * 7.3) % 113.0)
            })
            .collect(),
    )
    .expect("valid generated series")
}

fn bench_nice_and_ticks(c: &mut Criterion) {
    let scale = LinearScale::new((0.0, 9_876.5), (205.0, 10.0)).expect("valid scale");

    c.bench_function("linear_scale_nice_ticks", |b| {
        b.iter(|| {
            let nice = black_box(scale).nice(NICE_TICK_COUNT);
            let _ = nice.ticks(black_box(5));
        })
    });
}

fn bench_layout_72_bars(c: &mut Criterion) {
    let series = age_histogram();
    let options = LayoutOptions::default();

    c.bench_function("compute_layout_72_bars", |b| {
        b.iter(|| {
            let _ = compute_layout(
                black_box(&series),
                black_box(Viewport::new(1280, 250)),
                black_box(&options),
            )
            .expect("layout should succeed");
        })
    });
}

fn bench_frame_build_72_bars(c: &mut Criterion) {
    let series = age_histogram();
    let config = LiveChartConfig::default();
    let viewport = Viewport::new(1280, 250);
    let layout = compute_layout(&series, viewport, &config.layout_options())
        .expect("layout should succeed");
    let style = config.frame_style(Theme::Dark);

    c.bench_function("build_bar_frame_72_bars", |b| {
        b.iter(|| {
            let _ = build_bar_frame(
                viewport,
                black_box(layout.as_ref()),
                &style,
                BarFrameState {
                    progress: 0.5,
                    opacity: 0.3,
                    hovered: Some(3),
                },
                None,
            );
        })
    });
}

criterion_group!(
    benches,
    bench_nice_and_ticks,
    bench_layout_72_bars,
    bench_frame_build_72_bars
);
criterion_main!(benches);

use std::time::{Duration, Instant};

use fraudscope::refresh::{FadeConfig, FadeCoordinator, FadePhase};

fn coordinator() -> FadeCoordinator {
    FadeCoordinator::new(FadeConfig::default()).expect("valid fade config")
}

#[test]
fn refresh_dims_until_hold_elapses() {
    let t0 = Instant::now();
    let mut fade = coordinator();
    assert_eq!(fade.opacity(), 1.0);

    fade.begin_refresh();
    assert_eq!(fade.phase(), FadePhase::Refreshing);
    assert_eq!(fade.opacity(), 0.3);

    let done = t0 + Duration::from_millis(120);
    fade.finish_refresh(done);
    assert_eq!(
        fade.phase(),
        FadePhase::Holding {
            until: done + Duration::from_millis(300)
        }
    );
    assert_eq!(fade.opacity(), 0.3);

    assert!(!fade.poll(done + Duration::from_millis(299)));
    assert!(fade.is_dimmed());
    assert!(fade.poll(done + Duration::from_millis(300)));
    assert_eq!(fade.phase(), FadePhase::Settled);
    assert_eq!(fade.opacity(), 1.0);
}

#[test]
fn hold_starts_after_last_outstanding_fetch() {
    let t0 = Instant::now();
    let mut fade = coordinator();

    fade.begin_refresh();
    fade.begin_refresh();
    fade.finish_refresh(t0 + Duration::from_millis(50));
    assert_eq!(fade.phase(), FadePhase::Refreshing);
    assert_eq!(fade.deadline(), None);

    let last = t0 + Duration::from_millis(900);
    fade.finish_refresh(last);
    assert_eq!(fade.deadline(), Some(last + Duration::from_millis(300)));
}

#[test]
fn new_refresh_during_hold_dims_again() {
    let t0 = Instant::now();
    let mut fade = coordinator();
    fade.begin_refresh();
    fade.finish_refresh(t0);

    fade.begin_refresh();
    assert_eq!(fade.phase(), FadePhase::Refreshing);
    assert!(!fade.poll(t0 + Duration::from_secs(5)));
    assert!(fade.is_dimmed());
}

#[test]
fn reset_clears_dim_and_outstanding_count() {
    let t0 = Instant::now();
    let mut fade = coordinator();
    fade.begin_refresh();
    fade.begin_refresh();

    fade.reset();
    assert_eq!(fade.phase(), FadePhase::Settled);
    assert_eq!(fade.deadline(), None);

    fade.begin_refresh();
    fade.finish_refresh(t0);
    assert!(matches!(fade.phase(), FadePhase::Holding { .. }));
}

#[test]
fn out_of_range_opacity_is_rejected() {
    let config = FadeConfig {
        dimmed_opacity: 1.5,
        ..FadeConfig::default()
    };
    assert!(FadeCoordinator::new(config).is_err());
}

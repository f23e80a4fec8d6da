use super::*;

fn page() -> Viewport {
    Viewport::new(Size::new(1280.0, 800.0), Size::new(1280.0, 5000.0))
}

fn surface(config: MotionConfig) -> SmoothScroll {
    SmoothScroll::new(&config, page())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn wheel_glides_and_lands_exactly_on_target() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 300.0 });
    assert_eq!(s.state().raw_offset, 300.0);
    assert_eq!(s.state().smoothed_offset, 0.0);

    let first = s.advance(16.0);
    let expected = 300.0 * Ease::ScrollExpo.apply(0.016 / 1.2);
    assert!(approx(first.smoothed_offset, expected));
    assert!(first.velocity > 0.0);
    assert_eq!(first.direction, ScrollDirection::Down);

    for _ in 0..80 {
        s.advance(16.0);
    }
    assert_eq!(s.state().smoothed_offset, 300.0);
    assert!(!s.is_animating());
    assert_eq!(s.advance(16.0).velocity, 0.0);
}

#[test]
fn retarget_restarts_from_current_smoothed_value() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 400.0 });
    s.advance(100.0);
    let mid = s.state().smoothed_offset;
    s.input(ScrollInput::Wheel { dx: 0.0, dy: -400.0 });
    assert_eq!(s.state().raw_offset, 0.0);
    assert_eq!(s.state().direction, ScrollDirection::Up);
    assert_eq!(s.state().smoothed_offset, mid);
    let next = s.advance(16.0);
    assert!(next.smoothed_offset < mid);
    assert!(next.velocity < 0.0);
}

#[test]
fn target_is_clamped_to_scrollable_range() {
    let mut s = surface(MotionConfig::default());
    assert_eq!(s.limit(), 4200.0);
    s.input(ScrollInput::Wheel { dx: 0.0, dy: -50.0 });
    assert_eq!(s.state().raw_offset, 0.0);
    s.input(ScrollInput::ScrollTo {
        offset: 10_000.0,
        immediate: true,
    });
    assert_eq!(s.state().raw_offset, 4200.0);
    assert_eq!(s.state().smoothed_offset, 4200.0);
}

#[test]
fn touch_is_immediate_without_touch_smoothing() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Touch { dx: 0.0, dy: 50.0 });
    assert_eq!(s.state().smoothed_offset, 100.0);
    assert!(!s.is_animating());
    assert_eq!(s.advance(16.0).velocity, 100.0);
}

#[test]
fn touch_smoothing_eases_touch_like_wheel() {
    let mut s = surface(MotionConfig {
        touch_smoothing: true,
        ..MotionConfig::default()
    });
    s.input(ScrollInput::Touch { dx: 0.0, dy: 50.0 });
    assert_eq!(s.state().raw_offset, 100.0);
    assert_eq!(s.state().smoothed_offset, 0.0);
    assert!(s.is_animating());
}

#[test]
fn wheel_multiplier_scales_deltas() {
    let mut s = surface(MotionConfig {
        wheel_multiplier: 0.5,
        ..MotionConfig::default()
    });
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 100.0 });
    assert_eq!(s.state().raw_offset, 50.0);
}

#[test]
fn direction_lock_ignores_the_other_axis() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 500.0, dy: 0.0 });
    assert_eq!(s.state().raw_offset, 0.0);
    assert!(!s.is_animating());

    let mut h = SmoothScroll::new(
        &MotionConfig {
            direction: ScrollAxis::Horizontal,
            ..MotionConfig::default()
        },
        Viewport::new(Size::new(1000.0, 800.0), Size::new(3000.0, 800.0)),
    );
    h.input(ScrollInput::Wheel { dx: 120.0, dy: 999.0 });
    assert_eq!(h.state().raw_offset, 120.0);
}

#[test]
fn long_tick_is_clamped_to_max_tick() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 300.0 });
    let state = s.advance(5000.0);
    let expected = 300.0 * Ease::ScrollExpo.apply((1000.0 / 60.0) / 1000.0 / 1.2);
    assert!(approx(state.smoothed_offset, expected));
    assert!(state.smoothed_offset < 300.0);
}

#[test]
fn ticks_at_the_threshold_are_not_clamped() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 300.0 });
    let state = s.advance(250.0);
    let expected = 300.0 * Ease::ScrollExpo.apply(0.25 / 1.2);
    assert!(approx(state.smoothed_offset, expected));
}

#[test]
fn stop_halts_and_ignores_input_until_start() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 300.0 });
    s.advance(100.0);
    s.stop();
    let held = s.state().smoothed_offset;
    assert_eq!(s.state().raw_offset, held);
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 300.0 });
    assert_eq!(s.advance(16.0).smoothed_offset, held);

    s.start();
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 100.0 });
    assert_eq!(s.state().raw_offset, held + 100.0);
}

#[test]
fn destroy_ignores_everything_afterwards() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::Wheel { dx: 0.0, dy: 300.0 });
    s.destroy();
    s.destroy();
    assert!(s.is_destroyed());
    s.input(ScrollInput::ScrollTo {
        offset: 1000.0,
        immediate: true,
    });
    let state = s.advance(16.0);
    assert_eq!(state.smoothed_offset, 0.0);
    assert_eq!(state.velocity, 0.0);
}

#[test]
fn shrinking_the_document_clamps_offsets() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::ScrollTo {
        offset: 4000.0,
        immediate: true,
    });
    s.input(ScrollInput::Resize {
        viewport: Viewport::new(Size::new(1280.0, 800.0), Size::new(1280.0, 2000.0)),
    });
    assert_eq!(s.limit(), 1200.0);
    assert_eq!(s.state().raw_offset, 1200.0);
    assert_eq!(s.state().smoothed_offset, 1200.0);
}

#[test]
fn resize_during_glide_stays_within_the_new_limit() {
    let mut s = surface(MotionConfig::default());
    s.input(ScrollInput::ScrollTo {
        offset: 3000.0,
        immediate: true,
    });
    s.input(ScrollInput::ScrollTo {
        offset: 2500.0,
        immediate: false,
    });
    s.advance(16.0);
    assert!(s.state().smoothed_offset > 2600.0);

    s.input(ScrollInput::Resize {
        viewport: Viewport::new(Size::new(1280.0, 800.0), Size::new(1280.0, 3400.0)),
    });
    assert_eq!(s.limit(), 2600.0);
    assert_eq!(s.state().smoothed_offset, 2600.0);

    let mut prev = 2600.0;
    for _ in 0..120 {
        let state = s.advance(16.0);
        assert!(state.smoothed_offset <= 2600.0);
        assert!(state.smoothed_offset <= prev);
        assert!(state.velocity <= 0.0);
        prev = state.smoothed_offset;
    }
    assert_eq!(s.state().smoothed_offset, 2500.0);
    assert!(!s.is_animating());
}

#[test]
fn input_deserializes_from_tagged_json() {
    let input: ScrollInput = serde_json::from_str(r#"{ "type": "wheel", "dy": 120 }"#).unwrap();
    assert_eq!(input, ScrollInput::Wheel { dx: 0.0, dy: 120.0 });
    let input: ScrollInput =
        serde_json::from_str(r#"{ "type": "scrollTo", "offset": 10 }"#).unwrap();
    assert_eq!(
        input,
        ScrollInput::ScrollTo {
            offset: 10.0,
            immediate: false
        }
    );
}

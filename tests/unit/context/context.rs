use std::cell::Cell;

use super::*;
use crate::animation::ease::Ease;
use crate::animation::timeline::{FromTo, Position};
use crate::animation::tween::Motion;
use crate::foundation::core::Size;
use crate::interaction::HoverTween;

const CARD: ElementId = ElementId(1);
const OTHER: ElementId = ElementId(2);

fn viewport() -> Viewport {
    Viewport::new(Size::new(1280.0, 800.0), Size::new(1280.0, 5000.0))
}

fn ctx() -> MotionContext {
    MotionContext::new(MotionConfig::default(), viewport()).unwrap()
}

fn fade(target: ElementId) -> Timeline {
    Timeline::builder("fade")
        .from_to(
            FromTo::new(target)
                .prop(Property::Opacity, 0.0, 1.0)
                .duration(0.5)
                .ease(Ease::Linear),
            Position::Sequential,
        )
        .build()
}

fn th(s: &str) -> Threshold {
    s.parse().unwrap()
}

#[test]
fn context_clock_has_no_lag_smoothing() {
    let ctx = ctx();
    assert_eq!(ctx.clock().lag_smoothing(), None);
    assert_eq!(ctx.clock().subscriber_count(), 1);
}

#[test]
fn invalid_config_is_rejected() {
    let err = MotionContext::new(
        MotionConfig {
            easing_duration: -1.0,
            ..MotionConfig::default()
        },
        viewport(),
    )
    .unwrap_err();
    assert!(matches!(err, MotionError::Validation(_)));
}

#[test]
fn reveal_plays_after_scrolling_into_view() {
    let ctx = ctx();
    let scope = ctx.section("menu");
    scope
        .element(CARD, Rect::new(0.0, 1000.0, 400.0, 1400.0))
        .unwrap();
    let (tl, tr) = scope.reveal(CARD, th("top 85%"), fade(CARD)).unwrap();
    assert_eq!(ctx.property(CARD, Property::Opacity), Some(0.0));

    ctx.frame(16.0);
    assert_eq!(ctx.trigger_state(tr), Some(TriggerState::Pending));

    ctx.scroll_to(400.0, true);
    ctx.frame(16.0);
    assert_eq!(ctx.last_evaluation().fired.as_slice(), &[tr]);
    assert_eq!(ctx.trigger_state(tr), Some(TriggerState::Active));
    assert_eq!(ctx.timeline_state(tl), Some(TimelineState::Running));

    for _ in 0..40 {
        ctx.frame(16.0);
    }
    assert_eq!(ctx.property(CARD, Property::Opacity), Some(1.0));
    assert_eq!(ctx.timeline_state(tl), Some(TimelineState::Completed));
    assert_eq!(ctx.trigger_state(tr), Some(TriggerState::Done));
}

#[test]
fn teardown_is_idempotent_and_removes_registrations() {
    let ctx = ctx();
    let scope = ctx.section("gallery");
    scope
        .element(CARD, Rect::new(0.0, 1000.0, 400.0, 1400.0))
        .unwrap();
    scope.reveal(CARD, th("top 85%"), fade(CARD)).unwrap();
    let binding = scope
        .hover(
            CARD,
            HoverSpec::new().tween(HoverTween::new(
                CARD,
                Property::Scale,
                1.1,
                Motion::new(0.6, Ease::OutQuad),
            )),
        )
        .unwrap();
    let ticks = Rc::new(Cell::new(0));
    {
        let ticks = ticks.clone();
        scope
            .on_tick(move |_, _| ticks.set(ticks.get() + 1))
            .unwrap();
    }
    ctx.frame(16.0);
    assert_eq!(ticks.get(), 1);
    assert_eq!(ctx.clock().subscriber_count(), 2);

    assert!(scope.teardown());
    assert!(!scope.teardown());
    assert!(matches!(
        scope.try_teardown(),
        Err(MotionError::DoubleTeardown { .. })
    ));
    assert!(scope.is_torn_down());
    assert!(!binding.is_active());
    assert_eq!(ctx.trigger_count(), 0);
    assert_eq!(ctx.timeline_count(), 0);
    assert_eq!(ctx.hover_count(), 0);
    assert_eq!(ctx.live_sections(), 0);
    assert_eq!(ctx.property(CARD, Property::Opacity), None);
    assert_eq!(ctx.clock().subscriber_count(), 1);

    ctx.frame(16.0);
    assert_eq!(ticks.get(), 1);
    assert!(matches!(
        scope.element(CARD, Rect::ZERO),
        Err(MotionError::Validation(_))
    ));
}

#[test]
fn teardown_leaves_other_sections_alone() {
    let ctx = ctx();
    let a = ctx.section("a");
    let b = ctx.section("b");
    a.element(CARD, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    b.element(OTHER, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    a.reveal(CARD, th("top bottom"), fade(CARD)).unwrap();
    let (_, tr) = b.reveal(OTHER, th("top bottom"), fade(OTHER)).unwrap();
    a.teardown();
    assert_eq!(ctx.trigger_count(), 1);
    assert!(ctx.trigger(tr).is_some());
    assert!(!b.is_torn_down());
}

#[test]
fn reveal_with_missing_target_registers_nothing() {
    let ctx = ctx();
    let scope = ctx.section("chef");
    let err = scope
        .reveal(CARD, th("top 75%"), fade(CARD))
        .unwrap_err();
    assert!(err.is_missing_target());
    assert_eq!(ctx.timeline_count(), 0);
    assert_eq!(ctx.trigger_count(), 0);
}

#[test]
fn timeline_steps_for_unmounted_targets_are_skipped() {
    let ctx = ctx();
    let scope = ctx.section("hero");
    scope
        .element(CARD, Rect::new(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    let tl = Timeline::builder("intro")
        .from_to(
            FromTo::new(CARD).prop(Property::Y, 50.0, 0.0).duration(1.0),
            Position::Sequential,
        )
        .from_to(
            FromTo::new(OTHER).prop(Property::Y, 50.0, 0.0).duration(1.0),
            Position::Relative(-0.5),
        )
        .build();
    let id = scope.timeline(tl).unwrap();
    assert_eq!(ctx.property(CARD, Property::Y), Some(50.0));
    assert_eq!(ctx.property(OTHER, Property::Y), None);
    assert!(ctx.timeline_state(id).is_some());
}

#[test]
fn resize_recomputes_trigger_positions() {
    let ctx = ctx();
    let scope = ctx.section("location");
    scope
        .element(CARD, Rect::new(0.0, 1000.0, 400.0, 1400.0))
        .unwrap();
    let (_, tr) = scope.reveal(CARD, th("top 80%"), fade(CARD)).unwrap();
    assert_eq!(ctx.trigger(tr).unwrap().start_scroll(), 360.0);

    ctx.resize(Viewport::new(
        Size::new(1280.0, 1000.0),
        Size::new(1280.0, 5000.0),
    ));
    assert_eq!(ctx.trigger(tr).unwrap().start_scroll(), 200.0);

    assert!(ctx.update_bounds(CARD, Rect::new(0.0, 1200.0, 400.0, 1600.0)));
    assert_eq!(ctx.trigger(tr).unwrap().start_scroll(), 400.0);
    assert!(!ctx.update_bounds(OTHER, Rect::ZERO));
}

#[test]
fn section_callbacks_see_the_scroll_state_of_the_same_frame() {
    let ctx = ctx();
    let scope = ctx.section("hero");
    let seen = Rc::new(Cell::new(-1.0));
    {
        let seen = seen.clone();
        scope
            .on_tick(move |_, scroll| seen.set(scroll.smoothed_offset))
            .unwrap();
    }
    ctx.input(ScrollInput::Wheel { dx: 0.0, dy: 200.0 });
    ctx.frame(16.0);
    let offset = ctx.scroll_state().smoothed_offset;
    assert!(offset > 0.0);
    assert_eq!(seen.get(), offset);
}

#[test]
fn destroy_tears_everything_down_and_freezes_the_page() {
    let ctx = ctx();
    let scope = ctx.section("menu");
    scope
        .element(CARD, Rect::new(0.0, 1000.0, 400.0, 1400.0))
        .unwrap();
    scope.reveal(CARD, th("top 85%"), fade(CARD)).unwrap();

    ctx.destroy();
    ctx.destroy();
    assert!(ctx.is_destroyed());
    assert!(scope.is_torn_down());
    assert!(!scope.teardown());
    assert_eq!(ctx.trigger_count(), 0);
    assert_eq!(ctx.clock().subscriber_count(), 0);

    ctx.scroll_to(2000.0, true);
    ctx.frame(16.0);
    assert_eq!(ctx.scroll_state().smoothed_offset, 0.0);
    assert!(ctx.last_evaluation().fired.is_empty());

    let late = ctx.section("late");
    assert!(late.is_torn_down());
}

#[test]
fn scopes_outliving_the_context_fail_cleanly() {
    let ctx = ctx();
    let scope = ctx.section("footer");
    drop(ctx);
    assert!(scope.is_torn_down());
    assert!(!scope.teardown());
    assert!(matches!(
        scope.element(CARD, Rect::ZERO),
        Err(MotionError::Validation(_))
    ));
}

use super::*;
use crate::animation::ease::Ease;
use crate::animation::property::{Property, PropertyStore};
use crate::animation::runtime::TimelineId;
use crate::animation::timeline::{FromTo, Position, Timeline, TimelineState};
use crate::animation::tween::Motion;
use crate::foundation::core::{ElementId, PageLayout, Rect, ScrollAxis};
use crate::trigger::registry::TriggerSpec;
use crate::trigger::threshold::Threshold;

const OWNER: SectionId = SectionId(1);
const CARD: ElementId = ElementId(10);
const BG: ElementId = ElementId(11);
const HEADER: ElementId = ElementId(12);

struct Rig {
    registry: TriggerRegistry,
    runtime: TimelineRuntime,
    store: PropertyStore,
    layout: PageLayout,
}

impl Rig {
    fn new() -> Self {
        let mut layout = PageLayout::new();
        layout.insert(OWNER, CARD, Rect::new(0.0, 1000.0, 400.0, 1400.0));
        layout.insert(OWNER, BG, Rect::new(0.0, 800.0, 1280.0, 1600.0));
        layout.insert(OWNER, HEADER, Rect::new(0.0, 0.0, 1280.0, 80.0));
        Self {
            registry: TriggerRegistry::new(ScrollAxis::Vertical, 800.0),
            runtime: TimelineRuntime::new(),
            store: PropertyStore::new(),
            layout,
        }
    }

    fn timeline(&mut self, tl: Timeline) -> TimelineId {
        self.runtime.insert(OWNER, tl, &mut self.store)
    }

    fn register(&mut self, spec: TriggerSpec) -> TriggerId {
        self.registry.register(OWNER, spec, &self.layout).unwrap()
    }

    fn at(&mut self, offset: f64) -> Evaluation {
        let state = ScrollState {
            raw_offset: offset,
            smoothed_offset: offset,
            ..ScrollState::default()
        };
        evaluate(
            &state,
            &mut self.registry,
            &mut self.runtime,
            &mut self.store,
        )
    }
}

fn th(s: &str) -> Threshold {
    s.parse().unwrap()
}

fn fade(target: ElementId) -> Timeline {
    Timeline::builder("fade")
        .from_to(
            FromTo::new(target)
                .prop(Property::Opacity, 0.0, 1.0)
                .duration(1.0)
                .ease(Ease::Linear),
            Position::Sequential,
        )
        .build()
}

fn parallax(target: ElementId) -> Timeline {
    Timeline::builder("parallax")
        .from_to(
            FromTo::new(target)
                .prop(Property::YPercent, 0.0, -20.0)
                .duration(1.0)
                .ease(Ease::Linear),
            Position::Sequential,
        )
        .build()
}

#[test]
fn once_fires_at_most_once_under_oscillation() {
    let mut rig = Rig::new();
    let tl = rig.timeline(fade(CARD));
    let id = rig.register(TriggerSpec::once(CARD, th("top 85%"), tl));

    assert!(rig.at(0.0).fired.is_empty());
    let mut fired = 0;
    for offset in [330.0, 100.0, 500.0, 0.0, 320.0, 2000.0, 319.0] {
        fired += rig.at(offset).fired.len();
    }
    assert_eq!(fired, 1);
    let t = rig.registry.get(id).unwrap();
    assert_eq!(t.state(), TriggerState::Active);
    assert_eq!(t.fire_count(), 1);
    assert_eq!(
        rig.runtime.timeline(tl).unwrap().state(),
        TimelineState::Running
    );
}

#[test]
fn top_85_fires_at_80_percent_but_not_at_90() {
    let mut rig = Rig::new();
    let tl = rig.timeline(fade(CARD));
    let id = rig.register(TriggerSpec::once(CARD, th("top 85%"), tl));

    // Card top at 90% of the viewport: 1000 - 0.9 * 800.
    rig.at(280.0);
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Pending);
    // Card top at 80% of the viewport.
    let ev = rig.at(360.0);
    assert_eq!(ev.fired.as_slice(), &[id]);
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Active);
}

#[test]
fn once_is_done_only_after_its_timeline_completes() {
    let mut rig = Rig::new();
    let tl = rig.timeline(fade(CARD));
    let id = rig.register(TriggerSpec::once(CARD, th("top 85%"), tl));

    rig.at(360.0);
    assert!(settle(&mut rig.registry, &rig.runtime).is_empty());
    // The first frame after play starts at time 0.
    rig.runtime.advance(0.0, &mut rig.store);
    rig.runtime.advance(0.5, &mut rig.store);
    assert!(settle(&mut rig.registry, &rig.runtime).is_empty());
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Active);

    rig.runtime.advance(0.6, &mut rig.store);
    assert_eq!(
        settle(&mut rig.registry, &rig.runtime).as_slice(),
        &[id]
    );
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Done);
    assert!(settle(&mut rig.registry, &rig.runtime).is_empty());

    // Scrolling back and forth afterwards never fires again.
    for offset in [0.0, 2000.0, 0.0, 400.0] {
        assert!(rig.at(offset).fired.is_empty());
    }
    assert_eq!(rig.registry.get(id).unwrap().fire_count(), 1);
}

#[test]
fn once_without_timeline_is_done_on_settle() {
    let mut rig = Rig::new();
    let id = rig.register(TriggerSpec {
        action: TriggerAction::Observe,
        ..TriggerSpec::once(CARD, th("top 85%"), TimelineId(0))
    });
    assert_eq!(rig.at(360.0).fired.as_slice(), &[id]);
    assert_eq!(
        settle(&mut rig.registry, &rig.runtime).as_slice(),
        &[id]
    );
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Done);
}

#[test]
fn scrub_progress_depends_only_on_offset() {
    let mut rig = Rig::new();
    let tl = rig.timeline(parallax(BG));
    let id = rig.register(TriggerSpec::scrub(BG, th("top bottom"), None, tl));
    // Window: 0 (top meets bottom) .. 1600 (bottom meets top).

    rig.at(1200.0);
    let direct = rig.store.get(BG, Property::YPercent).unwrap();
    for offset in [0.0, 1600.0, 300.0, 50.0, 1500.0, 1200.0] {
        rig.at(offset);
    }
    assert_eq!(rig.store.get(BG, Property::YPercent), Some(direct));
    assert_eq!(direct, -15.0);
    assert_eq!(rig.registry.get(id).unwrap().progress(), 0.75);

    rig.at(5000.0);
    assert_eq!(rig.store.get(BG, Property::YPercent), Some(-20.0));
    assert_eq!(
        rig.runtime.timeline(tl).unwrap().state(),
        TimelineState::Scrubbing
    );
}

#[test]
fn scrub_reports_window_entry_and_exit() {
    let mut rig = Rig::new();
    let tl = rig.timeline(parallax(BG));
    let id = rig.register(TriggerSpec::scrub(
        BG,
        th("top center"),
        Some(th("bottom center")),
        tl,
    ));
    // Window: 400 .. 1200.
    assert!(rig.at(100.0).entered.is_empty());
    assert_eq!(rig.at(400.0).entered.as_slice(), &[id]);
    assert!(rig.at(800.0).is_quiet());
    assert_eq!(rig.at(1300.0).left.as_slice(), &[id]);
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Pending);
    assert_eq!(rig.at(1300.0).scrubbed, 1);
}

#[test]
fn degenerate_scrub_window_snaps() {
    let mut rig = Rig::new();
    let tl = rig.timeline(parallax(BG));
    let id = rig.register(TriggerSpec::scrub(BG, th("top top"), Some(th("top top")), tl));
    rig.at(799.0);
    assert_eq!(rig.registry.get(id).unwrap().progress(), 0.0);
    rig.at(800.0);
    assert_eq!(rig.registry.get(id).unwrap().progress(), 1.0);
    assert_eq!(rig.store.get(BG, Property::YPercent), Some(-20.0));
}

#[test]
fn toggle_primes_then_flips_on_crossing() {
    let mut rig = Rig::new();
    let tween = ToggleTween {
        element: HEADER,
        property: Property::YPercent,
        on: 0.0,
        off: -110.0,
        motion: Motion::new(0.3, Ease::InOutQuad),
    };
    let id = rig.register(TriggerSpec::toggle(HEADER, th("100px top"), vec![tween]));

    let ev = rig.at(0.0);
    assert!(ev.is_quiet());
    assert_eq!(
        rig.runtime.tween(HEADER, Property::YPercent).unwrap().end_value(),
        -110.0
    );
    rig.runtime.advance(1.0, &mut rig.store);
    assert_eq!(rig.store.get(HEADER, Property::YPercent), Some(-110.0));
    assert_eq!(rig.runtime.tween_count(), 0);

    assert!(rig.at(50.0).is_quiet());
    assert_eq!(rig.runtime.tween_count(), 0);

    assert_eq!(rig.at(150.0).entered.as_slice(), &[id]);
    assert_eq!(
        rig.runtime.tween(HEADER, Property::YPercent).unwrap().end_value(),
        0.0
    );
    rig.runtime.advance(0.15, &mut rig.store);
    let mid = rig.store.get(HEADER, Property::YPercent).unwrap();
    assert!(mid > -110.0 && mid < 0.0);

    assert_eq!(rig.at(20.0).left.as_slice(), &[id]);
    let back = rig.runtime.tween(HEADER, Property::YPercent).unwrap();
    assert_eq!(back.end_value(), -110.0);
    assert_eq!(back.value(), mid);
}

#[test]
fn toggle_enters_only_past_its_start() {
    let mut rig = Rig::new();
    let id = rig.register(TriggerSpec {
        action: TriggerAction::Observe,
        ..TriggerSpec::toggle(HEADER, th("100px top"), Vec::new())
    });

    rig.at(100.0);
    assert_eq!(rig.registry.get(id).unwrap().state(), TriggerState::Pending);
    assert_eq!(rig.at(100.5).entered.as_slice(), &[id]);
    assert_eq!(rig.at(100.0).left.as_slice(), &[id]);
}

#[test]
fn simultaneous_crossings_run_in_registration_order() {
    let mut rig = Rig::new();
    let later = rig.timeline(fade(CARD));
    let earlier = rig.timeline(fade(BG));
    // Registered first but positioned further down the page.
    let a = rig.register(TriggerSpec::once(CARD, th("top bottom"), later));
    let b = rig.register(TriggerSpec::once(BG, th("top bottom"), earlier));
    let ev = rig.at(1000.0);
    assert_eq!(ev.fired.as_slice(), &[a, b]);
}

#[test]
fn removed_trigger_never_fires() {
    let mut rig = Rig::new();
    let tl = rig.timeline(fade(CARD));
    let id = rig.register(TriggerSpec::once(CARD, th("top 85%"), tl));
    assert!(rig.registry.unregister(id));
    assert!(rig.at(2000.0).fired.is_empty());
    assert_eq!(
        rig.runtime.timeline(tl).unwrap().state(),
        TimelineState::Idle
    );
}

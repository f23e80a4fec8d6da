use super::*;
use crate::animation::ease::Ease;
use crate::animation::property::PropertyStore;
use crate::animation::timeline::{FromTo, Position};

const HERO: SectionId = SectionId(1);
const MENU: SectionId = SectionId(2);
const CARD: ElementId = ElementId(10);

fn reveal(target: ElementId) -> Timeline {
    Timeline::builder("reveal")
        .from_to(
            FromTo::new(target)
                .prop(Property::Opacity, 0.0, 1.0)
                .duration(1.0)
                .ease(Ease::Linear),
            Position::Sequential,
        )
        .build()
}

#[test]
fn insert_renders_start_state() {
    let mut rt = TimelineRuntime::new();
    let mut store = PropertyStore::new();
    let id = rt.insert(HERO, reveal(CARD), &mut store);
    assert_eq!(store.get(CARD, Property::Opacity), Some(0.0));
    assert_eq!(rt.timeline(id).unwrap().state(), TimelineState::Idle);
}

#[test]
fn played_timeline_renders_time_zero_on_its_first_frame() {
    let mut rt = TimelineRuntime::new();
    let mut store = PropertyStore::new();
    let id = rt.insert(HERO, reveal(CARD), &mut store);
    assert!(rt.play(id));
    rt.advance(0.016, &mut store);
    assert_eq!(store.get(CARD, Property::Opacity), Some(0.0));
    rt.advance(0.5, &mut store);
    assert!((store.get(CARD, Property::Opacity).unwrap() - 0.5).abs() < 1e-9);
    assert_eq!(rt.running_count(), 1);
    rt.advance(0.6, &mut store);
    assert_eq!(rt.running_count(), 0);
    assert_eq!(
        rt.timeline(id).unwrap().state(),
        TimelineState::Completed
    );
}

#[test]
fn retarget_starts_from_the_current_interpolated_value() {
    let mut rt = TimelineRuntime::new();
    let mut store = PropertyStore::new();
    let motion = Motion::new(1.0, Ease::Linear);

    rt.retarget(HERO, CARD, Property::Scale, 2.0, motion, &mut store);
    rt.advance(0.5, &mut store);
    let mid = store.get(CARD, Property::Scale).unwrap();
    assert!((mid - 1.5).abs() < 1e-9);

    rt.retarget(HERO, CARD, Property::Scale, 1.0, motion, &mut store);
    assert_eq!(rt.tween_count(), 1);
    rt.advance(0.0, &mut store);
    assert_eq!(store.get(CARD, Property::Scale), Some(mid));
    rt.advance(0.5, &mut store);
    assert!((store.get(CARD, Property::Scale).unwrap() - 1.25).abs() < 1e-9);
    rt.advance(0.5, &mut store);
    assert_eq!(store.get(CARD, Property::Scale), Some(1.0));
    assert_eq!(rt.tween_count(), 0);
}

#[test]
fn remove_owner_is_scoped() {
    let mut rt = TimelineRuntime::new();
    let mut store = PropertyStore::new();
    let hero = rt.insert(HERO, reveal(ElementId(1)), &mut store);
    let menu = rt.insert(MENU, reveal(ElementId(2)), &mut store);
    rt.retarget(
        HERO,
        ElementId(1),
        Property::Y,
        -10.0,
        Motion::new(0.4, Ease::OutQuad),
        &mut store,
    );
    assert_eq!(rt.remove_owner(HERO), (1, 1));
    assert!(rt.timeline(hero).is_none());
    assert!(rt.timeline(menu).is_some());
    assert!(!rt.play(hero));
    assert_eq!(rt.remove_owner(HERO), (0, 0));
}

#[test]
fn unknown_ids_are_ignored() {
    let mut rt = TimelineRuntime::new();
    let mut store = PropertyStore::new();
    assert!(!rt.play(TimelineId(99)));
    assert!(!rt.set_progress(TimelineId(99), 0.5, &mut store));
    assert!(store.is_empty());
}

use super::*;
use crate::clock::source::ManualTickSource;

fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> impl FnMut(&Tick) + 'static {
    let log = log.clone();
    move |_| log.borrow_mut().push(name)
}

#[test]
fn callbacks_run_in_registration_order() {
    let clock = FrameClock::new(None);
    let log = Rc::new(RefCell::new(Vec::new()));
    let _a = clock.subscribe(recorder(&log, "a"));
    let _b = clock.subscribe(recorder(&log, "b"));
    let _c = clock.subscribe(recorder(&log, "c"));
    clock.tick(16.0);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn tick_reports_elapsed_and_accumulates_time() {
    let clock = FrameClock::new(None);
    let t1 = clock.tick(16.0);
    let t2 = clock.tick(17.0);
    assert_eq!(t1.frame, 1);
    assert_eq!(t2.frame, 2);
    assert_eq!(t2.elapsed_ms, 17.0);
    assert_eq!(t2.time_ms, 33.0);
    assert_eq!(clock.tick(f64::NAN).elapsed_ms, 0.0);
    assert_eq!(clock.tick(-5.0).elapsed_ms, 0.0);
}

#[test]
fn without_lag_smoothing_long_frames_pass_through() {
    let clock = FrameClock::new(None);
    assert_eq!(clock.tick(5000.0).elapsed_ms, 5000.0);
}

#[test]
fn lag_smoothing_substitutes_long_frames() {
    let clock = FrameClock::new(Some(LagSmoothing {
        threshold_ms: 500.0,
        adjusted_ms: 33.0,
    }));
    assert_eq!(clock.tick(5000.0).elapsed_ms, 33.0);
    assert_eq!(clock.tick(100.0).elapsed_ms, 100.0);
}

#[test]
fn dispose_is_idempotent_and_stops_callbacks() {
    let clock = FrameClock::new(None);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sub = clock.subscribe(recorder(&log, "a"));
    clock.tick(16.0);
    sub.dispose();
    sub.dispose();
    assert!(!sub.is_active());
    clock.tick(16.0);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(clock.subscriber_count(), 0);
}

#[test]
fn dropping_a_subscription_disposes_it() {
    let clock = FrameClock::new(None);
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let _sub = clock.subscribe(recorder(&log, "a"));
        assert_eq!(clock.subscriber_count(), 1);
    }
    clock.tick(16.0);
    assert!(log.borrow().is_empty());
    assert_eq!(clock.subscriber_count(), 0);
}

#[test]
fn disposing_mid_tick_neither_skips_nor_duplicates_others() {
    let clock = FrameClock::new(None);
    let log = Rc::new(RefCell::new(Vec::new()));

    let victim: Rc<RefCell<Option<ClockSubscription>>> = Rc::new(RefCell::new(None));
    let killer = {
        let log = log.clone();
        let victim = victim.clone();
        clock.subscribe(move |_| {
            log.borrow_mut().push("killer");
            if let Some(sub) = victim.borrow().as_ref() {
                sub.dispose();
            }
        })
    };
    *victim.borrow_mut() = Some(clock.subscribe(recorder(&log, "victim")));
    let _after = clock.subscribe(recorder(&log, "after"));

    clock.tick(16.0);
    assert_eq!(*log.borrow(), vec!["killer", "after"]);
    clock.tick(16.0);
    assert_eq!(*log.borrow(), vec!["killer", "after", "killer", "after"]);
    assert_eq!(clock.subscriber_count(), 2);
    drop(killer);
}

#[test]
fn self_disposal_mid_tick_is_safe() {
    let clock = FrameClock::new(None);
    let log = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<ClockSubscription>>> = Rc::new(RefCell::new(None));
    let sub = {
        let log = log.clone();
        let slot = slot.clone();
        clock.subscribe(move |_| {
            log.borrow_mut().push("once");
            if let Some(sub) = slot.borrow().as_ref() {
                sub.dispose();
            }
        })
    };
    *slot.borrow_mut() = Some(sub);
    let _other = clock.subscribe(recorder(&log, "other"));
    clock.tick(16.0);
    clock.tick(16.0);
    assert_eq!(*log.borrow(), vec!["once", "other", "other"]);
}

#[test]
fn subscribing_mid_tick_starts_next_frame() {
    let clock = FrameClock::new(None);
    let log = Rc::new(RefCell::new(Vec::new()));
    let added: Rc<RefCell<Vec<ClockSubscription>>> = Rc::new(RefCell::new(Vec::new()));
    let _spawner = {
        let clock = clock.clone();
        let log = log.clone();
        let added = added.clone();
        clock.clone().subscribe(move |tick| {
            log.borrow_mut().push("spawner");
            if tick.frame == 1 {
                added.borrow_mut().push(clock.subscribe(recorder(&log, "late")));
            }
        })
    };
    clock.tick(16.0);
    assert_eq!(*log.borrow(), vec!["spawner"]);
    clock.tick(16.0);
    assert_eq!(*log.borrow(), vec!["spawner", "spawner", "late"]);
}

#[test]
fn pump_derives_elapsed_from_timestamps() {
    let clock = FrameClock::new(None);
    let mut src = ManualTickSource::from_timestamps([1000.0, 1016.0, 1050.0]);
    assert_eq!(clock.pump(&mut src).unwrap().elapsed_ms, 0.0);
    assert_eq!(clock.pump(&mut src).unwrap().elapsed_ms, 16.0);
    assert_eq!(clock.pump(&mut src).unwrap().elapsed_ms, 34.0);
    assert!(clock.pump(&mut src).is_none());
    assert_eq!(clock.frame(), 3);
}

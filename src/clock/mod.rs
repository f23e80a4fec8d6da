//! Shared per-frame driver.
//!
//! One [`FrameClock`] exists per page session. Everything that needs per-frame work subscribes
//! to it instead of running its own timer loop; the clock runs subscribers in registration
//! order with the elapsed time since the previous tick.

pub(crate) mod source;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::clock::source::TickSource;

/// One frame's timing, produced by [`FrameClock::tick`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Tick {
    /// 1-based frame counter.
    pub frame: u64,
    /// Milliseconds since the previous tick, after the clock's own lag smoothing (if any).
    pub elapsed_ms: f64,
    /// Accumulated clock time in milliseconds.
    pub time_ms: f64,
}

/// Clock-level substitution of long frames: any elapsed time above `threshold_ms` is reported
/// as `adjusted_ms`.
///
/// The motion context never enables this, because the scroll surface already clamps long
/// frames and two smoothing layers compound into input lag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LagSmoothing {
    /// Elapsed time above which a frame counts as lagging.
    pub threshold_ms: f64,
    /// Elapsed time reported instead of a lagging frame.
    pub adjusted_ms: f64,
}

type Callback = Rc<RefCell<dyn FnMut(&Tick)>>;

struct Entry {
    id: u64,
    alive: Rc<Cell<bool>>,
    callback: Callback,
}

struct ClockInner {
    entries: Vec<Entry>,
    next_id: u64,
    frame: u64,
    time_ms: f64,
    last_timestamp_ms: Option<f64>,
    lag_smoothing: Option<LagSmoothing>,
}

/// Single shared frame driver. Cloning yields another handle to the same clock.
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameClock")
            .field("subscribers", &inner.entries.len())
            .field("frame", &inner.frame)
            .field("time_ms", &inner.time_ms)
            .field("lag_smoothing", &inner.lag_smoothing)
            .finish()
    }
}

impl FrameClock {
    /// Create a clock; `None` disables lag smoothing.
    pub fn new(lag_smoothing: Option<LagSmoothing>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClockInner {
                entries: Vec::new(),
                next_id: 0,
                frame: 0,
                time_ms: 0.0,
                last_timestamp_ms: None,
                lag_smoothing,
            })),
        }
    }

    /// Lag smoothing currently in effect.
    pub fn lag_smoothing(&self) -> Option<LagSmoothing> {
        self.inner.borrow().lag_smoothing
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.alive.get())
            .count()
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }

    /// Run `callback` on every tick until the returned subscription is disposed or dropped.
    pub fn subscribe(&self, callback: impl FnMut(&Tick) + 'static) -> ClockSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let alive = Rc::new(Cell::new(true));
        let callback: Callback = Rc::new(RefCell::new(callback));
        inner.entries.push(Entry {
            id,
            alive: alive.clone(),
            callback,
        });
        ClockSubscription {
            id,
            alive,
            clock: Rc::downgrade(&self.inner),
        }
    }

    /// Advance one frame by `elapsed_ms` and run every subscriber.
    ///
    /// Subscribers are snapshotted before the first one runs: one added during this tick first
    /// runs next tick, one disposed during this tick does not run later in it, and no other
    /// subscriber is skipped or run twice.
    pub fn tick(&self, elapsed_ms: f64) -> Tick {
        let (tick, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            let mut elapsed = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
                elapsed_ms
            } else {
                0.0
            };
            if let Some(lag) = inner.lag_smoothing {
                if elapsed > lag.threshold_ms {
                    elapsed = lag.adjusted_ms;
                }
            }
            inner.frame += 1;
            inner.time_ms += elapsed;
            inner.entries.retain(|e| e.alive.get());
            let snapshot: Vec<(Rc<Cell<bool>>, Callback)> = inner
                .entries
                .iter()
                .map(|e| (e.alive.clone(), e.callback.clone()))
                .collect();
            let tick = Tick {
                frame: inner.frame,
                elapsed_ms: elapsed,
                time_ms: inner.time_ms,
            };
            (tick, snapshot)
        };

        tracing::trace!(frame = tick.frame, elapsed_ms = tick.elapsed_ms, "tick");
        for (alive, callback) in snapshot {
            if !alive.get() {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(&tick),
                Err(_) => tracing::warn!(frame = tick.frame, "re-entrant tick skipped"),
            }
        }
        tick
    }

    /// Pull the next timestamp from `source` and tick with the time since the previous one.
    ///
    /// The first timestamp only establishes the origin and ticks with zero elapsed time.
    /// Returns `None` once the source is exhausted.
    pub fn pump(&self, source: &mut dyn TickSource) -> Option<Tick> {
        let now = source.next_timestamp_ms()?;
        let elapsed = {
            let mut inner = self.inner.borrow_mut();
            let elapsed = inner.last_timestamp_ms.map_or(0.0, |last| now - last);
            inner.last_timestamp_ms = Some(now);
            elapsed
        };
        Some(self.tick(elapsed))
    }
}

/// Registration handle returned by [`FrameClock::subscribe`].
///
/// Disposing is idempotent; dropping the handle disposes it.
pub struct ClockSubscription {
    id: u64,
    alive: Rc<Cell<bool>>,
    clock: Weak<RefCell<ClockInner>>,
}

impl std::fmt::Debug for ClockSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockSubscription")
            .field("id", &self.id)
            .field("active", &self.alive.get())
            .finish()
    }
}

impl ClockSubscription {
    /// `true` until disposed.
    pub fn is_active(&self) -> bool {
        self.alive.get()
    }

    /// Stop receiving ticks. Safe to call from inside a tick and safe to call twice.
    pub fn dispose(&self) {
        if !self.alive.replace(false) {
            return;
        }
        if let Some(inner) = self.clock.upgrade() {
            // Mid-tick the list is not borrowed; if it ever is, the dead entry is pruned on
            // the next tick instead.
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.entries.retain(|e| e.id != self.id);
            }
        }
    }
}

impl Drop for ClockSubscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/clock.rs"]
mod tests;

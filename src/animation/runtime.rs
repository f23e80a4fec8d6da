use std::collections::BTreeMap;

use crate::animation::property::{Property, PropertySink};
use crate::animation::timeline::{Timeline, TimelineState};
use crate::animation::tween::{Motion, Tween};
use crate::foundation::core::{ElementId, SectionId};

/// Handle to a timeline owned by a [`TimelineRuntime`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimelineId(pub u32);

#[derive(Debug)]
struct TimelineSlot {
    owner: SectionId,
    timeline: Timeline,
}

#[derive(Debug)]
struct ActiveTween {
    owner: SectionId,
    tween: Tween,
}

/// Owns every timeline and in-flight tween, each tagged with the section that created it.
///
/// Timelines advance in id order, then tweens in element/property order, so a frame always
/// writes values in the same order.
#[derive(Debug, Default)]
pub struct TimelineRuntime {
    timelines: BTreeMap<TimelineId, TimelineSlot>,
    tweens: BTreeMap<(ElementId, Property), ActiveTween>,
    next_id: u32,
}

impl TimelineRuntime {
    /// Create an empty runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `timeline` and render its start state.
    pub fn insert(
        &mut self,
        owner: SectionId,
        mut timeline: Timeline,
        sink: &mut dyn PropertySink,
    ) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        timeline.render_initial(sink);
        tracing::debug!(
            timeline = id.0,
            label = timeline.label(),
            steps = timeline.steps().len(),
            "timeline registered"
        );
        self.timelines.insert(id, TimelineSlot { owner, timeline });
        id
    }

    /// Borrow a timeline.
    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id).map(|s| &s.timeline)
    }

    /// Section that owns a timeline.
    pub fn owner(&self, id: TimelineId) -> Option<SectionId> {
        self.timelines.get(&id).map(|s| s.owner)
    }

    /// Start time-driven playback. Returns `false` for unknown, running or completed timelines.
    pub fn play(&mut self, id: TimelineId) -> bool {
        self.timelines
            .get_mut(&id)
            .is_some_and(|s| s.timeline.play())
    }

    /// Drive a timeline's progress directly. Returns `false` for unknown timelines.
    pub fn set_progress(
        &mut self,
        id: TimelineId,
        progress: f64,
        sink: &mut dyn PropertySink,
    ) -> bool {
        match self.timelines.get_mut(&id) {
            Some(slot) => {
                slot.timeline.set_progress(progress, sink);
                true
            }
            None => false,
        }
    }

    /// Tween `property` on `element` toward `to`, starting from its current value.
    ///
    /// Replaces any in-flight tween on the same element/property.
    pub fn retarget(
        &mut self,
        owner: SectionId,
        element: ElementId,
        property: Property,
        to: f64,
        motion: Motion,
        sink: &mut dyn PropertySink,
    ) {
        let from = sink.current(element, property);
        let tween = Tween::new(element, property, from, to, motion);
        self.tweens
            .insert((element, property), ActiveTween { owner, tween });
    }

    /// Advance running timelines and tweens by `dt_secs`, writing their values.
    pub fn advance(&mut self, dt_secs: f64, sink: &mut dyn PropertySink) {
        for (id, slot) in &mut self.timelines {
            if slot.timeline.state() != TimelineState::Running {
                continue;
            }
            if slot.timeline.advance(dt_secs, sink) == TimelineState::Completed {
                tracing::debug!(
                    timeline = id.0,
                    label = slot.timeline.label(),
                    "timeline completed"
                );
            }
        }

        self.tweens.retain(|_, active| {
            let value = active.tween.advance(dt_secs);
            sink.set(active.tween.target(), active.tween.property(), value);
            !active.tween.is_done()
        });
    }

    /// Drop every timeline and tween owned by `owner`. Returns `(timelines, tweens)` removed.
    pub fn remove_owner(&mut self, owner: SectionId) -> (usize, usize) {
        let timelines = self.timelines.len();
        self.timelines.retain(|_, s| s.owner != owner);
        let tweens = self.tweens.len();
        self.tweens.retain(|_, t| t.owner != owner);
        (
            timelines - self.timelines.len(),
            tweens - self.tweens.len(),
        )
    }

    /// Number of owned timelines.
    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    /// Number of timelines currently playing.
    pub fn running_count(&self) -> usize {
        self.timelines
            .values()
            .filter(|s| s.timeline.state() == TimelineState::Running)
            .count()
    }

    /// Number of in-flight tweens.
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// In-flight tween on `element`/`property`, if any.
    pub fn tween(&self, element: ElementId, property: Property) -> Option<&Tween> {
        self.tweens.get(&(element, property)).map(|t| &t.tween)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/runtime.rs"]
mod tests;

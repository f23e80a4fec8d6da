use smallvec::SmallVec;

use crate::animation::property::PropertySink;
use crate::animation::runtime::TimelineRuntime;
use crate::animation::timeline::TimelineState;
use crate::foundation::core::SectionId;
use crate::scroll::surface::ScrollState;
use crate::trigger::registry::{
    ToggleTween, Trigger, TriggerAction, TriggerId, TriggerMode, TriggerRegistry, TriggerState,
};

/// State changes observed during one [`evaluate`] pass, in registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    /// One-shot triggers that fired.
    pub fired: SmallVec<[TriggerId; 4]>,
    /// Scrub and toggle triggers that entered their window.
    pub entered: SmallVec<[TriggerId; 4]>,
    /// Scrub and toggle triggers that left their window.
    pub left: SmallVec<[TriggerId; 4]>,
    /// Number of scrub triggers whose progress was written.
    pub scrubbed: usize,
    /// One-shot triggers that became `Done` after their timeline finished.
    pub completed: SmallVec<[TriggerId; 4]>,
}

impl Evaluation {
    /// `true` when no trigger changed state.
    pub fn is_quiet(&self) -> bool {
        self.fired.is_empty()
            && self.entered.is_empty()
            && self.left.is_empty()
            && self.completed.is_empty()
    }
}

/// Evaluate every registered trigger against `state.smoothed_offset`.
///
/// Triggers run in id order, so when several cross in the same frame the earlier registration
/// acts first. One-shot triggers move `Pending -> Active` and start their timeline; [`settle`]
/// moves them on to `Done`. Scrub triggers write progress on every pass whether or not the
/// offset moved.
pub fn evaluate(
    state: &ScrollState,
    registry: &mut TriggerRegistry,
    runtime: &mut TimelineRuntime,
    sink: &mut dyn PropertySink,
) -> Evaluation {
    let offset = state.smoothed_offset;
    let mut out = Evaluation::default();

    for trigger in registry.iter_mut() {
        match trigger.mode {
            TriggerMode::Once => fire_once(trigger, offset, runtime, &mut out),
            TriggerMode::Scrub => scrub(trigger, offset, runtime, sink, &mut out),
            TriggerMode::Toggle => toggle(trigger, offset, runtime, sink, &mut out),
        }
    }

    if !out.is_quiet() {
        tracing::trace!(
            offset,
            fired = out.fired.len(),
            entered = out.entered.len(),
            left = out.left.len(),
            "triggers evaluated"
        );
    }
    out
}

fn fire_once(
    trigger: &mut Trigger,
    offset: f64,
    runtime: &mut TimelineRuntime,
    out: &mut Evaluation,
) {
    if trigger.state != TriggerState::Pending || offset < trigger.start_scroll {
        return;
    }
    trigger.state = TriggerState::Active;
    if let TriggerAction::Timeline(id) = trigger.action {
        if !runtime.play(id) {
            tracing::warn!(
                trigger = trigger.id.0,
                timeline = id.0,
                "bound timeline is gone or already played"
            );
        }
    }
    trigger.fire_count += 1;
    tracing::debug!(
        trigger = trigger.id.0,
        element = %trigger.target,
        offset,
        "one-shot trigger fired"
    );
    out.fired.push(trigger.id);
}

/// Move active one-shot triggers to `Done` once their timeline is no longer running.
///
/// Runs after the runtime advanced, so a reveal stays `Active` for as long as it plays.
/// Triggers without a timeline, or whose timeline is gone, finish on the first pass.
pub fn settle(
    registry: &mut TriggerRegistry,
    runtime: &TimelineRuntime,
) -> SmallVec<[TriggerId; 4]> {
    let mut done = SmallVec::new();
    for trigger in registry.iter_mut() {
        if trigger.mode != TriggerMode::Once || trigger.state != TriggerState::Active {
            continue;
        }
        let running = match trigger.action {
            TriggerAction::Timeline(id) => runtime
                .timeline(id)
                .is_some_and(|tl| tl.state() == TimelineState::Running),
            _ => false,
        };
        if running {
            continue;
        }
        trigger.state = TriggerState::Done;
        tracing::debug!(trigger = trigger.id.0, "one-shot trigger done");
        done.push(trigger.id);
    }
    done
}

fn scrub(
    trigger: &mut Trigger,
    offset: f64,
    runtime: &mut TimelineRuntime,
    sink: &mut dyn PropertySink,
    out: &mut Evaluation,
) {
    let start = trigger.start_scroll;
    let end = trigger.end_scroll.unwrap_or(start);
    let progress = if end > start {
        ((offset - start) / (end - start)).clamp(0.0, 1.0)
    } else if offset >= start {
        1.0
    } else {
        0.0
    };
    trigger.progress = progress;
    if let TriggerAction::Timeline(id) = trigger.action {
        runtime.set_progress(id, progress, sink);
    }
    out.scrubbed += 1;

    let inside = offset >= start && offset <= end;
    transition(trigger, inside, out);
}

fn toggle(
    trigger: &mut Trigger,
    offset: f64,
    runtime: &mut TimelineRuntime,
    sink: &mut dyn PropertySink,
    out: &mut Evaluation,
) {
    // Strictly past the start: a header toggled at 100px stays hidden at exactly 100px.
    let inside =
        offset > trigger.start_scroll && trigger.end_scroll.is_none_or(|end| offset < end);
    let was_inside = trigger.state == TriggerState::Active;
    if trigger.primed && inside == was_inside {
        return;
    }
    trigger.primed = true;
    if let TriggerAction::Toggle(tweens) = &trigger.action {
        for tw in tweens {
            let to = if inside { tw.on } else { tw.off };
            apply_toggle(trigger.owner, tw, to, runtime, sink);
        }
    }
    transition(trigger, inside, out);
}

fn apply_toggle(
    owner: SectionId,
    tw: &ToggleTween,
    to: f64,
    runtime: &mut TimelineRuntime,
    sink: &mut dyn PropertySink,
) {
    if runtime.tween(tw.element, tw.property).map(|t| t.end_value()) == Some(to) {
        return;
    }
    runtime.retarget(owner, tw.element, tw.property, to, tw.motion, sink);
}

fn transition(trigger: &mut Trigger, inside: bool, out: &mut Evaluation) {
    match (trigger.state, inside) {
        (TriggerState::Pending, true) => {
            trigger.state = TriggerState::Active;
            tracing::debug!(trigger = trigger.id.0, mode = ?trigger.mode, "trigger entered");
            out.entered.push(trigger.id);
        }
        (TriggerState::Active, false) => {
            trigger.state = TriggerState::Pending;
            tracing::debug!(trigger = trigger.id.0, mode = ?trigger.mode, "trigger left");
            out.left.push(trigger.id);
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/scheduler.rs"]
mod tests;

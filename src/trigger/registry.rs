use std::collections::BTreeMap;

use crate::animation::property::Property;
use crate::animation::runtime::TimelineId;
use crate::animation::tween::Motion;
use crate::foundation::core::{ElementId, PageLayout, Rect, ScrollAxis, SectionId};
use crate::foundation::error::{MotionError, MotionResult};
use crate::trigger::threshold::{Anchor, Threshold};

/// Handle to a registered trigger. Ids grow with registration order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TriggerId(pub u32);

/// How a trigger reacts to scroll position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Fire once when the start threshold is reached, then never again.
    Once,
    /// Map the scroll position between start and end onto timeline progress.
    Scrub,
    /// Play an enter tween when crossed forward and a leave tween when crossed back.
    Toggle,
}

/// Lifecycle state of a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerState {
    /// Waiting for the scroll position to enter the trigger window.
    Pending,
    /// Inside the trigger window.
    Active,
    /// One-shot trigger that has fired; terminal.
    Done,
}

/// One property tween flipped by a toggle trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToggleTween {
    /// Animated element.
    pub element: ElementId,
    /// Animated property.
    pub property: Property,
    /// Value while the trigger is active.
    pub on: f64,
    /// Value while the trigger is inactive.
    pub off: f64,
    /// Motion used in both directions.
    pub motion: Motion,
}

/// What a trigger drives when its state changes.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerAction {
    /// Play (one-shot) or scrub a timeline owned by the runtime.
    Timeline(TimelineId),
    /// Retarget property tweens on enter and leave.
    Toggle(Vec<ToggleTween>),
    /// No bound action; state changes are only reported.
    Observe,
}

/// Registration request for [`TriggerRegistry::register`].
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSpec {
    /// Element whose bounds position the trigger.
    pub target: ElementId,
    /// Threshold that opens the trigger window.
    pub start: Threshold,
    /// Threshold that closes it. Scrub triggers default to `"bottom top"`.
    pub end: Option<Threshold>,
    /// Reaction to scroll position.
    pub mode: TriggerMode,
    /// Bound action.
    pub action: TriggerAction,
}

impl TriggerSpec {
    /// One-shot reveal that plays `timeline` when `start` is reached.
    pub fn once(target: ElementId, start: Threshold, timeline: TimelineId) -> Self {
        Self {
            target,
            start,
            end: None,
            mode: TriggerMode::Once,
            action: TriggerAction::Timeline(timeline),
        }
    }

    /// Scroll-linked effect driving `timeline` between `start` and `end`.
    pub fn scrub(
        target: ElementId,
        start: Threshold,
        end: Option<Threshold>,
        timeline: TimelineId,
    ) -> Self {
        Self {
            target,
            start,
            end,
            mode: TriggerMode::Scrub,
            action: TriggerAction::Timeline(timeline),
        }
    }

    /// Enter/leave toggle active from `start` onwards.
    pub fn toggle(target: ElementId, start: Threshold, tweens: Vec<ToggleTween>) -> Self {
        Self {
            target,
            start,
            end: None,
            mode: TriggerMode::Toggle,
            action: TriggerAction::Toggle(tweens),
        }
    }

    /// Close the trigger window at `end`.
    pub fn with_end(mut self, end: Threshold) -> Self {
        self.end = Some(end);
        self
    }
}

/// A registered trigger with its resolved scroll window.
#[derive(Clone, Debug)]
pub struct Trigger {
    pub(crate) id: TriggerId,
    pub(crate) owner: SectionId,
    pub(crate) target: ElementId,
    pub(crate) target_bounds: Rect,
    pub(crate) start: Threshold,
    pub(crate) end: Option<Threshold>,
    pub(crate) mode: TriggerMode,
    pub(crate) state: TriggerState,
    pub(crate) action: TriggerAction,
    pub(crate) start_scroll: f64,
    pub(crate) end_scroll: Option<f64>,
    pub(crate) progress: f64,
    pub(crate) fire_count: u32,
    pub(crate) primed: bool,
}

impl Trigger {
    /// Registration id.
    pub fn id(&self) -> TriggerId {
        self.id
    }

    /// Section that registered the trigger.
    pub fn owner(&self) -> SectionId {
        self.owner
    }

    /// Element positioning the trigger.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Bounds of the target when positions were last computed.
    pub fn target_bounds(&self) -> Rect {
        self.target_bounds
    }

    /// Start threshold as registered.
    pub fn start(&self) -> Threshold {
        self.start
    }

    /// End threshold, if any.
    pub fn end(&self) -> Option<Threshold> {
        self.end
    }

    /// Trigger mode.
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Bound action.
    pub fn action(&self) -> &TriggerAction {
        &self.action
    }

    /// Scroll offset that opens the window.
    pub fn start_scroll(&self) -> f64 {
        self.start_scroll
    }

    /// Scroll offset that closes the window, if bounded.
    pub fn end_scroll(&self) -> Option<f64> {
        self.end_scroll
    }

    /// Last scrub progress written (scrub triggers only).
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// How many times a one-shot trigger fired (0 or 1).
    pub fn fire_count(&self) -> u32 {
        self.fire_count
    }

    fn resolve(&mut self, axis: ScrollAxis, viewport_extent: f64) {
        let span = axis.span(self.target_bounds);
        self.start_scroll = self.start.scroll_offset(span, viewport_extent);
        self.end_scroll = self
            .end
            .map(|end| end.scroll_offset(span, viewport_extent));
    }
}

fn default_scrub_end() -> Threshold {
    Threshold::new(Anchor::Fraction(1.0), Anchor::Fraction(0.0))
}

/// Owns every trigger, keyed by id so evaluation always runs in registration order.
#[derive(Clone, Debug)]
pub struct TriggerRegistry {
    triggers: BTreeMap<TriggerId, Trigger>,
    next_id: u32,
    axis: ScrollAxis,
    viewport_extent: f64,
}

impl TriggerRegistry {
    /// Empty registry for a viewport `viewport_extent` long along `axis`.
    pub fn new(axis: ScrollAxis, viewport_extent: f64) -> Self {
        Self {
            triggers: BTreeMap::new(),
            next_id: 0,
            axis,
            viewport_extent,
        }
    }

    /// Register a trigger on behalf of `owner`.
    ///
    /// The target must be present in `layout`; its bounds are captured now and updated by
    /// [`TriggerRegistry::refresh`] or [`TriggerRegistry::update_bounds`].
    pub fn register(
        &mut self,
        owner: SectionId,
        spec: TriggerSpec,
        layout: &PageLayout,
    ) -> MotionResult<TriggerId> {
        let bounds = layout
            .bounds(spec.target)
            .ok_or_else(|| MotionError::missing_target(spec.target, "trigger registration"))?;

        match (spec.mode, &spec.action) {
            (TriggerMode::Once | TriggerMode::Scrub, TriggerAction::Timeline(_))
            | (TriggerMode::Toggle, TriggerAction::Toggle(_))
            | (_, TriggerAction::Observe) => {}
            (mode, _) => {
                return Err(MotionError::validation(format!(
                    "{mode:?} trigger cannot drive this action"
                )));
            }
        }

        let end = match spec.mode {
            TriggerMode::Scrub => Some(spec.end.unwrap_or_else(default_scrub_end)),
            _ => spec.end,
        };

        let id = TriggerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let mut trigger = Trigger {
            id,
            owner,
            target: spec.target,
            target_bounds: bounds,
            start: spec.start,
            end,
            mode: spec.mode,
            state: TriggerState::Pending,
            action: spec.action,
            start_scroll: 0.0,
            end_scroll: None,
            progress: 0.0,
            fire_count: 0,
            primed: false,
        };
        trigger.resolve(self.axis, self.viewport_extent);
        tracing::debug!(
            trigger = id.0,
            section = owner.0,
            element = %spec.target,
            mode = ?trigger.mode,
            start = %trigger.start,
            start_scroll = trigger.start_scroll,
            "trigger registered"
        );
        self.triggers.insert(id, trigger);
        Ok(id)
    }

    /// Remove one trigger. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: TriggerId) -> bool {
        self.triggers.remove(&id).is_some()
    }

    /// Remove every trigger registered by `owner`. Returns how many were removed.
    pub fn unregister_owner(&mut self, owner: SectionId) -> usize {
        let before = self.triggers.len();
        self.triggers.retain(|_, t| t.owner != owner);
        before - self.triggers.len()
    }

    /// Look up a trigger.
    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    /// Registered ids in evaluation order.
    pub fn ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.triggers.keys().copied()
    }

    /// Number of registered triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Viewport length used to resolve thresholds.
    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    /// Recompute every trigger's scroll window for a new viewport length and fresh bounds.
    ///
    /// Triggers whose target left the layout keep their last bounds. State is untouched, so
    /// fired one-shot triggers stay done.
    pub fn refresh(&mut self, viewport_extent: f64, layout: &PageLayout) {
        self.viewport_extent = viewport_extent;
        for trigger in self.triggers.values_mut() {
            if let Some(bounds) = layout.bounds(trigger.target) {
                trigger.target_bounds = bounds;
            }
            trigger.resolve(self.axis, viewport_extent);
        }
        tracing::debug!(
            triggers = self.triggers.len(),
            viewport_extent,
            "trigger positions refreshed"
        );
    }

    /// Move `element` and recompute the triggers it positions. Returns how many were updated.
    pub fn update_bounds(&mut self, element: ElementId, bounds: Rect) -> usize {
        let mut updated = 0;
        for trigger in self.triggers.values_mut().filter(|t| t.target == element) {
            trigger.target_bounds = bounds;
            trigger.resolve(self.axis, self.viewport_extent);
            updated += 1;
        }
        updated
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Trigger> {
        self.triggers.values_mut()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/registry.rs"]
mod tests;

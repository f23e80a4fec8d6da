//! Pointer hover bindings.
//!
//! A binding pairs a trigger element with a set of property tweens. Entering the element
//! tweens each property to its hover value; leaving tweens it back to the resting value that
//! was captured at bind time. Every tween starts from the value currently on screen, so a
//! pointer that leaves mid-animation reverses smoothly instead of snapping.

use std::cell::Cell;
use std::rc::Rc;

use crate::animation::property::{Property, PropertySink};
use crate::animation::runtime::TimelineRuntime;
use crate::animation::tween::Motion;
use crate::foundation::core::{ElementId, PageLayout, SectionId};
use crate::foundation::error::{MotionError, MotionResult};

/// One property animated while the pointer is over the trigger element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverTween {
    /// Animated element (the trigger element itself or one of its children).
    pub element: ElementId,
    /// Animated property.
    pub property: Property,
    /// Value while hovered.
    pub to: f64,
    /// Value returned to on leave; read from the sink at bind time when unset.
    pub rest: Option<f64>,
    /// Value written at bind time, before any hover.
    pub initial: Option<f64>,
    /// Motion toward `to`.
    pub enter: Motion,
    /// Motion back to rest.
    pub leave: Motion,
}

impl HoverTween {
    /// Tween `property` on `element` to `to`, using `motion` both ways.
    pub fn new(element: ElementId, property: Property, to: f64, motion: Motion) -> Self {
        Self {
            element,
            property,
            to,
            rest: None,
            initial: None,
            enter: motion,
            leave: motion,
        }
    }

    /// Use a different motion when the pointer leaves.
    pub fn leave(mut self, motion: Motion) -> Self {
        self.leave = motion;
        self
    }

    /// Return to `value` on leave instead of the value captured at bind time.
    pub fn rest(mut self, value: f64) -> Self {
        self.rest = Some(value);
        self
    }

    /// Write `value` at bind time; it also becomes the resting value unless one is set.
    pub fn initial(mut self, value: f64) -> Self {
        self.initial = Some(value);
        self
    }
}

/// Tweens a hover binding drives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverSpec {
    /// Tweens, applied in order on enter and leave.
    pub tweens: Vec<HoverTween>,
}

impl HoverSpec {
    /// Empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween.
    pub fn tween(mut self, tween: HoverTween) -> Self {
        self.tweens.push(tween);
        self
    }
}

/// Handle returned by [`InteractionLayer::bind`].
///
/// Disposing is idempotent. Dropping the handle does not unbind; section teardown does.
#[derive(Clone, Debug)]
pub struct HoverBinding {
    trigger: ElementId,
    alive: Rc<Cell<bool>>,
}

impl HoverBinding {
    /// Element whose enter/leave events drive the binding.
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// `true` until disposed or torn down with its section.
    pub fn is_active(&self) -> bool {
        self.alive.get()
    }

    /// Stop reacting to pointer events.
    pub fn dispose(&self) {
        if self.alive.replace(false) {
            tracing::debug!(element = %self.trigger, "hover binding disposed");
        }
    }
}

#[derive(Debug)]
struct Bound {
    owner: SectionId,
    trigger: ElementId,
    tweens: Vec<(HoverTween, f64)>,
    alive: Rc<Cell<bool>>,
    hovered: bool,
}

/// Every live hover binding, in bind order.
#[derive(Debug, Default)]
pub struct InteractionLayer {
    bound: Vec<Bound>,
}

impl InteractionLayer {
    /// Empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `spec` to pointer events on `trigger`.
    ///
    /// The trigger and every tweened element must be mounted. Initial values are written and
    /// resting values captured immediately.
    pub fn bind(
        &mut self,
        owner: SectionId,
        trigger: ElementId,
        spec: HoverSpec,
        layout: &PageLayout,
        sink: &mut dyn PropertySink,
    ) -> MotionResult<HoverBinding> {
        if !layout.contains(trigger) {
            return Err(MotionError::missing_target(trigger, "hover trigger"));
        }
        if let Some(missing) = spec.tweens.iter().find(|t| !layout.contains(t.element)) {
            return Err(MotionError::missing_target(missing.element, "hover tween"));
        }

        let tweens = spec
            .tweens
            .into_iter()
            .map(|t| {
                if let Some(v) = t.initial {
                    sink.set(t.element, t.property, v);
                }
                let rest = t
                    .rest
                    .unwrap_or_else(|| sink.current(t.element, t.property));
                (t, rest)
            })
            .collect::<Vec<_>>();

        let alive = Rc::new(Cell::new(true));
        tracing::debug!(
            section = owner.0,
            element = %trigger,
            tweens = tweens.len(),
            "hover bound"
        );
        self.bound.push(Bound {
            owner,
            trigger,
            tweens,
            alive: alive.clone(),
            hovered: false,
        });
        Ok(HoverBinding { trigger, alive })
    }

    /// Pointer entered `element`. Returns how many tweens were retargeted.
    pub fn pointer_enter(
        &mut self,
        element: ElementId,
        runtime: &mut TimelineRuntime,
        sink: &mut dyn PropertySink,
    ) -> usize {
        self.pointer(element, true, runtime, sink)
    }

    /// Pointer left `element`. Returns how many tweens were retargeted.
    pub fn pointer_leave(
        &mut self,
        element: ElementId,
        runtime: &mut TimelineRuntime,
        sink: &mut dyn PropertySink,
    ) -> usize {
        self.pointer(element, false, runtime, sink)
    }

    fn pointer(
        &mut self,
        element: ElementId,
        enter: bool,
        runtime: &mut TimelineRuntime,
        sink: &mut dyn PropertySink,
    ) -> usize {
        self.bound.retain(|b| b.alive.get());
        let mut retargeted = 0;
        for b in self.bound.iter_mut().filter(|b| b.trigger == element) {
            if b.hovered == enter {
                continue;
            }
            b.hovered = enter;
            for (tween, rest) in &b.tweens {
                let (to, motion) = if enter {
                    (tween.to, tween.enter)
                } else {
                    (*rest, tween.leave)
                };
                runtime.retarget(b.owner, tween.element, tween.property, to, motion, sink);
                retargeted += 1;
            }
        }
        retargeted
    }

    /// Drop every binding of `owner`, marking their handles inactive. Returns how many.
    pub fn remove_owner(&mut self, owner: SectionId) -> usize {
        let before = self.bound.len();
        self.bound.retain(|b| {
            if b.owner == owner {
                b.alive.set(false);
                false
            } else {
                true
            }
        });
        before - self.bound.len()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bound.iter().filter(|b| b.alive.get()).count()
    }

    /// `true` when no binding is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/unit/interaction/interaction.rs"]
mod tests;

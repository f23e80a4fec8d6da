//! Process-wide motion context and per-section scopes.
//!
//! [`MotionContext`] owns the frame clock, the smooth-scroll surface, the trigger registry, the
//! timeline runtime, the hover layer and the property store. Sections never touch those
//! directly: they get a [`SectionScope`] that tags everything they register with the section's
//! id, so that [`SectionScope::teardown`] can remove exactly what the section added.
//!
//! Per frame, in this order: the surface advances, triggers are evaluated, timelines and tweens
//! advance, then section tick callbacks run.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::animation::property::{Property, PropertyStore};
use crate::animation::runtime::{TimelineId, TimelineRuntime};
use crate::animation::timeline::{Timeline, TimelineState};
use crate::clock::source::TickSource;
use crate::clock::{ClockSubscription, FrameClock, Tick};
use crate::config::MotionConfig;
use crate::foundation::core::{ElementId, PageLayout, Rect, SectionId};
use crate::foundation::error::{MotionError, MotionResult};
use crate::interaction::{HoverBinding, HoverSpec, InteractionLayer};
use crate::scroll::surface::{ScrollInput, ScrollState, SmoothScroll, Viewport};
use crate::trigger::registry::{Trigger, TriggerId, TriggerRegistry, TriggerSpec, TriggerState};
use crate::trigger::scheduler::{Evaluation, evaluate, settle};
use crate::trigger::threshold::Threshold;

#[derive(Debug)]
struct SectionRecord {
    name: String,
    torn_down: bool,
    subscriptions: Vec<ClockSubscription>,
}

#[derive(Debug)]
struct MotionState {
    surface: SmoothScroll,
    registry: TriggerRegistry,
    runtime: TimelineRuntime,
    interaction: InteractionLayer,
    store: PropertyStore,
    layout: PageLayout,
    sections: BTreeMap<SectionId, SectionRecord>,
    next_section: u32,
    last_evaluation: Evaluation,
    destroyed: bool,
}

impl MotionState {
    fn step(&mut self, elapsed_ms: f64) {
        if self.destroyed {
            return;
        }
        let scroll = self.surface.advance(elapsed_ms);
        self.last_evaluation = evaluate(
            &scroll,
            &mut self.registry,
            &mut self.runtime,
            &mut self.store,
        );
        self.runtime.advance(elapsed_ms / 1000.0, &mut self.store);
        self.last_evaluation.completed = settle(&mut self.registry, &self.runtime);
    }

    fn insert_timeline(
        &mut self,
        owner: SectionId,
        section: &str,
        mut timeline: Timeline,
    ) -> TimelineId {
        let layout = &self.layout;
        for element in timeline.retain_targets(|el| layout.contains(el)) {
            tracing::warn!(
                section,
                timeline = timeline.label(),
                %element,
                "timeline target is not mounted; its steps are skipped"
            );
        }
        self.runtime.insert(owner, timeline, &mut self.store)
    }

    fn teardown_section(&mut self, id: SectionId) -> Option<Vec<ClockSubscription>> {
        let record = self.sections.get_mut(&id)?;
        if record.torn_down {
            return None;
        }
        record.torn_down = true;
        let subscriptions = std::mem::take(&mut record.subscriptions);
        let name = record.name.clone();

        let triggers = self.registry.unregister_owner(id);
        let (timelines, tweens) = self.runtime.remove_owner(id);
        let hovers = self.interaction.remove_owner(id);
        for element in self.layout.elements_of(id) {
            self.store.clear_element(element);
        }
        let elements = self.layout.remove_owner(id);
        tracing::debug!(
            section = %name,
            triggers,
            timelines,
            tweens,
            hovers,
            elements,
            callbacks = subscriptions.len(),
            "section torn down"
        );
        Some(subscriptions)
    }
}

/// The explicit motion context of one page session.
///
/// Dropping the context destroys it.
#[derive(Debug)]
pub struct MotionContext {
    state: Rc<RefCell<MotionState>>,
    clock: FrameClock,
    core: ClockSubscription,
}

impl MotionContext {
    /// Validate `config` and build a context scrolled to the top of `viewport`.
    ///
    /// The frame clock is created without lag smoothing: long frames are clamped once, by the
    /// surface.
    pub fn new(config: MotionConfig, viewport: Viewport) -> MotionResult<Self> {
        config.validate()?;
        let axis = config.direction;
        let state = Rc::new(RefCell::new(MotionState {
            surface: SmoothScroll::new(&config, viewport),
            registry: TriggerRegistry::new(axis, axis.extent(viewport.size)),
            runtime: TimelineRuntime::new(),
            interaction: InteractionLayer::new(),
            store: PropertyStore::new(),
            layout: PageLayout::new(),
            sections: BTreeMap::new(),
            next_section: 0,
            last_evaluation: Evaluation::default(),
            destroyed: false,
        }));

        let clock = FrameClock::new(None);
        let weak = Rc::downgrade(&state);
        let core = clock.subscribe(move |tick| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            match state.try_borrow_mut() {
                Ok(mut state) => state.step(tick.elapsed_ms),
                Err(_) => tracing::warn!(frame = tick.frame, "motion state busy; frame skipped"),
            };
        });
        tracing::debug!(?config, ?viewport, "motion context created");
        Ok(Self { state, clock, core })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MotionState) -> R) -> Option<R> {
        match self.state.try_borrow_mut() {
            Ok(mut state) => Some(f(&mut state)),
            Err(_) => {
                tracing::warn!("motion state busy; call ignored");
                None
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&MotionState) -> R) -> Option<R> {
        self.state.try_borrow().ok().map(|state| f(&state))
    }

    /// Shared frame clock. Extra subscribers run after the core frame callback.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Open a scope for a mounting section.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn section(&self, name: &str) -> SectionScope {
        let id = self
            .with_state(|state| {
                let id = SectionId(state.next_section);
                state.next_section = state.next_section.wrapping_add(1);
                state.sections.insert(
                    id,
                    SectionRecord {
                        name: name.to_owned(),
                        torn_down: state.destroyed,
                        subscriptions: Vec::new(),
                    },
                );
                id
            })
            .unwrap_or(SectionId(u32::MAX));
        SectionScope {
            id,
            name: name.to_owned(),
            state: Rc::downgrade(&self.state),
            clock: self.clock.clone(),
        }
    }

    /// Feed one input event to the surface. A resize also recomputes trigger positions.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn input(&self, input: ScrollInput) {
        self.with_state(|state| {
            if state.destroyed {
                return;
            }
            state.surface.input(input);
            if let ScrollInput::Resize { viewport } = input {
                let extent = state.surface.axis().extent(viewport.size);
                state.registry.refresh(extent, &state.layout);
            }
        });
    }

    /// Programmatic scroll.
    pub fn scroll_to(&self, offset: f64, immediate: bool) {
        self.input(ScrollInput::ScrollTo { offset, immediate });
    }

    /// Window or document size change.
    pub fn resize(&self, viewport: Viewport) {
        self.input(ScrollInput::Resize { viewport });
    }

    /// Move a mounted element (e.g. after late image layout) and recompute its triggers.
    /// Returns `false` if the element is not mounted.
    pub fn update_bounds(&self, element: ElementId, bounds: Rect) -> bool {
        self.with_state(|state| {
            if !state.layout.update(element, bounds) {
                return false;
            }
            state.registry.update_bounds(element, bounds);
            true
        })
        .unwrap_or(false)
    }

    /// Pause input consumption (e.g. while a modal menu is open).
    pub fn stop_scroll(&self) {
        self.with_state(|state| state.surface.stop());
    }

    /// Resume input consumption.
    pub fn start_scroll(&self) {
        self.with_state(|state| state.surface.start());
    }

    /// Pointer entered `element`. Returns how many hover tweens were retargeted.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn pointer_enter(&self, element: ElementId) -> usize {
        self.with_state(|state| {
            state
                .interaction
                .pointer_enter(element, &mut state.runtime, &mut state.store)
        })
        .unwrap_or(0)
    }

    /// Pointer left `element`. Returns how many hover tweens were retargeted.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn pointer_leave(&self, element: ElementId) -> usize {
        self.with_state(|state| {
            state
                .interaction
                .pointer_leave(element, &mut state.runtime, &mut state.store)
        })
        .unwrap_or(0)
    }

    /// Run one frame of `elapsed_ms`.
    pub fn frame(&self, elapsed_ms: f64) -> Tick {
        self.clock.tick(elapsed_ms)
    }

    /// Run one frame timed by `source`; `None` once the source is exhausted.
    pub fn pump(&self, source: &mut dyn TickSource) -> Option<Tick> {
        self.clock.pump(source)
    }

    /// Scroll state after the last frame.
    pub fn scroll_state(&self) -> ScrollState {
        self.read(|state| state.surface.state()).unwrap_or_default()
    }

    /// Current value of `property` on `element`, if anything wrote it.
    pub fn property(&self, element: ElementId, property: Property) -> Option<f64> {
        use crate::animation::property::PropertySink as _;
        self.read(|state| state.store.get(element, property))
            .flatten()
    }

    /// Snapshot of every written property value.
    pub fn properties(&self) -> PropertyStore {
        self.read(|state| state.store.clone()).unwrap_or_default()
    }

    /// Trigger state changes of the last frame.
    pub fn last_evaluation(&self) -> Evaluation {
        self.read(|state| state.last_evaluation.clone())
            .unwrap_or_default()
    }

    /// Snapshot of a registered trigger.
    pub fn trigger(&self, id: TriggerId) -> Option<Trigger> {
        self.read(|state| state.registry.get(id).cloned()).flatten()
    }

    /// State of a registered trigger.
    pub fn trigger_state(&self, id: TriggerId) -> Option<TriggerState> {
        self.read(|state| state.registry.get(id).map(Trigger::state))
            .flatten()
    }

    /// State of an owned timeline.
    pub fn timeline_state(&self, id: TimelineId) -> Option<TimelineState> {
        self.read(|state| state.runtime.timeline(id).map(Timeline::state))
            .flatten()
    }

    /// Progress of an owned timeline's current iteration.
    pub fn timeline_progress(&self, id: TimelineId) -> Option<f64> {
        self.read(|state| state.runtime.timeline(id).map(Timeline::progress))
            .flatten()
    }

    /// Registered triggers.
    pub fn trigger_count(&self) -> usize {
        self.read(|state| state.registry.len()).unwrap_or(0)
    }

    /// Owned timelines.
    pub fn timeline_count(&self) -> usize {
        self.read(|state| state.runtime.timeline_count())
            .unwrap_or(0)
    }

    /// In-flight hover and toggle tweens.
    pub fn tween_count(&self) -> usize {
        self.read(|state| state.runtime.tween_count()).unwrap_or(0)
    }

    /// Live hover bindings.
    pub fn hover_count(&self) -> usize {
        self.read(|state| state.interaction.len()).unwrap_or(0)
    }

    /// Sections that are mounted and not torn down.
    pub fn live_sections(&self) -> usize {
        self.read(|state| state.sections.values().filter(|r| !r.torn_down).count())
            .unwrap_or(0)
    }

    /// `true` once [`MotionContext::destroy`] ran.
    pub fn is_destroyed(&self) -> bool {
        self.read(|state| state.destroyed).unwrap_or(false)
    }

    /// Tear down every section, stop the surface and detach from the clock. Idempotent.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn destroy(&self) {
        let subscriptions = self
            .with_state(|state| {
                if state.destroyed {
                    return Vec::new();
                }
                state.destroyed = true;
                state.surface.destroy();
                let ids: Vec<SectionId> = state.sections.keys().copied().collect();
                ids.into_iter()
                    .filter_map(|id| state.teardown_section(id))
                    .flatten()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        self.core.dispose();
        drop(subscriptions);
    }
}

impl Drop for MotionContext {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Everything one section registered, torn down together.
///
/// Every registration fails with [`MotionError::Validation`] once the section is torn down or
/// the context is gone.
#[derive(Debug)]
pub struct SectionScope {
    id: SectionId,
    name: String,
    state: Weak<RefCell<MotionState>>,
    clock: FrameClock,
}

impl SectionScope {
    fn with_live<R>(
        &self,
        f: impl FnOnce(&mut MotionState) -> MotionResult<R>,
    ) -> MotionResult<R> {
        let state = self.state.upgrade().ok_or_else(|| {
            MotionError::validation(format!("section '{}': motion context is gone", self.name))
        })?;
        let mut state = state.try_borrow_mut().map_err(|_| {
            MotionError::validation(format!("section '{}': motion state is busy", self.name))
        })?;
        let live = !state.destroyed
            && state
                .sections
                .get(&self.id)
                .is_some_and(|r| !r.torn_down);
        if !live {
            return Err(MotionError::validation(format!(
                "section '{}' is torn down",
                self.name
            )));
        }
        f(&mut state)
    }

    /// Section id tagging this scope's registrations.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mount `element` at `bounds` (document coordinates). Re-mounting moves it and updates
    /// the triggers it positions.
    pub fn element(&self, element: ElementId, bounds: Rect) -> MotionResult<()> {
        self.with_live(|state| {
            if state.layout.insert(self.id, element, bounds).is_some() {
                state.registry.update_bounds(element, bounds);
            }
            Ok(())
        })
    }

    /// Hand a timeline to the runtime; its start state is rendered immediately.
    ///
    /// Steps whose target is not mounted are dropped with a warning.
    pub fn timeline(&self, timeline: Timeline) -> MotionResult<TimelineId> {
        self.with_live(|state| Ok(state.insert_timeline(self.id, &self.name, timeline)))
    }

    /// Start time-driven playback of a timeline now, without waiting for a trigger.
    /// Returns `false` if it is already running, completed, or not owned by this section.
    pub fn play(&self, id: TimelineId) -> MotionResult<bool> {
        self.with_live(|state| {
            Ok(state.runtime.owner(id) == Some(self.id) && state.runtime.play(id))
        })
    }

    /// Register a trigger.
    pub fn trigger(&self, spec: TriggerSpec) -> MotionResult<TriggerId> {
        self.with_live(|state| state.registry.register(self.id, spec, &state.layout))
    }

    /// One-shot reveal: `timeline` plays once `target` reaches `start`.
    pub fn reveal(
        &self,
        target: ElementId,
        start: Threshold,
        timeline: Timeline,
    ) -> MotionResult<(TimelineId, TriggerId)> {
        self.with_live(|state| {
            if !state.layout.contains(target) {
                return Err(MotionError::missing_target(target, "reveal trigger"));
            }
            let tl = state.insert_timeline(self.id, &self.name, timeline);
            let spec = TriggerSpec::once(target, start, tl);
            let tr = state.registry.register(self.id, spec, &state.layout)?;
            Ok((tl, tr))
        })
    }

    /// Scroll-linked effect: `timeline` progress follows the offset between `start` and `end`
    /// (`"bottom top"` when `None`).
    pub fn scrub(
        &self,
        target: ElementId,
        start: Threshold,
        end: Option<Threshold>,
        timeline: Timeline,
    ) -> MotionResult<(TimelineId, TriggerId)> {
        self.with_live(|state| {
            if !state.layout.contains(target) {
                return Err(MotionError::missing_target(target, "scrub trigger"));
            }
            let tl = state.insert_timeline(self.id, &self.name, timeline);
            let spec = TriggerSpec::scrub(target, start, end, tl);
            let tr = state.registry.register(self.id, spec, &state.layout)?;
            Ok((tl, tr))
        })
    }

    /// Bind hover tweens to pointer events on `trigger`.
    pub fn hover(&self, trigger: ElementId, spec: HoverSpec) -> MotionResult<HoverBinding> {
        self.with_live(|state| {
            state
                .interaction
                .bind(self.id, trigger, spec, &state.layout, &mut state.store)
        })
    }

    /// Run `callback` every frame after the core update, with the frame's scroll state.
    pub fn on_tick(
        &self,
        mut callback: impl FnMut(&Tick, &ScrollState) + 'static,
    ) -> MotionResult<()> {
        let weak = self.state.clone();
        let subscription = self.clock.subscribe(move |tick| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let scroll = match state.try_borrow() {
                Ok(state) => state.surface.state(),
                Err(_) => return,
            };
            callback(tick, &scroll);
        });
        self.with_live(|state| {
            if let Some(record) = state.sections.get_mut(&self.id) {
                record.subscriptions.push(subscription);
            }
            Ok(())
        })
    }

    /// Remove everything this section registered. Returns `false` when already torn down.
    pub fn teardown(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let subscriptions = match state.try_borrow_mut() {
            Ok(mut state) => state.teardown_section(self.id),
            Err(_) => {
                tracing::warn!(section = %self.name, "motion state busy; teardown skipped");
                return false;
            }
        };
        match subscriptions {
            Some(subscriptions) => {
                drop(subscriptions);
                true
            }
            None => false,
        }
    }

    /// Like [`SectionScope::teardown`], but a second call is an error.
    pub fn try_teardown(&self) -> MotionResult<()> {
        if self.teardown() {
            Ok(())
        } else {
            Err(MotionError::double_teardown(self.name.clone()))
        }
    }

    /// `true` once torn down, directly or by destroying the context.
    pub fn is_torn_down(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return true;
        };
        let Ok(state) = state.try_borrow() else {
            return false;
        };
        state.destroyed
            || state
                .sections
                .get(&self.id)
                .is_none_or(|r| r.torn_down)
    }
}

#[cfg(test)]
#[path = "../tests/unit/context/context.rs"]
mod tests;

use std::str::FromStr;

use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::animation::property::{Property, PropertySink, lerp};
use crate::foundation::core::ElementId;
use crate::foundation::error::{MotionError, MotionResult};

/// Placement of a tween group inside a timeline.
///
/// Offsets are in seconds. A negative [`Position::Relative`] overlaps the group with what is
/// already in the timeline; resolved start times never go below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Position {
    /// Start when everything added so far has ended.
    #[default]
    Sequential,
    /// Start `offset` seconds after the current end (`"-=0.8"` is `Relative(-0.8)`).
    Relative(f64),
    /// Start at an absolute time from the timeline base.
    At(f64),
    /// Start together with the previously added group (`"<"`).
    WithPrevious,
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        let s = s.trim();
        let num = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| MotionError::parse(format!("bad position '{s}'")))
        };
        match s {
            "" | ">" => Ok(Self::Sequential),
            "<" => Ok(Self::WithPrevious),
            _ => {
                if let Some(rest) = s.strip_prefix("-=") {
                    Ok(Self::Relative(-num(rest)?))
                } else if let Some(rest) = s.strip_prefix("+=") {
                    Ok(Self::Relative(num(rest)?))
                } else {
                    Ok(Self::At(num(s)?.max(0.0)))
                }
            }
        }
    }
}

/// One property interpolation on one element, positioned on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Element written by this step.
    pub target: ElementId,
    /// Property written by this step.
    pub property: Property,
    /// Value before the step starts.
    pub from: f64,
    /// Value once the step ends.
    pub to: f64,
    /// Start time in seconds from the timeline base.
    pub start: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Easing applied across the step.
    pub ease: Ease,
}

impl Step {
    /// Time in seconds at which the step reaches `to`.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Interpolated value at timeline-local time `local`.
    pub fn value_at(&self, local: f64) -> f64 {
        if local < self.start {
            return self.from;
        }
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((local - self.start) / self.duration).clamp(0.0, 1.0);
        lerp(self.from, self.to, self.ease.apply(t))
    }
}

/// A from/to tween group: the same property changes applied to one or more targets,
/// optionally staggered.
#[derive(Clone, Debug)]
pub struct FromTo {
    targets: SmallVec<[ElementId; 4]>,
    props: SmallVec<[(Property, f64, f64); 4]>,
    duration: f64,
    ease: Option<Ease>,
    stagger: f64,
}

impl FromTo {
    /// Tween group for a single target.
    pub fn new(target: ElementId) -> Self {
        Self::targets([target])
    }

    /// Tween group for several targets, in document order.
    pub fn targets(targets: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            props: SmallVec::new(),
            duration: 0.5,
            ease: None,
            stagger: 0.0,
        }
    }

    /// Animate `property` from `from` to `to`.
    pub fn prop(mut self, property: Property, from: f64, to: f64) -> Self {
        self.props.push((property, from, to));
        self
    }

    /// Duration in seconds (negative or NaN clamps to zero).
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs.max(0.0);
        self
    }

    /// Easing; the timeline default is used otherwise.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Delay between consecutive targets, in seconds.
    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs.max(0.0);
        self
    }
}

/// Repeat behaviour of a time-driven timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repeat {
    /// Extra iterations after the first; `None` repeats forever.
    pub count: Option<u32>,
    /// Alternate direction on every other iteration.
    pub yoyo: bool,
}

impl Default for Repeat {
    fn default() -> Self {
        Self {
            count: Some(0),
            yoyo: false,
        }
    }
}

impl Repeat {
    /// Repeat forever.
    pub fn forever(yoyo: bool) -> Self {
        Self { count: None, yoyo }
    }

    /// Repeat `count` extra times.
    pub fn times(count: u32, yoyo: bool) -> Self {
        Self {
            count: Some(count),
            yoyo,
        }
    }
}

/// Builder that resolves [`Position`]s into absolute step start times.
#[derive(Clone, Debug)]
pub struct TimelineBuilder {
    label: String,
    steps: Vec<Step>,
    end: f64,
    last_start: f64,
    default_ease: Ease,
    delay: f64,
    repeat: Repeat,
}

impl TimelineBuilder {
    /// Ease used by groups that do not set their own (`power1.out` unless overridden).
    pub fn default_ease(mut self, ease: Ease) -> Self {
        self.default_ease = ease;
        self
    }

    /// Append a tween group at `position`.
    pub fn from_to(mut self, group: FromTo, position: Position) -> Self {
        let base = match position {
            Position::Sequential => self.end,
            Position::Relative(offset) => self.end + offset,
            Position::At(at) => at,
            Position::WithPrevious => self.last_start,
        }
        .max(0.0);
        let ease = group.ease.unwrap_or(self.default_ease);

        for (i, target) in group.targets.iter().enumerate() {
            let start = base + i as f64 * group.stagger;
            for &(property, from, to) in &group.props {
                self.steps.push(Step {
                    target: *target,
                    property,
                    from,
                    to,
                    start,
                    duration: group.duration,
                    ease,
                });
            }
        }

        if !group.targets.is_empty() {
            let last = (group.targets.len() - 1) as f64 * group.stagger;
            self.end = self.end.max(base + last + group.duration);
        }
        self.last_start = base;
        self
    }

    /// Delay before the first iteration starts, in seconds.
    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    /// Repeat behaviour.
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Finish the timeline.
    pub fn build(self) -> Timeline {
        let duration = self.steps.iter().map(Step::end).fold(0.0, f64::max);
        let mut repeat = self.repeat;
        if duration <= 0.0 {
            repeat.count = Some(0);
        }
        Timeline {
            label: self.label,
            steps: self.steps,
            delay: self.delay,
            duration,
            repeat,
            state: TimelineState::Idle,
            time: 0.0,
            fresh: false,
            progress: 0.0,
        }
    }
}

/// Lifecycle of a timeline.
///
/// One-shot reveals go `Idle -> Running -> Completed`; scroll-driven timelines move between
/// `Idle` and `Scrubbing` and never complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TimelineState {
    /// Not started.
    Idle,
    /// Advancing with elapsed time.
    Running,
    /// Reached its end; terminal for time-driven playback.
    Completed,
    /// Progress is set directly from scroll position.
    Scrubbing,
}

/// Ordered, offset-based composition of property interpolations.
#[derive(Clone, Debug)]
pub struct Timeline {
    label: String,
    steps: Vec<Step>,
    delay: f64,
    duration: f64,
    repeat: Repeat,
    state: TimelineState,
    time: f64,
    fresh: bool,
    progress: f64,
}

impl Timeline {
    /// Start building a timeline; `label` shows up in logs.
    pub fn builder(label: impl Into<String>) -> TimelineBuilder {
        TimelineBuilder {
            label: label.into(),
            steps: Vec::new(),
            end: 0.0,
            last_start: 0.0,
            default_ease: Ease::OutQuad,
            delay: 0.0,
            repeat: Repeat::default(),
        }
    }

    /// Label given at build time.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Steps with resolved start times.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Length of one iteration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Delay, iterations included; `None` for infinite repeat.
    pub fn total_duration(&self) -> Option<f64> {
        self.repeat
            .count
            .map(|n| self.delay + self.duration * f64::from(n + 1))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Progress of the current iteration in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Drop steps whose target fails `keep`. Returns the distinct removed targets.
    ///
    /// Remaining steps keep their resolved start times.
    pub fn retain_targets(&mut self, keep: impl Fn(ElementId) -> bool) -> Vec<ElementId> {
        let mut removed = Vec::new();
        self.steps.retain(|s| {
            let ok = keep(s.target);
            if !ok && !removed.contains(&s.target) {
                removed.push(s.target);
            }
            ok
        });
        if !removed.is_empty() {
            self.duration = self.steps.iter().map(Step::end).fold(0.0, f64::max);
        }
        removed
    }

    /// Write the start state of every step (elements sit at their `from` values until played).
    pub fn render_initial(&mut self, sink: &mut dyn PropertySink) {
        self.apply_at(0.0, sink);
    }

    /// Start time-driven playback. Returns `false` when already running or completed.
    pub fn play(&mut self) -> bool {
        match self.state {
            TimelineState::Running | TimelineState::Completed => false,
            TimelineState::Idle | TimelineState::Scrubbing => {
                self.state = TimelineState::Running;
                self.time = 0.0;
                self.fresh = true;
                true
            }
        }
    }

    /// Halt playback where it is; the timeline can be played again from the start.
    pub fn stop(&mut self) {
        if self.state == TimelineState::Running {
            self.state = TimelineState::Idle;
        }
    }

    /// Advance a running timeline by `dt_secs` and write the resulting values.
    ///
    /// The first advance after [`Timeline::play`] renders time zero without consuming `dt_secs`.
    pub fn advance(&mut self, dt_secs: f64, sink: &mut dyn PropertySink) -> TimelineState {
        if self.state != TimelineState::Running {
            return self.state;
        }
        if self.fresh {
            self.fresh = false;
        } else if dt_secs.is_finite() && dt_secs > 0.0 {
            self.time += dt_secs;
        }

        let (local, finished) = self.local_time();
        self.apply_at(local, sink);
        if finished {
            self.state = TimelineState::Completed;
        }
        self.state
    }

    /// Jump to `progress` of one iteration and write the values; enters `Scrubbing`.
    ///
    /// The written values depend only on `progress`.
    pub fn set_progress(&mut self, progress: f64, sink: &mut dyn PropertySink) {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.state = TimelineState::Scrubbing;
        self.fresh = false;
        self.time = self.delay + p * self.duration;
        self.apply_at(p * self.duration, sink);
        self.progress = p;
    }

    fn local_time(&self) -> (f64, bool) {
        if let Some(total) = self.total_duration() {
            if self.time >= total {
                let n = self.repeat.count.unwrap_or(0);
                let end = if self.repeat.yoyo && n % 2 == 1 {
                    0.0
                } else {
                    self.duration
                };
                return (end, true);
            }
        }
        let t = self.time - self.delay;
        if t <= 0.0 || self.duration <= 0.0 {
            return (0.0, false);
        }
        let iteration = (t / self.duration).floor();
        let within = t - iteration * self.duration;
        if self.repeat.yoyo && (iteration as u64) % 2 == 1 {
            (self.duration - within, false)
        } else {
            (within, false)
        }
    }

    fn apply_at(&mut self, local: f64, sink: &mut dyn PropertySink) {
        // An unstarted step must not clobber a value an earlier started step already owns.
        let mut claimed: SmallVec<[(ElementId, Property); 16]> = SmallVec::new();
        for step in &self.steps {
            let key = (step.target, step.property);
            let started = local >= step.start;
            if !started && claimed.contains(&key) {
                continue;
            }
            if started {
                claimed.push(key);
            }
            sink.set(step.target, step.property, step.value_at(local));
        }
        self.progress = if self.duration > 0.0 {
            (local / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;

use crate::animation::ease::Ease;
use crate::animation::property::lerp;
use crate::config::MotionConfig;
use crate::foundation::core::{ScrollAxis, Size};

/// Sign of the last non-zero scroll movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// Toward the start of the document.
    Up,
    /// Toward the end of the document.
    #[default]
    Down,
}

/// Scroll position produced once per frame by [`SmoothScroll::advance`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    /// Clamped target offset, in pixels.
    pub raw_offset: f64,
    /// Eased offset every trigger is evaluated against, in pixels.
    pub smoothed_offset: f64,
    /// Change of `smoothed_offset` during the last frame, in pixels per frame.
    pub velocity: f64,
    /// Direction of the last non-zero movement.
    pub direction: ScrollDirection,
}

/// Visible area and total document size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Size of the visible window.
    pub size: Size,
    /// Size of the scrollable document.
    pub content: Size,
}

impl Viewport {
    /// Viewport of `size` over a document of size `content`.
    pub fn new(size: Size, content: Size) -> Self {
        Self { size, content }
    }

    /// Largest reachable offset along `axis`.
    pub fn limit(&self, axis: ScrollAxis) -> f64 {
        (axis.extent(self.content) - axis.extent(self.size)).max(0.0)
    }
}

/// Raw input consumed by the surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScrollInput {
    /// Mouse wheel or trackpad delta, in pixels.
    Wheel {
        /// Horizontal delta.
        #[serde(default)]
        dx: f64,
        /// Vertical delta.
        #[serde(default)]
        dy: f64,
    },
    /// Touch drag delta, in pixels.
    Touch {
        /// Horizontal delta.
        #[serde(default)]
        dx: f64,
        /// Vertical delta.
        #[serde(default)]
        dy: f64,
    },
    /// Programmatic scroll (anchor links, "back to top").
    ScrollTo {
        /// Destination offset; clamped to the scrollable range.
        offset: f64,
        /// Jump without easing.
        #[serde(default)]
        immediate: bool,
    },
    /// Window or document size change.
    Resize {
        /// New viewport and document size.
        viewport: Viewport,
    },
}

#[derive(Clone, Copy, Debug)]
struct Glide {
    from: f64,
    to: f64,
    elapsed: f64,
}

/// Smooth-scroll surface: turns raw input into an eased scroll offset.
///
/// Every change of the target restarts the glide from wherever the smoothed offset currently
/// is, so rapid input never queues and never jumps.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    config: MotionConfig,
    viewport: Viewport,
    target: f64,
    smoothed: f64,
    last_smoothed: f64,
    velocity: f64,
    direction: ScrollDirection,
    glide: Option<Glide>,
    stopped: bool,
    destroyed: bool,
}

impl SmoothScroll {
    /// Surface at offset zero.
    pub fn new(config: &MotionConfig, viewport: Viewport) -> Self {
        Self {
            config: config.clone(),
            viewport,
            target: 0.0,
            smoothed: 0.0,
            last_smoothed: 0.0,
            velocity: 0.0,
            direction: ScrollDirection::Down,
            glide: None,
            stopped: false,
            destroyed: false,
        }
    }

    /// Current scroll state.
    pub fn state(&self) -> ScrollState {
        ScrollState {
            raw_offset: self.target,
            smoothed_offset: self.smoothed,
            velocity: self.velocity,
            direction: self.direction,
        }
    }

    /// Axis the surface is locked to.
    pub fn axis(&self) -> ScrollAxis {
        self.config.direction
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Largest reachable offset.
    pub fn limit(&self) -> f64 {
        self.viewport.limit(self.config.direction)
    }

    /// `true` while the smoothed offset is still gliding toward the target.
    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    /// `true` between [`SmoothScroll::stop`] and [`SmoothScroll::start`].
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// `true` once [`SmoothScroll::destroy`] was called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Consume one input event. Ignored while stopped (except resizes) and after destroy.
    pub fn input(&mut self, input: ScrollInput) {
        if self.destroyed {
            return;
        }
        let axis = self.config.direction;
        match input {
            ScrollInput::Resize { viewport } => self.resize(viewport),
            _ if self.stopped => {}
            ScrollInput::Wheel { dx, dy } => {
                let delta = axis.pick(dx, dy) * self.config.wheel_multiplier;
                if delta != 0.0 {
                    self.scroll_to(self.target + delta, false);
                }
            }
            ScrollInput::Touch { dx, dy } => {
                let delta = axis.pick(dx, dy) * self.config.touch_multiplier;
                if delta != 0.0 {
                    self.scroll_to(self.target + delta, !self.config.touch_smoothing);
                }
            }
            ScrollInput::ScrollTo { offset, immediate } => self.scroll_to(offset, immediate),
        }
    }

    fn scroll_to(&mut self, offset: f64, immediate: bool) {
        if !offset.is_finite() {
            tracing::warn!(offset, "non-finite scroll target ignored");
            return;
        }
        let target = offset.clamp(0.0, self.limit());
        if target != self.target {
            self.direction = if target < self.target {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            };
        }
        self.target = target;
        if immediate {
            self.smoothed = target;
            self.glide = None;
        } else if target != self.smoothed {
            self.glide = Some(Glide {
                from: self.smoothed,
                to: target,
                elapsed: 0.0,
            });
        } else {
            self.glide = None;
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let limit = self.limit();
        if self.smoothed > limit {
            self.smoothed = limit;
            self.last_smoothed = limit;
            // A glide that started past the new limit would pull the offset back out of range.
            if let Some(glide) = &mut self.glide {
                glide.from = limit;
                glide.elapsed = 0.0;
            }
        }
        if self.target > limit {
            tracing::debug!(scroll_target = self.target, limit, "scroll target clamped by resize");
            self.scroll_to(limit, false);
        }
    }

    /// Advance the glide by one frame of `elapsed_ms` and return the new state.
    ///
    /// Frames longer than the drift threshold are replaced by the configured maximum tick, so a
    /// backgrounded tab resumes where it left off instead of jumping.
    pub fn advance(&mut self, elapsed_ms: f64) -> ScrollState {
        if self.destroyed {
            return self.state();
        }
        let mut elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms
        } else {
            0.0
        };
        if elapsed_ms > self.config.drift_threshold_ms {
            tracing::warn!(
                elapsed_ms,
                clamped_ms = self.config.max_tick_ms,
                "clock drift: scroll tick clamped"
            );
            elapsed_ms = self.config.max_tick_ms;
        }

        if let Some(glide) = &mut self.glide {
            glide.elapsed += elapsed_ms / 1000.0;
            let t = (glide.elapsed / self.config.easing_duration).clamp(0.0, 1.0);
            if t >= 1.0 {
                self.smoothed = glide.to;
                self.glide = None;
            } else {
                self.smoothed = lerp(glide.from, glide.to, Ease::ScrollExpo.apply(t));
            }
        }

        self.velocity = self.smoothed - self.last_smoothed;
        self.last_smoothed = self.smoothed;
        self.state()
    }

    /// Stop consuming input and halt any glide where it is.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.glide = None;
        self.target = self.smoothed;
    }

    /// Resume consuming input.
    pub fn start(&mut self) {
        self.stopped = false;
    }

    /// Permanently stop consuming input and ticks.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            tracing::debug!(offset = self.smoothed, "smooth scroll destroyed");
        }
        self.destroyed = true;
        self.glide = None;
        self.velocity = 0.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/surface.rs"]
mod tests;

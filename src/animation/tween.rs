use crate::animation::ease::Ease;
use crate::animation::property::{Property, lerp};
use crate::foundation::core::ElementId;

/// Duration, easing and delay of a single retargetable tween.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Motion {
    /// Length in seconds.
    pub duration: f64,
    /// Easing across the tween.
    pub ease: Ease,
    /// Hold time before the value starts moving, in seconds.
    #[serde(default)]
    pub delay: f64,
}

impl Motion {
    /// Motion without delay.
    pub fn new(duration: f64, ease: Ease) -> Self {
        Self {
            duration: duration.max(0.0),
            ease,
            delay: 0.0,
        }
    }

    /// Same motion, held for `delay` seconds first.
    pub fn delayed(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }
}

/// Time-driven interpolation of one property toward a target value.
///
/// Tweens are never queued: starting a new one for the same element/property replaces the old
/// one, starting from wherever the old one had got to.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    target: ElementId,
    property: Property,
    from: f64,
    to: f64,
    motion: Motion,
    elapsed: f64,
}

impl Tween {
    /// Tween `property` on `target` from `from` to `to`.
    pub fn new(target: ElementId, property: Property, from: f64, to: f64, motion: Motion) -> Self {
        Self {
            target,
            property,
            from,
            to,
            motion,
            elapsed: 0.0,
        }
    }

    /// Animated element.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Animated property.
    pub fn property(&self) -> Property {
        self.property
    }

    /// Value the tween settles on.
    pub fn end_value(&self) -> f64 {
        self.to
    }

    /// Value at the current elapsed time.
    pub fn value(&self) -> f64 {
        let t = self.elapsed - self.motion.delay;
        if t <= 0.0 {
            return self.from;
        }
        if self.motion.duration <= 0.0 {
            return self.to;
        }
        let p = (t / self.motion.duration).clamp(0.0, 1.0);
        lerp(self.from, self.to, self.motion.ease.apply(p))
    }

    /// Advance by `dt_secs` and return the new value.
    pub fn advance(&mut self, dt_secs: f64) -> f64 {
        if dt_secs.is_finite() && dt_secs > 0.0 {
            self.elapsed += dt_secs;
        }
        self.value()
    }

    /// `true` once the tween has reached its end value.
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.motion.delay + self.motion.duration
    }
}

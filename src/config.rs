use crate::foundation::core::ScrollAxis;
use crate::foundation::error::{MotionError, MotionResult};

/// Initialization options of the motion core.
///
/// Deserializes from camelCase JSON; every field is optional.
///
/// ```json
/// { "easingDuration": 1.2, "direction": "vertical", "touchSmoothing": false, "touchMultiplier": 2 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Seconds the smooth-scroll surface takes to converge on a new target.
    pub easing_duration: f64,
    /// Axis the surface is locked to; input on the other axis is ignored.
    pub direction: ScrollAxis,
    /// Ease touch input like wheel input. When `false`, touch moves the page immediately.
    pub touch_smoothing: bool,
    /// Scale applied to raw touch deltas.
    pub touch_multiplier: f64,
    /// Scale applied to raw wheel deltas.
    pub wheel_multiplier: f64,
    /// Frames longer than this (e.g. after the tab was backgrounded) count as clock drift.
    pub drift_threshold_ms: f64,
    /// Elapsed time fed to the surface in place of a drifted frame.
    pub max_tick_ms: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            easing_duration: 1.2,
            direction: ScrollAxis::Vertical,
            touch_smoothing: false,
            touch_multiplier: 2.0,
            wheel_multiplier: 1.0,
            drift_threshold_ms: 250.0,
            max_tick_ms: 1000.0 / 60.0,
        }
    }
}

impl MotionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> MotionResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> MotionResult<()> {
        fn positive(name: &str, v: f64) -> MotionResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(MotionError::validation(format!(
                    "{name} must be finite and > 0 (got {v})"
                )))
            }
        }
        positive("easingDuration", self.easing_duration)?;
        positive("touchMultiplier", self.touch_multiplier)?;
        positive("wheelMultiplier", self.wheel_multiplier)?;
        positive("driftThresholdMs", self.drift_threshold_ms)?;
        positive("maxTickMs", self.max_tick_ms)?;
        if self.max_tick_ms > self.drift_threshold_ms {
            return Err(MotionError::validation(
                "maxTickMs must not exceed driftThresholdMs",
            ));
        }
        Ok(())
    }
}

use std::f64::consts::PI;
use std::str::FromStr;

use crate::foundation::error::{MotionError, MotionResult};

const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;
const DEFAULT_ELASTIC_AMPLITUDE: f64 = 1.0;
const DEFAULT_ELASTIC_PERIOD: f64 = 0.3;

/// Easing functions used to map normalized animation progress.
///
/// `Quad`/`Cubic`/`Quart`/`Quint` correspond to the authoring names `power1`..`power4`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation (`"none"`).
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in/out.
    InOutQuart,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
    /// Quintic ease-in/out.
    InOutQuint,
    /// Sine ease-in.
    InSine,
    /// Sine ease-out.
    OutSine,
    /// Sine ease-in/out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// Exponential ease-in/out.
    InOutExpo,
    /// Ease-out that overshoots the target before settling.
    OutBack {
        /// Overshoot strength.
        overshoot: f64,
    },
    /// Ease-out that oscillates around the target before settling.
    OutElastic {
        /// Oscillation amplitude (clamped to `>= 1`).
        amplitude: f64,
        /// Oscillation period in normalized time.
        period: f64,
    },
    /// Smooth-scroll curve `min(1, 1.001 - 2^(-10 t))`.
    ScrollExpo,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(5) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::OutBack { overshoot } => {
                let c3 = overshoot + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + overshoot * u.powi(2)
            }
            Self::OutElastic { amplitude, period } => {
                if t <= 0.0 || t >= 1.0 || period <= 0.0 {
                    return t;
                }
                let a = amplitude.max(1.0);
                let s = period / (2.0 * PI) * (1.0 / a).asin();
                a * 2f64.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / period).sin() + 1.0
            }
            Self::ScrollExpo => (1.001 - 2f64.powf(-10.0 * t)).min(1.0),
        }
    }
}

impl FromStr for Ease {
    type Err = MotionError;

    /// Parse authoring names such as `"power3.out"`, `"sine.inOut"`, `"back.out(1.7)"`,
    /// `"elastic.out(1, 0.5)"` or `"none"`. A bare family (`"power2"`) means its `out` variant.
    fn from_str(s: &str) -> MotionResult<Self> {
        let s = s.trim();
        let (head, args) = match s.find('(') {
            Some(open) => {
                let close = s
                    .rfind(')')
                    .filter(|&c| c > open)
                    .ok_or_else(|| MotionError::parse(format!("unbalanced ease '{s}'")))?;
                (&s[..open], Some(&s[open + 1..close]))
            }
            None => (s, None),
        };
        let (family, variant) = head.split_once('.').unwrap_or((head, "out"));
        let params = parse_params(args, s)?;

        let ease = match (family, variant) {
            ("none" | "linear" | "power0", _) => Self::Linear,
            ("power1" | "quad", "in") => Self::InQuad,
            ("power1" | "quad", "out") => Self::OutQuad,
            ("power1" | "quad", "inOut") => Self::InOutQuad,
            ("power2" | "cubic", "in") => Self::InCubic,
            ("power2" | "cubic", "out") => Self::OutCubic,
            ("power2" | "cubic", "inOut") => Self::InOutCubic,
            ("power3" | "quart", "in") => Self::InQuart,
            ("power3" | "quart", "out") => Self::OutQuart,
            ("power3" | "quart", "inOut") => Self::InOutQuart,
            ("power4" | "quint", "in") => Self::InQuint,
            ("power4" | "quint", "out") => Self::OutQuint,
            ("power4" | "quint", "inOut") => Self::InOutQuint,
            ("sine", "in") => Self::InSine,
            ("sine", "out") => Self::OutSine,
            ("sine", "inOut") => Self::InOutSine,
            ("expo", "in") => Self::InExpo,
            ("expo", "out") => Self::OutExpo,
            ("expo", "inOut") => Self::InOutExpo,
            ("back", "out") => Self::OutBack {
                overshoot: params.first().copied().unwrap_or(DEFAULT_BACK_OVERSHOOT),
            },
            ("elastic", "out") => Self::OutElastic {
                amplitude: params.first().copied().unwrap_or(DEFAULT_ELASTIC_AMPLITUDE),
                period: params.get(1).copied().unwrap_or(DEFAULT_ELASTIC_PERIOD),
            },
            ("scroll", _) => Self::ScrollExpo,
            _ => return Err(MotionError::parse(format!("unknown ease '{s}'"))),
        };
        Ok(ease)
    }
}

fn parse_params(args: Option<&str>, whole: &str) -> MotionResult<Vec<f64>> {
    let Some(args) = args else {
        return Ok(Vec::new());
    };
    args.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| {
            a.parse::<f64>()
                .map_err(|_| MotionError::parse(format!("bad ease parameter '{a}' in '{whole}'")))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::foundation::core::ElementId;
use crate::foundation::error::{MotionError, MotionResult};

/// Numeric presentation property the core can interpolate.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Horizontal translation in pixels.
    X,
    /// Vertical translation in pixels.
    Y,
    /// Horizontal translation in percent of the element width.
    XPercent,
    /// Vertical translation in percent of the element height.
    YPercent,
    /// Uniform scale.
    Scale,
    /// In-plane rotation in degrees.
    Rotation,
    /// Rotation around the horizontal axis in degrees.
    RotationX,
    /// Rotation around the vertical axis in degrees.
    RotationY,
    /// Fraction of the element revealed by a bottom-up clip (`0` hidden, `1` fully shown).
    ClipReveal,
}

impl Property {
    /// Value an element has before anything animated it.
    pub fn rest_value(self) -> f64 {
        match self {
            Self::Opacity | Self::Scale | Self::ClipReveal => 1.0,
            _ => 0.0,
        }
    }

    /// Authoring name of the property.
    pub fn name(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::X => "x",
            Self::Y => "y",
            Self::XPercent => "xPercent",
            Self::YPercent => "yPercent",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::RotationX => "rotationX",
            Self::RotationY => "rotationY",
            Self::ClipReveal => "clipReveal",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        Ok(match s {
            "opacity" | "autoAlpha" => Self::Opacity,
            "x" => Self::X,
            "y" => Self::Y,
            "xPercent" => Self::XPercent,
            "yPercent" => Self::YPercent,
            "scale" => Self::Scale,
            "rotation" | "rotate" => Self::Rotation,
            "rotationX" | "rotateX" => Self::RotationX,
            "rotationY" | "rotateY" => Self::RotationY,
            "clipReveal" => Self::ClipReveal,
            _ => return Err(MotionError::parse(format!("unknown property '{s}'"))),
        })
    }
}

/// Linear interpolation from `a` to `b` with normalized factor `t`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Destination for interpolated property values; the presentation layer reads from it.
pub trait PropertySink {
    /// Write the current value of `property` on `element`.
    fn set(&mut self, element: ElementId, property: Property, value: f64);

    /// Last value written for `property` on `element`.
    fn get(&self, element: ElementId, property: Property) -> Option<f64>;

    /// Last written value, or the property's rest value when nothing was written.
    fn current(&self, element: ElementId, property: Property) -> f64 {
        self.get(element, property)
            .unwrap_or_else(|| property.rest_value())
    }
}

/// In-memory [`PropertySink`] with deterministic iteration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyStore {
    values: BTreeMap<(ElementId, Property), f64>,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate `(element, property, value)` in element/property order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, Property, f64)> + '_ {
        self.values.iter().map(|(&(e, p), &v)| (e, p, v))
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every value written for `element`.
    pub fn clear_element(&mut self, element: ElementId) {
        self.values.retain(|(e, _), _| *e != element);
    }
}

impl PropertySink for PropertyStore {
    fn set(&mut self, element: ElementId, property: Property, value: f64) {
        self.values.insert((element, property), value);
    }

    fn get(&self, element: ElementId, property: Property) -> Option<f64> {
        self.values.get(&(element, property)).copied()
    }
}

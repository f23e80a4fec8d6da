use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MotionError, MotionResult};

/// A point along an element or the viewport, measured from its leading edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Fraction of the length (`top` = 0, `center` = 0.5, `bottom` = 1, `85%` = 0.85).
    Fraction(f64),
    /// Fixed distance in pixels (`100px`).
    Pixels(f64),
}

impl Anchor {
    /// Absolute position of the anchor on a segment starting at `lead` with length `len`.
    pub fn resolve(self, lead: f64, len: f64) -> f64 {
        match self {
            Self::Fraction(f) => lead + f * len,
            Self::Pixels(px) => lead + px,
        }
    }
}

impl FromStr for Anchor {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        let bad = || MotionError::parse(format!("bad threshold anchor '{s}'"));
        let num = |v: &str| {
            v.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(bad)
        };
        match s {
            "top" | "left" => Ok(Self::Fraction(0.0)),
            "center" => Ok(Self::Fraction(0.5)),
            "bottom" | "right" => Ok(Self::Fraction(1.0)),
            _ => {
                if let Some(pct) = s.strip_suffix('%') {
                    Ok(Self::Fraction(num(pct)? / 100.0))
                } else if let Some(px) = s.strip_suffix("px") {
                    Ok(Self::Pixels(num(px)?))
                } else {
                    Ok(Self::Pixels(num(s)?))
                }
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fraction(v) if v == 0.0 => f.write_str("top"),
            Self::Fraction(v) if v == 0.5 => f.write_str("center"),
            Self::Fraction(v) if v == 1.0 => f.write_str("bottom"),
            Self::Fraction(v) => write!(f, "{}%", (v * 100.0 * 1e6).round() / 1e6),
            Self::Pixels(v) => write!(f, "{v}px"),
        }
    }
}

/// Viewport-relative trigger position: `"<element-anchor> <viewport-anchor>"`.
///
/// `"top 85%"` is reached when the element's top edge is 85% of the way down the viewport.
/// A single token sets the element anchor; the viewport anchor then defaults to `bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold {
    /// Point on the element.
    pub element: Anchor,
    /// Point on the viewport.
    pub viewport: Anchor,
}

impl Threshold {
    /// Threshold from its two anchors.
    pub fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which the element point meets the viewport point.
    ///
    /// `span` is the element's `(leading, trailing)` edge in document coordinates and
    /// `viewport_extent` the viewport length along the scroll axis.
    pub fn scroll_offset(&self, span: (f64, f64), viewport_extent: f64) -> f64 {
        let (lead, trail) = span;
        self.element.resolve(lead, trail - lead) - self.viewport.resolve(0.0, viewport_extent)
    }
}

impl FromStr for Threshold {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        let mut parts = s.split_whitespace();
        let element = parts
            .next()
            .ok_or_else(|| MotionError::parse("empty threshold"))?
            .parse()?;
        let viewport = match parts.next() {
            Some(tok) => tok.parse()?,
            None => Anchor::Fraction(1.0),
        };
        if parts.next().is_some() {
            return Err(MotionError::parse(format!(
                "threshold '{s}' has more than two anchors"
            )));
        }
        Ok(Self { element, viewport })
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl serde::Serialize for Threshold {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Threshold {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

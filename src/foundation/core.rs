use std::collections::BTreeMap;
use std::fmt;

pub use kurbo::{Rect, Size};

/// Opaque handle for an element a section hands to the motion core.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a mounted section (the owner of registrations).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SectionId(pub u32);

/// Scroll axis the surface is locked to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    /// Top-to-bottom document scrolling.
    #[default]
    Vertical,
    /// Left-to-right document scrolling.
    Horizontal,
}

impl ScrollAxis {
    /// Length of `size` along this axis.
    pub fn extent(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// `(leading, trailing)` edges of `rect` along this axis, in document coordinates.
    pub fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Vertical => (rect.y0, rect.y1),
            Self::Horizontal => (rect.x0, rect.x1),
        }
    }

    /// Pick the component of a 2D input delta that belongs to this axis.
    pub fn pick(self, dx: f64, dy: f64) -> f64 {
        match self {
            Self::Vertical => dy,
            Self::Horizontal => dx,
        }
    }
}

/// Document-space bounds of every element currently mounted, tagged with the owning section.
///
/// Sections insert their elements at mount; the core never searches for elements on its own.
#[derive(Clone, Debug, Default)]
pub struct PageLayout {
    bounds: BTreeMap<ElementId, (SectionId, Rect)>,
}

impl PageLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move an element. Returns the previous bounds, if any.
    pub fn insert(&mut self, owner: SectionId, element: ElementId, bounds: Rect) -> Option<Rect> {
        self.bounds
            .insert(element, (owner, bounds))
            .map(|(_, prev)| prev)
    }

    /// Bounds of `element`, if mounted.
    pub fn bounds(&self, element: ElementId) -> Option<Rect> {
        self.bounds.get(&element).map(|(_, r)| *r)
    }

    /// Move an already mounted element, keeping its owner. Returns `false` if it is not mounted.
    pub fn update(&mut self, element: ElementId, bounds: Rect) -> bool {
        match self.bounds.get_mut(&element) {
            Some((_, rect)) => {
                *rect = bounds;
                true
            }
            None => false,
        }
    }

    /// Elements mounted by `owner`, in id order.
    pub fn elements_of(&self, owner: SectionId) -> Vec<ElementId> {
        self.bounds
            .iter()
            .filter(|(_, (o, _))| *o == owner)
            .map(|(e, _)| *e)
            .collect()
    }

    /// `true` when `element` is mounted.
    pub fn contains(&self, element: ElementId) -> bool {
        self.bounds.contains_key(&element)
    }

    /// Number of mounted elements.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// `true` when nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Forget every element owned by `owner`. Returns how many were removed.
    pub fn remove_owner(&mut self, owner: SectionId) -> usize {
        let before = self.bounds.len();
        self.bounds.retain(|_, (o, _)| *o != owner);
        before - self.bounds.len()
    }
}

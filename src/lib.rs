//! tiara-motion is the scroll-driven animation core of a single-page restaurant site.
//!
//! It virtualizes the scroll position behind a smooth-scroll surface, drives everything from
//! one shared frame clock, and runs viewport-relative triggers that play one-shot reveals
//! exactly once or scrub timelines with the scroll offset. The core never renders: it writes
//! interpolated property values into a [`PropertySink`] that the presentation layer reads.
//!
//! - Create a [`MotionContext`] from a [`MotionConfig`] and the [`Viewport`]
//! - Open a [`SectionScope`] per mounted section, register elements, timelines, triggers and
//!   hover bindings through it, and tear it down on unmount
//! - Feed input with [`MotionContext::input`] and run frames with [`MotionContext::frame`] or
//!   [`MotionContext::pump`]
//!
//! The [`page`] module wires the restaurant page's sections on top of that API.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod clock;
pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod interaction;
/// Per-section motion presets of the restaurant page.
pub mod page;
pub(crate) mod scroll;
pub(crate) mod trigger;

pub use crate::foundation::core::{ElementId, PageLayout, Rect, ScrollAxis, SectionId, Size};
pub use crate::foundation::error::{MotionError, MotionResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::property::{Property, PropertySink, PropertyStore};
pub use crate::animation::runtime::{TimelineId, TimelineRuntime};
pub use crate::animation::timeline::{
    FromTo, Position, Repeat, Step, Timeline, TimelineBuilder, TimelineState,
};
pub use crate::animation::tween::{Motion, Tween};
pub use crate::clock::source::{InstantTickSource, ManualTickSource, TickSource};
pub use crate::clock::{ClockSubscription, FrameClock, LagSmoothing, Tick};
pub use crate::config::MotionConfig;
pub use crate::context::{MotionContext, SectionScope};
pub use crate::interaction::{HoverBinding, HoverSpec, HoverTween, InteractionLayer};
pub use crate::scroll::surface::{
    ScrollDirection, ScrollInput, ScrollState, SmoothScroll, Viewport,
};
pub use crate::trigger::registry::{
    ToggleTween, Trigger, TriggerAction, TriggerId, TriggerMode, TriggerRegistry, TriggerSpec,
    TriggerState,
};
pub use crate::trigger::scheduler::{Evaluation, evaluate, settle};
pub use crate::trigger::threshold::{Anchor, Threshold};

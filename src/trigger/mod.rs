//! Viewport-relative triggers and their per-frame evaluation.

pub(crate) mod registry;
pub(crate) mod scheduler;
pub(crate) mod threshold;

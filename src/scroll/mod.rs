//! Virtualized scroll position.

pub(crate) mod surface;

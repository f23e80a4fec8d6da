pub(crate) mod ease;
pub(crate) mod property;
pub(crate) mod runtime;
pub(crate) mod timeline;
pub(crate) mod tween;

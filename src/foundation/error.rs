use crate::foundation::core::ElementId;

/// Result alias used throughout the crate.
pub type MotionResult<T> = Result<T, MotionError>;

/// Errors produced by the motion core.
///
/// Every variant is recoverable: callers that drive a live page log and continue rather than
/// propagate, so the worst visible outcome is a missing animation.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    /// Invalid configuration or registration input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed authoring string (threshold, ease name, position).
    #[error("parse error: {0}")]
    Parse(String),

    /// A trigger or timeline step references an element that is not mounted.
    #[error("missing target: element {element} ({context})")]
    MissingTarget {
        /// Element that could not be resolved.
        element: ElementId,
        /// What was being registered when the lookup failed.
        context: String,
    },

    /// Teardown was requested for a section that is already torn down.
    #[error("double teardown: section '{section}' was already torn down")]
    DoubleTeardown {
        /// Name of the section.
        section: String,
    },

    /// Configuration or script (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    /// Build a [`MotionError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MotionError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`MotionError::MissingTarget`].
    pub fn missing_target(element: ElementId, context: impl Into<String>) -> Self {
        Self::MissingTarget {
            element,
            context: context.into(),
        }
    }

    /// Build a [`MotionError::DoubleTeardown`].
    pub fn double_teardown(section: impl Into<String>) -> Self {
        Self::DoubleTeardown {
            section: section.into(),
        }
    }

    /// Build a [`MotionError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that a section should skip past instead of aborting its wiring.
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::MissingTarget { .. })
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

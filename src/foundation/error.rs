/// Result alias used across the crate.
pub type PanoResult<T> = Result<T, PanoError>;

/// Errors raised while planning, validating or projecting views.
///
/// Only [`PanoError::ToolUnavailable`] and [`PanoError::InvalidInput`] abort a whole run.
/// The projection variants are confined to the single view that produced them.
#[derive(thiserror::Error, Debug)]
pub enum PanoError {
    /// Parameters rejected before any work starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// The external projector binary could not be found or probed.
    #[error("tool unavailable: {0}")]
    ToolUnavailable(String),

    /// Missing source file or disallowed extension.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The projector exited non-zero or produced no usable output.
    #[error("projection failed: {0}")]
    ProjectionFailure(String),

    /// The projector did not finish within the per-call limit.
    #[error("projection timed out after {0:.1?}")]
    ProjectionTimeout(std::time::Duration),

    /// Any other fault while launching or waiting on the projector.
    #[error("execution error: {0}")]
    Execution(String),

    /// Wrapped error from a lower layer.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanoError {
    /// Build a [`PanoError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PanoError::ToolUnavailable`].
    pub fn tool_unavailable(msg: impl Into<String>) -> Self {
        Self::ToolUnavailable(msg.into())
    }

    /// Build a [`PanoError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`PanoError::ProjectionFailure`].
    pub fn projection(msg: impl Into<String>) -> Self {
        Self::ProjectionFailure(msg.into())
    }

    /// Build a [`PanoError::Execution`].
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// `true` for errors that stop a run before any view is attempted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ToolUnavailable(_) | Self::InvalidInput(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

/// Convenience result type used across invdes.
pub type InvdesResult<T> = Result<T, InvdesError>;

/// Top-level error taxonomy used by the operators and the animator.
#[derive(thiserror::Error, Debug)]
pub enum InvdesError {
    /// Arrays that must share a shape do not.
    #[error("shape error: {0}")]
    Shape(String),

    /// Invalid user-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterising or encoding frames.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InvdesError {
    /// Build an [`InvdesError::Shape`] value.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Build an [`InvdesError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`InvdesError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

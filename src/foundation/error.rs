/// Convenience result type used across stacksprite.
pub type StackResult<T> = Result<T, StackError>;

/// Top-level error taxonomy used by sprite and compositor APIs.
#[derive(thiserror::Error, Debug)]
pub enum StackError {
    /// Invalid caller-provided data (empty layer sets, mismatched sizes, bad slicing).
    #[error("validation error: {0}")]
    Validation(String),

    /// Surface allocation or compositing failures.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackError {
    /// Build a [`StackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StackError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

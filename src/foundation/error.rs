/// Convenience result type used across the engine.
pub type KandinskyResult<T> = Result<T, KandinskyError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Geometry and color selection never fail at runtime; errors only surface at the
/// configuration, surface and (de)serialization boundaries.
#[derive(thiserror::Error, Debug)]
pub enum KandinskyError {
    /// Invalid session configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Surface allocation or rasterization failures.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration or input scripts.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KandinskyError {
    /// Build a [`KandinskyError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`KandinskyError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KandinskyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for KandinskyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

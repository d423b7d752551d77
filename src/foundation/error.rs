/// Convenience result type used across kitsmith.
pub type KitResult<T> = Result<T, KitError>;

/// Top-level error taxonomy used by the rendering and export APIs.
///
/// Asset failures are normally recovered inside the loader by placeholder substitution, so
/// [`KitError::Asset`] only reaches callers from the lower-level decode helpers.
#[derive(thiserror::Error, Debug)]
pub enum KitError {
    /// Invalid caller-provided data (sizes, colors, paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be fetched or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Encoding or writing an exported image failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing design data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KitError {
    /// Build a [`KitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KitError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`KitError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`KitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

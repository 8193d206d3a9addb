/// Convenience result type used across the engine.
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant aborts the render that produced it; no partial image or audio buffer is
/// returned alongside an error.
#[derive(thiserror::Error, Debug)]
pub enum CaptchaError {
    /// Degenerate caller input (zero dot count, empty text, empty font set, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The operating system entropy source failed.
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// An explicitly requested font or sound set does not exist.
    #[error("asset lookup error: {0}")]
    AssetLookup(String),

    /// Serializing a finished buffer into its container failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptchaError {
    /// Build a [`CaptchaError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`CaptchaError::RandomnessUnavailable`] value.
    pub fn randomness(msg: impl Into<String>) -> Self {
        Self::RandomnessUnavailable(msg.into())
    }

    /// Build a [`CaptchaError::AssetLookup`] value.
    pub fn asset_lookup(msg: impl Into<String>) -> Self {
        Self::AssetLookup(msg.into())
    }

    /// Build a [`CaptchaError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

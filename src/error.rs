use thiserror::Error;
use crate::common::Sentinel;

/// Failures the classifier can run into. None of these leave [`crate::Classifier::classify`];
/// they are either absorbed (degraded state, zero tensor) or turned into a [`Sentinel`] result.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Asset missing, unreadable or malformed.
    #[error("failed to read asset `{name}`: {reason}")]
    AssetRead { name: String, reason: String },

    /// The image could not be converted into the model's input tensor.
    #[error("failed to encode image: {0}")]
    Encoding(String),

    /// The classifier is degraded or closed.
    #[error("model not loaded")]
    ModelNotLoaded,

    /// Inference was attempted without a live model handle.
    #[error("model unavailable")]
    InferenceUnavailable,

    #[error("inference failed: {0}")]
    InferenceFailure(String),

    /// The model returned an empty probability vector.
    #[error("model produced no output")]
    EmptyOutput,
}

impl ClassifierError {
    pub fn asset_read(name: &str, reason: impl ToString) -> Self {
        Self::AssetRead {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The placeholder result shown in place of a prediction when this error occurs.
    pub fn sentinel(&self) -> Sentinel {
        match self {
            Self::ModelNotLoaded | Self::AssetRead { .. } => Sentinel::ModelNotLoaded,
            Self::InferenceUnavailable => Sentinel::RuntimeUnavailable,
            Self::EmptyOutput => Sentinel::NoResult,
            Self::Encoding(_) | Self::InferenceFailure(_) => Sentinel::RecognitionFailed,
        }
    }

    /// Recovers a typed error from the `anyhow` plumbing, wrapping anything else as a failure.
    pub(crate) fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<ClassifierError>() {
            Ok(typed) => typed,
            Err(other) => Self::InferenceFailure(format!("{other:#}")),
        }
    }
}

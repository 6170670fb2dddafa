//! Error type shared by the library. Every variant carries a stable [`ErrorKind`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

/// Stable error codes. `UnrecognizedRole` and `EmptyBody` are informational and never
/// returned as `Err`; they show up as feature notes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnrecognizedRole,
    EmptyBody,
    ModelNotFitted,
    FeatureOrderMismatch,
    LexiconMismatch,
    EmptyTrainingSet,
    InvalidParameter,
    Dataset,
    Io,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedRole => "unrecognized_role",
            ErrorKind::EmptyBody => "empty_body",
            ErrorKind::ModelNotFitted => "model_not_fitted",
            ErrorKind::FeatureOrderMismatch => "feature_order_mismatch",
            ErrorKind::LexiconMismatch => "lexicon_mismatch",
            ErrorKind::EmptyTrainingSet => "empty_training_set",
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::Dataset => "dataset",
            ErrorKind::Io => "io",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("anomaly model has not been fitted")]
    ModelNotFitted,

    #[error("feature column order mismatch: expected {expected:?}, found {found:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("model bundle was trained with a different lexicon: {0}")]
    LexiconMismatch(String),

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::ModelNotFitted => ErrorKind::ModelNotFitted,
            GuardError::FeatureOrderMismatch { .. } => ErrorKind::FeatureOrderMismatch,
            GuardError::LexiconMismatch(_) => ErrorKind::LexiconMismatch,
            GuardError::EmptyTrainingSet => ErrorKind::EmptyTrainingSet,
            GuardError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            GuardError::Dataset(_) => ErrorKind::Dataset,
            GuardError::Io(_) => ErrorKind::Io,
            GuardError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

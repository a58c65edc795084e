use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuizError>;

/// Fatal conditions that abort a run before or during a session
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("dataset is malformed: {reason}")]
    DatasetMalformed { reason: String },

    #[error(
        "stored session has {stored} items but the dataset has {current}; \
         rerun with --discard-stale to start over"
    )]
    SchemaMismatch { stored: usize, current: usize },

    #[error("cannot ask {requested} questions, only {available} are available")]
    SampleSizeExceeded { requested: usize, available: usize },

    #[error("failed to persist session to {}: {source}", .path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored session at {} is unreadable: {reason}", .path.display())]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuizError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        QuizError::DatasetMalformed {
            reason: reason.into(),
        }
    }
}

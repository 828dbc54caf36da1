use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("missing post text: enter some text before running")]
    MissingText,

    #[error("missing input: provide post text or an image")]
    MissingInput,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}

/// Failures of the external image classifier. These never abort an analysis;
/// the analyzer downgrades them to a skipped image step.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classifier timed out after {0} ms")]
    Timeout(u64),

    #[error("classifier returned malformed output: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        ClassifierError::Unavailable(err.to_string())
    }
}

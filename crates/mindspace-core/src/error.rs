use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("answer value {0} is outside range [0, 3]")]
    InvalidAnswerValue(u8),

    #[error("question set is empty")]
    EmptyQuestionSet,

    #[error("question id must not be empty")]
    EmptyQuestionId,

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("question id {0:?} collides with a submission field")]
    ReservedQuestionId(String),
}

/// Failure reported by a scan backend. Every variant is recoverable: the
/// session stays open and the user may resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("could not reach the backend: {0}")]
    Transport(String),

    #[error("backend connection issue (status {0})")]
    Status(u16),

    #[error("backend returned a malformed response: {0}")]
    MalformedBody(String),
}

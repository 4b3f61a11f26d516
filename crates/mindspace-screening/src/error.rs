use mindspace_core::error::{BackendError, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("question '{question_id}' must be answered first")]
    Unanswered { question_id: String },

    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    #[error("invalid answer: {0}")]
    InvalidAnswer(#[from] CoreError),

    #[error("already at the last question")]
    AtLastQuestion,

    #[error("submission is only available on the last question")]
    NotAtLastQuestion,

    #[error("time is up; answers can no longer be changed")]
    TimeExpired,

    #[error("screening is not in progress")]
    NotInProgress,

    #[error("{0}")]
    Backend(#[from] BackendError),
}

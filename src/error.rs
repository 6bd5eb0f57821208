//! Error types for session finalisation

use thiserror::Error;

/// Reasons a batch of answers cannot be turned into a session result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No answers were submitted
    #[error("session contains no answers")]
    Empty,

    /// Answer count differs from the configured session size
    #[error("expected {expected} answers, got {actual}")]
    WrongQuestionCount { expected: usize, actual: usize },

    /// The same question was answered twice
    #[error("duplicate answer for question '{0}'")]
    DuplicateQuestion(String),

    /// A bound or the true value is NaN or infinite
    #[error("non-finite input for question '{question_id}'")]
    NonFiniteInput { question_id: String },

    /// A finite answer whose score left the formula's domain (∞ or NaN)
    #[error("non-finite score for question '{question_id}'")]
    NonFiniteScore { question_id: String },
}

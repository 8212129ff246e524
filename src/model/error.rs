use crate::model::QuestionId;

/// Domain failures shared by the server pipeline, the form session and the API client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KioskError {
    /// Locale tag outside the supported set
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// Content tag that maps to no input strategy
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// Answer key that does not parse back to a numeric question id
    #[error("Invalid question id: {0}")]
    InvalidQuestionId(String),

    #[error("Question {0} does not exist in the loaded form")]
    UnknownQuestion(QuestionId),

    /// Question has no scalar answer of its own (section or table)
    #[error("Question {0} does not accept a direct answer")]
    NotABinding(QuestionId),

    #[error("Question {question_id} has no option matching '{input}'")]
    NotAnOption { question_id: QuestionId, input: String },

    #[error("Question {question_id} expects a number, got '{input}'")]
    InvalidNumber { question_id: QuestionId, input: String },

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Questions for locale {0} are already loading")]
    LoadInFlight(crate::model::Locale),

    /// Network or HTTP status failure talking to the backend
    #[error("Transport error: {0}")]
    Transport(String),
}

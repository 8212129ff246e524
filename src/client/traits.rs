use crate::model::{CreateAnswer, KioskError, Locale, Question, SaveAnswersResponse};

/// Where the kiosk loads its question tree from.
#[async_trait::async_trait]
pub trait QuestionSource: Send + Sync {
    /// Forest of questions with labels resolved for `locale`
    async fn fetch_questions(&self, locale: Locale) -> Result<Vec<Question>, KioskError>;
}

/// Where the kiosk sends a finished answer batch.
#[async_trait::async_trait]
pub trait AnswerSink: Send + Sync {
    async fn save_answers(&self, answers: &[CreateAnswer]) -> Result<SaveAnswersResponse, KioskError>;
}

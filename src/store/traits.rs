use crate::model::{
    CreateAnswer, EnumValueId, Locale, NewEnumValue, NewQuestion, QuestionId, QuestionRecord,
    StoredAnswer,
};
use anyhow::Result;

/// Read/write access to the flat question tables.
#[async_trait::async_trait]
pub trait QuestionStore: Send + Sync {
    /// All questions with translations limited to `locale` and enum values sorted by `order`
    async fn list_question_records(&self, locale: Locale) -> Result<Vec<QuestionRecord>>;
    async fn create_question(&self, question: NewQuestion) -> Result<QuestionId>;
    async fn create_enum_value(
        &self,
        question_id: QuestionId,
        enum_value: NewEnumValue,
    ) -> Result<EnumValueId>;
    /// Remove every question, option, translation and answer
    async fn clear_questions(&self) -> Result<()>;
}

/// Persistence of submitted answer batches.
#[async_trait::async_trait]
pub trait ResponseStore: Send + Sync {
    /// Persist a whole batch atomically: either every row is written or none is
    async fn save_answers(&self, answers: &[CreateAnswer]) -> Result<Vec<StoredAnswer>>;
    async fn list_answers(&self) -> Result<Vec<StoredAnswer>>;
}

pub trait Store: QuestionStore + ResponseStore + Send + Sync {}

use crate::form::AnswerStore;
use crate::model::{CreateAnswer, KioskError, QuestionId};

/// Flatten the store into the `POST /v1/answers` body, one item per stored key
/// in store iteration order. Null answers are sent as empty strings.
pub fn assemble_submission(answers: &AnswerStore) -> Result<Vec<CreateAnswer>, KioskError> {
    answers
        .iter()
        .map(|(key, value)| {
            let question_id = key
                .trim()
                .parse::<QuestionId>()
                .map_err(|_| KioskError::InvalidQuestionId(key.to_string()))?;
            Ok(CreateAnswer::new(question_id, value.to_answer_string()))
        })
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, ContentType, KioskError, Question};

/// Interaction behaviour for one question's content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStrategy {
    /// Number field; blank input clears the answer
    NumericScalar,
    /// Free text area
    FreeText,
    /// Single choice among the question's enum values
    SingleChoice,
    /// Children laid out as the columns of a one-row grid
    TabularComposite,
}

impl InputStrategy {
    /// `None` for grouping nodes.
    pub fn for_content(content: Option<ContentType>) -> Option<Self> {
        match content? {
            ContentType::Number => Some(InputStrategy::NumericScalar),
            ContentType::Text => Some(InputStrategy::FreeText),
            ContentType::Enum => Some(InputStrategy::SingleChoice),
            ContentType::Table => Some(InputStrategy::TabularComposite),
        }
    }

    /// Whether the question binds an answer under its own id.
    pub fn binds_own_answer(&self) -> bool {
        !matches!(self, InputStrategy::TabularComposite)
    }

    /// Strategy for a table cell: numeric for `NUMBER` children, text otherwise.
    pub fn for_table_cell(child: &Question) -> Self {
        match child.content {
            Some(ContentType::Number) => InputStrategy::NumericScalar,
            _ => InputStrategy::FreeText,
        }
    }

    /// Turn raw user input into the value stored for `question`.
    pub fn coerce(&self, question: &Question, input: &str) -> Result<AnswerValue, KioskError> {
        match self {
            InputStrategy::FreeText => Ok(AnswerValue::Text(input.to_string())),
            InputStrategy::NumericScalar => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return Ok(AnswerValue::Null);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(AnswerValue::Number)
                    .ok_or_else(|| KioskError::InvalidNumber {
                        question_id: question.id,
                        input: input.to_string(),
                    })
            }
            InputStrategy::SingleChoice => question
                .enum_values
                .iter()
                .find(|ev| ev.value == input)
                .or_else(|| question.enum_values.iter().find(|ev| ev.label == input))
                .map(|ev| AnswerValue::Text(ev.value.clone()))
                .ok_or_else(|| KioskError::NotAnOption {
                    question_id: question.id,
                    input: input.to_string(),
                }),
            InputStrategy::TabularComposite => Err(KioskError::NotABinding(question.id)),
        }
    }
}

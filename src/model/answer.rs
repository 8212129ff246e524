use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuestionId;

/// Scalar answer held by the form. `Null` is an explicit "cleared" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Null,
}

impl AnswerValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AnswerValue::Null)
    }

    /// String form sent to the backend; null becomes an empty string.
    pub fn to_answer_string(&self) -> String {
        match self {
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Number(number) => format_number(*number),
            AnswerValue::Null => String::new(),
        }
    }
}

/// Integral floats render without a fractional part ("42", not "42.0").
fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{}", number)
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_answer_string())
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<i32> for AnswerValue {
    fn from(value: i32) -> Self {
        AnswerValue::Number(f64::from(value))
    }
}

/// One item of the `POST /v1/answers` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswer {
    pub question_id: QuestionId,
    pub answer: String,
}

impl CreateAnswer {
    pub fn new(question_id: QuestionId, answer: impl Into<String>) -> Self {
        Self {
            question_id,
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAnswersResponse {
    pub message: String,
}

impl SaveAnswersResponse {
    pub fn saved() -> Self {
        Self {
            message: "Answers saved successfully".to_string(),
        }
    }
}

/// Persisted answer row. Rows written by one submission share a `batch_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnswer {
    pub id: i32,
    pub question_id: QuestionId,
    pub value: Option<String>,
    pub batch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_string_conversion() {
        assert_eq!(AnswerValue::from("John Doe").to_answer_string(), "John Doe");
        assert_eq!(AnswerValue::from(42).to_answer_string(), "42");
        assert_eq!(AnswerValue::from(4.5).to_answer_string(), "4.5");
        assert_eq!(AnswerValue::Null.to_answer_string(), "");
    }

    #[test]
    fn test_answer_value_untagged_json() {
        let values: Vec<AnswerValue> = serde_json::from_str(r#"["blue", 30, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AnswerValue::Text("blue".to_string()),
                AnswerValue::Number(30.0),
                AnswerValue::Null,
            ]
        );
    }

    #[test]
    fn test_create_answer_wire_format() {
        let json = serde_json::to_value(CreateAnswer::new(3, "blue")).unwrap();
        assert_eq!(json, serde_json::json!({"questionId": 3, "answer": "blue"}));
    }
}

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{KioskError, Locale};

pub type QuestionId = i32;
pub type EnumValueId = i32;

/// What kind of input a question collects. Absent content marks a grouping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Number,
    Text,
    Enum,
    Table,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Number => "NUMBER",
            ContentType::Text => "TEXT",
            ContentType::Enum => "ENUM",
            ContentType::Table => "TABLE",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = KioskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NUMBER" => Ok(ContentType::Number),
            "TEXT" => Ok(ContentType::Text),
            "ENUM" => Ok(ContentType::Enum),
            "TABLE" => Ok(ContentType::Table),
            _ => Err(KioskError::UnknownContentType(s.to_string())),
        }
    }
}

/// Display unit attached to numeric questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    Percentage,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Percentage => "PERCENTAGE",
        }
    }

    /// Short marker shown next to the input
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Percentage => "%",
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = KioskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "%" => Ok(Unit::Percentage),
            other if other.eq_ignore_ascii_case("percentage") => Ok(Unit::Percentage),
            _ => Err(KioskError::UnknownUnit(s.to_string())),
        }
    }
}

/// A single translated string for one locale, attached to a question or an enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub locale: Locale,
    pub value: String,
}

impl Translation {
    pub fn new(locale: Locale, value: impl Into<String>) -> Self {
        Self {
            locale,
            value: value.into(),
        }
    }
}

/// Flat enum value row as read from storage, before label resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueRecord {
    pub id: EnumValueId,
    pub value: String,
    pub order: i32,
    pub translations: Vec<Translation>,
}

/// Flat question row as read from storage. Tree edges are only carried by `parent_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub parent_id: Option<QuestionId>,
    pub content: Option<ContentType>,
    pub order: i32,
    pub unit: Option<Unit>,
    pub translations: Vec<Translation>,
    pub enum_values: Vec<EnumValueRecord>,
}

/// Selectable option of an `ENUM` question with its label resolved for the active locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub id: EnumValueId,
    /// Canonical, locale-independent value submitted as the answer
    pub value: String,
    pub order: i32,
    pub label: String,
}

/// Locale-resolved question node. `children` is derived from `parent_id` by the tree builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub label: String,
    /// Unrecognised tags deserialize as `None`, so the node renders as a section
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Option<ContentType>,
    pub order: i32,
    pub unit: Option<Unit>,
    #[serde(default)]
    pub enum_values: Vec<EnumValue>,
    #[serde(default)]
    pub parent_id: Option<QuestionId>,
    #[serde(default)]
    pub children: Vec<Question>,
}

impl Question {
    pub fn is_group(&self) -> bool {
        self.content.is_none()
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<Option<ContentType>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag: Option<String> = Option::deserialize(deserializer)?;
    Ok(tag.and_then(|tag| match tag.parse::<ContentType>() {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("{}; treating the question as a section", e);
            None
        }
    }))
}

/// Input for creating a question in a store.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub parent_id: Option<QuestionId>,
    pub content: Option<ContentType>,
    pub order: i32,
    pub unit: Option<Unit>,
    pub labels: Vec<Translation>,
}

#[derive(Debug, Clone)]
pub struct NewEnumValue {
    pub value: String,
    pub order: i32,
    pub labels: Vec<Translation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parsing_is_case_insensitive() {
        assert_eq!("number".parse::<ContentType>().unwrap(), ContentType::Number);
        assert_eq!("TABLE".parse::<ContentType>().unwrap(), ContentType::Table);
        assert!("matrix".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_unit_accepts_symbol() {
        assert_eq!("%".parse::<Unit>().unwrap(), Unit::Percentage);
        assert_eq!(Unit::Percentage.symbol(), "%");
        assert!("EUR".parse::<Unit>().is_err());
    }

    #[test]
    fn test_question_wire_format() {
        let question = Question {
            id: 7,
            label: "Share of renewable energy".to_string(),
            content: Some(ContentType::Number),
            order: 2,
            unit: Some(Unit::Percentage),
            enum_values: Vec::new(),
            parent_id: Some(3),
            children: Vec::new(),
        };

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["content"], "NUMBER");
        assert_eq!(json["unit"], "PERCENTAGE");
        assert_eq!(json["parentId"], 3);
        assert!(json["enumValues"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_grouping_node_deserializes_null_content() {
        let json = r#"{"id": 1, "label": "General", "content": null, "order": 0, "unit": null, "enumValues": [], "children": []}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert!(question.is_group());
        assert_eq!(question.parent_id, None);
    }

    #[test]
    fn test_unknown_content_tag_deserializes_as_group() {
        let json = r#"[
            {"id": 1, "label": "Grid", "content": "MATRIX", "order": 0, "unit": null},
            {"id": 2, "label": "Name", "content": "TEXT", "order": 1, "unit": null}
        ]"#;
        let questions: Vec<Question> = serde_json::from_str(json).unwrap();

        assert_eq!(questions.len(), 2);
        assert!(questions[0].is_group());
        assert_eq!(questions[1].content, Some(ContentType::Text));
    }

    #[test]
    fn test_missing_content_is_group() {
        let json = r#"{"id": 3, "label": "Section", "order": 0, "unit": null}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert!(question.is_group());
    }
}

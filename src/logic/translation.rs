use itertools::Itertools;

use crate::model::{EnumValue, EnumValueRecord, Locale, Question, QuestionRecord, Translation};

/// First translation for `locale`. Upstream guarantees at most one row per locale,
/// so no deduplication happens here.
pub fn resolve_translation(locale: Locale, translations: &[Translation]) -> Option<&str> {
    translations
        .iter()
        .find(|t| t.locale == locale)
        .map(|t| t.value.as_str())
}

/// Label for a question, falling back to `Question {id}`.
pub fn question_label(locale: Locale, record: &QuestionRecord) -> String {
    match resolve_translation(locale, &record.translations) {
        Some(label) => label.to_string(),
        None => format!("Question {}", record.id),
    }
}

/// Label for an enum value, falling back to its canonical value.
pub fn enum_value_label(locale: Locale, record: &EnumValueRecord) -> String {
    resolve_translation(locale, &record.translations)
        .unwrap_or(&record.value)
        .to_string()
}

pub fn resolve_enum_value(locale: Locale, record: &EnumValueRecord) -> EnumValue {
    EnumValue {
        id: record.id,
        value: record.value.clone(),
        order: record.order,
        label: enum_value_label(locale, record),
    }
}

/// Resolve one flat row into a childless `Question` with its options sorted by `order`.
pub fn resolve_question(locale: Locale, record: &QuestionRecord) -> Question {
    let enum_values = record
        .enum_values
        .iter()
        .sorted_by_key(|ev| ev.order)
        .map(|ev| resolve_enum_value(locale, ev))
        .collect();

    Question {
        id: record.id,
        label: question_label(locale, record),
        content: record.content,
        order: record.order,
        unit: record.unit,
        enum_values,
        parent_id: record.parent_id,
        children: Vec::new(),
    }
}

pub fn resolve_questions(locale: Locale, records: &[QuestionRecord]) -> Vec<Question> {
    records
        .iter()
        .map(|record| resolve_question(locale, record))
        .collect()
}

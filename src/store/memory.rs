use anyhow::{bail, Result};
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::model::{
    CreateAnswer, EnumValueId, EnumValueRecord, Locale, NewEnumValue, NewQuestion, QuestionId,
    QuestionRecord, StoredAnswer,
};
use crate::store::traits::{QuestionStore, ResponseStore, Store};

#[derive(Debug, Default)]
struct MemoryData {
    questions: Vec<QuestionRecord>,
    answers: Vec<StoredAnswer>,
    next_question_id: QuestionId,
    next_enum_value_id: EnumValueId,
    next_answer_id: i32,
}

/// In-process store used for local runs and tests. Holds every locale's
/// translations and filters on read, like the SQL store does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl QuestionStore for MemoryStore {
    async fn list_question_records(&self, locale: Locale) -> Result<Vec<QuestionRecord>> {
        let data = self.data.read();
        let mut records: Vec<QuestionRecord> = data
            .questions
            .iter()
            .cloned()
            .map(|mut record| {
                record.translations.retain(|t| t.locale == locale);
                record.enum_values.sort_by_key(|ev| (ev.order, ev.id));
                for ev in &mut record.enum_values {
                    ev.translations.retain(|t| t.locale == locale);
                }
                record
            })
            .collect();
        records.sort_by_key(|r| (r.order, r.id));
        Ok(records)
    }

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionId> {
        let mut data = self.data.write();
        if let Some(parent_id) = question.parent_id {
            if !data.questions.iter().any(|q| q.id == parent_id) {
                bail!("Parent question {} does not exist", parent_id);
            }
        }

        data.next_question_id += 1;
        let id = data.next_question_id;
        data.questions.push(QuestionRecord {
            id,
            parent_id: question.parent_id,
            content: question.content,
            order: question.order,
            unit: question.unit,
            translations: question.labels,
            enum_values: Vec::new(),
        });
        Ok(id)
    }

    async fn create_enum_value(
        &self,
        question_id: QuestionId,
        enum_value: NewEnumValue,
    ) -> Result<EnumValueId> {
        let mut data = self.data.write();
        data.next_enum_value_id += 1;
        let id = data.next_enum_value_id;

        let Some(question) = data.questions.iter_mut().find(|q| q.id == question_id) else {
            bail!("Question {} does not exist", question_id);
        };
        question.enum_values.push(EnumValueRecord {
            id,
            value: enum_value.value,
            order: enum_value.order,
            translations: enum_value.labels,
        });
        Ok(id)
    }

    async fn clear_questions(&self) -> Result<()> {
        *self.data.write() = MemoryData::default();
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResponseStore for MemoryStore {
    async fn save_answers(&self, answers: &[CreateAnswer]) -> Result<Vec<StoredAnswer>> {
        let mut data = self.data.write();

        // Validate the whole batch before writing anything
        for answer in answers {
            if !data.questions.iter().any(|q| q.id == answer.question_id) {
                bail!("Question {} does not exist", answer.question_id);
            }
        }

        let batch_id = Uuid::new_v4();
        let created_at = Utc::now();
        let mut stored = Vec::with_capacity(answers.len());
        for answer in answers {
            data.next_answer_id += 1;
            stored.push(StoredAnswer {
                id: data.next_answer_id,
                question_id: answer.question_id,
                value: Some(answer.answer.clone()),
                batch_id,
                created_at,
            });
        }
        data.answers.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn list_answers(&self) -> Result<Vec<StoredAnswer>> {
        Ok(self.data.read().answers.clone())
    }
}

impl Store for MemoryStore {}

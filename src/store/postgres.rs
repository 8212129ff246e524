use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::info;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::model::{
    ContentType, CreateAnswer, EnumValueId, EnumValueRecord, Locale, NewEnumValue, NewQuestion,
    QuestionId, QuestionRecord, StoredAnswer, Translation, Unit,
};
use crate::store::traits::{QuestionStore, ResponseStore, Store};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn insert_translations(
        tx: &mut Transaction<'_, Postgres>,
        owner_column: &str,
        owner_id: i32,
        labels: &[Translation],
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO translations (locale, value, {}) VALUES ($1, $2, $3)",
            owner_column
        );
        for label in labels {
            sqlx::query(&sql)
                .bind(label.locale.as_str())
                .bind(&label.value)
                .bind(owner_id)
                .execute(&mut **tx)
                .await
                .context("Failed to insert translation")?;
        }
        Ok(())
    }

    async fn translations_for(
        &self,
        locale: Locale,
        owner_column: &str,
    ) -> Result<HashMap<i32, Vec<Translation>>> {
        let sql = format!(
            "SELECT {0} AS owner_id, value FROM translations WHERE locale = $1 AND {0} IS NOT NULL ORDER BY id",
            owner_column
        );
        let rows = sqlx::query(&sql)
            .bind(locale.as_str())
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch translations")?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let owner_id: i32 = row.get("owner_id");
                (owner_id, Translation::new(locale, row.get::<String, _>("value")))
            })
            .into_group_map())
    }
}

fn parse_content(raw: Option<String>) -> Result<Option<ContentType>> {
    raw.map(|tag| tag.parse::<ContentType>())
        .transpose()
        .context("Invalid content type in questions table")
}

fn parse_unit(raw: Option<String>) -> Result<Option<Unit>> {
    raw.map(|tag| tag.parse::<Unit>())
        .transpose()
        .context("Invalid unit in questions table")
}

#[async_trait::async_trait]
impl QuestionStore for PostgresStore {
    async fn list_question_records(&self, locale: Locale) -> Result<Vec<QuestionRecord>> {
        let question_rows = sqlx::query(
            "SELECT id, parent_id, content, sort_order, unit FROM questions ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list questions")?;

        let enum_rows = sqlx::query(
            "SELECT id, question_id, value, sort_order FROM enum_values ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list enum values")?;

        let mut question_translations = self.translations_for(locale, "question_id").await?;
        let mut enum_translations = self.translations_for(locale, "enum_value_id").await?;

        let mut enum_values: HashMap<QuestionId, Vec<EnumValueRecord>> = enum_rows
            .into_iter()
            .map(|row| {
                let id: EnumValueId = row.get("id");
                let question_id: QuestionId = row.get("question_id");
                let record = EnumValueRecord {
                    id,
                    value: row.get("value"),
                    order: row.get("sort_order"),
                    translations: enum_translations.remove(&id).unwrap_or_default(),
                };
                (question_id, record)
            })
            .into_group_map();

        question_rows
            .into_iter()
            .map(|row| -> Result<QuestionRecord> {
                let id: QuestionId = row.get("id");
                Ok(QuestionRecord {
                    id,
                    parent_id: row.get("parent_id"),
                    content: parse_content(row.get("content"))?,
                    order: row.get("sort_order"),
                    unit: parse_unit(row.get("unit"))?,
                    translations: question_translations.remove(&id).unwrap_or_default(),
                    enum_values: enum_values.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionId> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query(
            "INSERT INTO questions (parent_id, content, sort_order, unit) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(question.parent_id)
        .bind(question.content.map(|c| c.as_str()))
        .bind(question.order)
        .bind(question.unit.map(|u| u.as_str()))
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert question")?;
        let id: QuestionId = row.get("id");

        Self::insert_translations(&mut tx, "question_id", id, &question.labels).await?;
        tx.commit().await.context("Failed to commit question")?;

        Ok(id)
    }

    async fn create_enum_value(
        &self,
        question_id: QuestionId,
        enum_value: NewEnumValue,
    ) -> Result<EnumValueId> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let row = sqlx::query(
            "INSERT INTO enum_values (question_id, value, sort_order) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(question_id)
        .bind(&enum_value.value)
        .bind(enum_value.order)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert enum value")?;
        let id: EnumValueId = row.get("id");

        Self::insert_translations(&mut tx, "enum_value_id", id, &enum_value.labels).await?;
        tx.commit().await.context("Failed to commit enum value")?;

        Ok(id)
    }

    async fn clear_questions(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        for table in ["answers", "translations", "enum_values", "questions"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to clear {}", table))?;
        }
        tx.commit().await.context("Failed to commit clear")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResponseStore for PostgresStore {
    async fn save_answers(&self, answers: &[CreateAnswer]) -> Result<Vec<StoredAnswer>> {
        let batch_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        let mut stored = Vec::with_capacity(answers.len());

        // Dropping the transaction on error rolls back the rows already written
        for answer in answers {
            let row = sqlx::query(
                "INSERT INTO answers (question_id, value, batch_id) VALUES ($1, $2, $3) RETURNING id, created_at",
            )
            .bind(answer.question_id)
            .bind(&answer.answer)
            .bind(batch_id)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to save answer for question {}", answer.question_id))?;

            let created_at: DateTime<Utc> = row.get("created_at");
            stored.push(StoredAnswer {
                id: row.get("id"),
                question_id: answer.question_id,
                value: Some(answer.answer.clone()),
                batch_id,
                created_at,
            });
        }

        tx.commit().await.context("Failed to commit answers")?;
        Ok(stored)
    }

    async fn list_answers(&self) -> Result<Vec<StoredAnswer>> {
        let rows = sqlx::query(
            "SELECT id, question_id, value, batch_id, created_at FROM answers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list answers")?;

        Ok(rows
            .into_iter()
            .map(|row| StoredAnswer {
                id: row.get("id"),
                question_id: row.get("question_id"),
                value: row.get("value"),
                batch_id: row.get("batch_id"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl Store for PostgresStore {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_column() {
        assert_eq!(parse_content(None).unwrap(), None);
        assert_eq!(
            parse_content(Some("ENUM".to_string())).unwrap(),
            Some(ContentType::Enum)
        );
        assert!(parse_content(Some("matrix".to_string())).is_err());
    }

    #[test]
    fn test_parse_unit_column() {
        assert_eq!(
            parse_unit(Some("PERCENTAGE".to_string())).unwrap(),
            Some(Unit::Percentage)
        );
        assert!(parse_unit(Some("kg".to_string())).is_err());
    }
}

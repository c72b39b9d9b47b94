/// Generated article bodies. Append-only: rows are inserted and read, never
/// updated. They disappear only through cascade from their plan item or
/// company.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE generated_content (
///     id UUID PRIMARY KEY,
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     plan_item_id UUID NOT NULL REFERENCES editorial_plan(id) ON DELETE CASCADE,
///     body TEXT NOT NULL,
///     model VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GeneratedContentRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub plan_item_id: Uuid,
    pub body: String,
    /// Generator model that produced the body
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedContentRecord {
    pub async fn create(
        pool: &PgPool,
        company_id: Uuid,
        plan_item_id: Uuid,
        body: &str,
        model: &str,
    ) -> Result<Self, sqlx::Error> {
        let record = sqlx::query_as::<_, GeneratedContentRecord>(
            r#"
            INSERT INTO generated_content (id, company_id, plan_item_id, body, model)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, plan_item_id, body, model, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(plan_item_id)
        .bind(body)
        .bind(model)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Records for one plan item, newest first.
    pub async fn list_for_item(
        pool: &PgPool,
        company_id: Uuid,
        plan_item_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let records = sqlx::query_as::<_, GeneratedContentRecord>(
            r#"
            SELECT id, company_id, plan_item_id, body, model, created_at
            FROM generated_content
            WHERE company_id = $1 AND plan_item_id = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(company_id)
        .bind(plan_item_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

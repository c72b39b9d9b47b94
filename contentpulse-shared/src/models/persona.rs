/// Target personas, a per-company catalog.
///
/// Names are unique within a company. The `is_selected` flag decides which
/// personas feed suggestion and article prompts.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE personas (
///     id UUID PRIMARY KEY,
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     is_selected BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (company_id, name)
/// );
/// ```
///
/// Every statement filters on `company_id`. Updates and deletes aimed at
/// another company's row match nothing and report `false`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Persona {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersona {
    pub name: String,
    #[serde(default)]
    pub is_selected: bool,
}

impl Persona {
    /// # Errors
    ///
    /// Unique violation when the company already has a persona with this name.
    pub async fn create(
        pool: &PgPool,
        company_id: Uuid,
        data: CreatePersona,
    ) -> Result<Self, sqlx::Error> {
        let persona = sqlx::query_as::<_, Persona>(
            r#"
            INSERT INTO personas (id, company_id, name, is_selected)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, name, is_selected, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(data.name.trim())
        .bind(data.is_selected)
        .fetch_one(pool)
        .await?;

        Ok(persona)
    }

    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let personas = sqlx::query_as::<_, Persona>(
            r#"
            SELECT id, company_id, name, is_selected, created_at
            FROM personas
            WHERE company_id = $1
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(personas)
    }

    pub async fn list_selected(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let personas = sqlx::query_as::<_, Persona>(
            r#"
            SELECT id, company_id, name, is_selected, created_at
            FROM personas
            WHERE company_id = $1 AND is_selected
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(personas)
    }

    pub async fn set_selected(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        is_selected: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE personas SET is_selected = $3 WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(is_selected)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Makes exactly `selected_ids` the selected set; everything else in the
    /// company is deselected. Ids from other companies are ignored.
    pub async fn replace_selection(
        pool: &PgPool,
        company_id: Uuid,
        selected_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE personas SET is_selected = (id = ANY($2)) WHERE company_id = $1",
        )
        .bind(company_id)
        .bind(selected_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, company_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM personas WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

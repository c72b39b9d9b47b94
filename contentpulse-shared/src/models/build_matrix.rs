/// The build matrix: for each persona, the pains it has and how the company
/// relieves them. At most one entry exists per (company, persona).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE build_matrix (
///     id UUID PRIMARY KEY,
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     persona VARCHAR(255) NOT NULL,
///     pain_points TEXT NOT NULL DEFAULT '',
///     pain_killers TEXT NOT NULL DEFAULT '',
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (company_id, persona)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BuildMatrixEntry {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Persona name; not a foreign key, so entries survive persona renames
    pub persona: String,
    pub pain_points: String,
    pub pain_killers: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertBuildMatrixEntry {
    pub persona: String,
    #[serde(default)]
    pub pain_points: String,
    #[serde(default)]
    pub pain_killers: String,
}

impl BuildMatrixEntry {
    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, BuildMatrixEntry>(
            r#"
            SELECT id, company_id, persona, pain_points, pain_killers, updated_at
            FROM build_matrix
            WHERE company_id = $1
            ORDER BY persona
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Inserts the entry for `data.persona`, or overwrites both text fields if
    /// the company already has one.
    pub async fn upsert(
        pool: &PgPool,
        company_id: Uuid,
        data: UpsertBuildMatrixEntry,
    ) -> Result<Self, sqlx::Error> {
        let entry = sqlx::query_as::<_, BuildMatrixEntry>(
            r#"
            INSERT INTO build_matrix (id, company_id, persona, pain_points, pain_killers)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (company_id, persona) DO UPDATE SET
                pain_points = EXCLUDED.pain_points,
                pain_killers = EXCLUDED.pain_killers,
                updated_at = NOW()
            RETURNING id, company_id, persona, pain_points, pain_killers, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(data.persona.trim())
        .bind(&data.pain_points)
        .bind(&data.pain_killers)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    pub async fn delete(pool: &PgPool, company_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM build_matrix WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Business objectives the editorial plan should serve (traffic, leads, ...).
///
/// Same shape and scoping rules as [`Persona`](super::persona::Persona).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessObjective {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessObjective {
    pub name: String,
    #[serde(default)]
    pub is_selected: bool,
}

impl BusinessObjective {
    pub async fn create(
        pool: &PgPool,
        company_id: Uuid,
        data: CreateBusinessObjective,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, BusinessObjective>(
            r#"
            INSERT INTO business_objectives (id, company_id, name, is_selected)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, name, is_selected, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(data.name.trim())
        .bind(data.is_selected)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BusinessObjective>(
            r#"
            SELECT id, company_id, name, is_selected, created_at
            FROM business_objectives
            WHERE company_id = $1
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_selected(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BusinessObjective>(
            r#"
            SELECT id, company_id, name, is_selected, created_at
            FROM business_objectives
            WHERE company_id = $1 AND is_selected
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn set_selected(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        is_selected: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE business_objectives SET is_selected = $3 WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .bind(is_selected)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn replace_selection(
        pool: &PgPool,
        company_id: Uuid,
        selected_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE business_objectives SET is_selected = (id = ANY($2)) WHERE company_id = $1",
        )
        .bind(company_id)
        .bind(selected_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, company_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM business_objectives WHERE company_id = $1 AND id = $2")
                .bind(company_id)
                .bind(id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

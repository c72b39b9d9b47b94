/// Content types (blog post, video, ...) with publishing-frequency targets.
///
/// The three frequency fields are requests passed to the suggestion prompt,
/// not limits the planner enforces.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE content_types (
///     id UUID PRIMARY KEY,
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     is_selected BOOLEAN NOT NULL DEFAULT FALSE,
///     target_per_week INTEGER NOT NULL DEFAULT 0 CHECK (target_per_week >= 0),
///     max_frequency_per_week INTEGER NOT NULL DEFAULT 0 CHECK (max_frequency_per_week >= 0),
///     max_frequency_per_month INTEGER NOT NULL DEFAULT 0 CHECK (max_frequency_per_month >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (company_id, name)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentType {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub is_selected: bool,
    pub target_per_week: i32,
    pub max_frequency_per_week: i32,
    pub max_frequency_per_month: i32,
    pub created_at: DateTime<Utc>,
}

/// Publishing targets for one content type; all non-negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Frequencies {
    #[validate(range(min = 0))]
    pub target_per_week: i32,
    #[validate(range(min = 0))]
    pub max_frequency_per_week: i32,
    #[validate(range(min = 0))]
    pub max_frequency_per_month: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContentType {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    #[validate(nested)]
    pub frequencies: Frequencies,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContentType {
    pub is_selected: Option<bool>,
    #[validate(nested)]
    pub frequencies: Option<Frequencies>,
}

impl ContentType {
    pub fn frequencies(&self) -> Frequencies {
        Frequencies {
            target_per_week: self.target_per_week,
            max_frequency_per_week: self.max_frequency_per_week,
            max_frequency_per_month: self.max_frequency_per_month,
        }
    }

    /// # Errors
    ///
    /// Unique violation on a duplicate name; check violation on a negative
    /// frequency that slipped past validation.
    pub async fn create(
        pool: &PgPool,
        company_id: Uuid,
        data: CreateContentType,
    ) -> Result<Self, sqlx::Error> {
        let content_type = sqlx::query_as::<_, ContentType>(
            r#"
            INSERT INTO content_types
                (id, company_id, name, is_selected, target_per_week,
                 max_frequency_per_week, max_frequency_per_month)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, company_id, name, is_selected, target_per_week,
                      max_frequency_per_week, max_frequency_per_month, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(data.name.trim())
        .bind(data.is_selected)
        .bind(data.frequencies.target_per_week)
        .bind(data.frequencies.max_frequency_per_week)
        .bind(data.frequencies.max_frequency_per_month)
        .fetch_one(pool)
        .await?;

        Ok(content_type)
    }

    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let content_types = sqlx::query_as::<_, ContentType>(
            r#"
            SELECT id, company_id, name, is_selected, target_per_week,
                   max_frequency_per_week, max_frequency_per_month, created_at
            FROM content_types
            WHERE company_id = $1
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(content_types)
    }

    pub async fn list_selected(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let content_types = sqlx::query_as::<_, ContentType>(
            r#"
            SELECT id, company_id, name, is_selected, target_per_week,
                   max_frequency_per_week, max_frequency_per_month, created_at
            FROM content_types
            WHERE company_id = $1 AND is_selected
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(content_types)
    }

    /// Applies a partial update.
    ///
    /// Returns `None` when the content type does not exist in this company.
    pub async fn update(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
        data: UpdateContentType,
    ) -> Result<Option<Self>, sqlx::Error> {
        let frequencies = data.frequencies;

        let content_type = sqlx::query_as::<_, ContentType>(
            r#"
            UPDATE content_types SET
                is_selected = COALESCE($3, is_selected),
                target_per_week = COALESCE($4, target_per_week),
                max_frequency_per_week = COALESCE($5, max_frequency_per_week),
                max_frequency_per_month = COALESCE($6, max_frequency_per_month)
            WHERE company_id = $1 AND id = $2
            RETURNING id, company_id, name, is_selected, target_per_week,
                      max_frequency_per_week, max_frequency_per_month, created_at
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(data.is_selected)
        .bind(frequencies.map(|f| f.target_per_week))
        .bind(frequencies.map(|f| f.max_frequency_per_week))
        .bind(frequencies.map(|f| f.max_frequency_per_month))
        .fetch_optional(pool)
        .await?;

        Ok(content_type)
    }

    pub async fn replace_selection(
        pool: &PgPool,
        company_id: Uuid,
        selected_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content_types SET is_selected = (id = ANY($2)) WHERE company_id = $1",
        )
        .bind(company_id)
        .bind(selected_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, company_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_types WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_frequency_fails_validation() {
        let frequencies = Frequencies {
            target_per_week: -1,
            max_frequency_per_week: 2,
            max_frequency_per_month: 8,
        };
        assert!(frequencies.validate().is_err());
    }

    #[test]
    fn test_zero_frequencies_are_valid() {
        assert!(Frequencies::default().validate().is_ok());
    }

    #[test]
    fn test_create_defaults_from_json() {
        let data: CreateContentType = serde_json::from_str(r#"{"name":"Podcast"}"#).unwrap();
        assert!(!data.is_selected);
        assert_eq!(data.frequencies, Frequencies::default());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let data: CreateContentType = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(data.validate().is_err());
    }
}

/// Branding profile: at most one per company, keyed by `company_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE branding (
///     company_id UUID PRIMARY KEY REFERENCES companies(id) ON DELETE CASCADE,
///     company_name VARCHAR(255) NOT NULL DEFAULT '',
///     logo_url TEXT,
///     primary_color VARCHAR(16),
///     secondary_color VARCHAR(16),
///     font VARCHAR(255),
///     core_values TEXT NOT NULL DEFAULT '',
///     brand_personality TEXT NOT NULL DEFAULT '',
///     tone_of_voice TEXT NOT NULL DEFAULT '',
///     value_proposition TEXT NOT NULL DEFAULT '',
///     target_audience TEXT NOT NULL DEFAULT '',
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrandingProfile {
    pub company_id: Uuid,
    pub company_name: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
    pub core_values: String,
    pub brand_personality: String,
    pub tone_of_voice: String,
    pub value_proposition: String,
    pub target_audience: String,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the branding fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BrandingInput {
    #[validate(length(max = 255))]
    pub company_name: String,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(length(max = 16))]
    pub primary_color: Option<String>,
    #[validate(length(max = 16))]
    pub secondary_color: Option<String>,
    #[validate(length(max = 255))]
    pub font: Option<String>,
    pub core_values: String,
    pub brand_personality: String,
    pub tone_of_voice: String,
    pub value_proposition: String,
    pub target_audience: String,
}

impl BrandingProfile {
    pub async fn find(pool: &PgPool, company_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, BrandingProfile>(
            r#"
            SELECT company_id, company_name, logo_url, primary_color, secondary_color, font,
                   core_values, brand_personality, tone_of_voice, value_proposition,
                   target_audience, updated_at
            FROM branding
            WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Creates or replaces the company's branding profile.
    pub async fn upsert(
        pool: &PgPool,
        company_id: Uuid,
        data: BrandingInput,
    ) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, BrandingProfile>(
            r#"
            INSERT INTO branding
                (company_id, company_name, logo_url, primary_color, secondary_color, font,
                 core_values, brand_personality, tone_of_voice, value_proposition, target_audience)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (company_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                logo_url = EXCLUDED.logo_url,
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                font = EXCLUDED.font,
                core_values = EXCLUDED.core_values,
                brand_personality = EXCLUDED.brand_personality,
                tone_of_voice = EXCLUDED.tone_of_voice,
                value_proposition = EXCLUDED.value_proposition,
                target_audience = EXCLUDED.target_audience,
                updated_at = NOW()
            RETURNING company_id, company_name, logo_url, primary_color, secondary_color, font,
                      core_values, brand_personality, tone_of_voice, value_proposition,
                      target_audience, updated_at
            "#,
        )
        .bind(company_id)
        .bind(&data.company_name)
        .bind(&data.logo_url)
        .bind(&data.primary_color)
        .bind(&data.secondary_color)
        .bind(&data.font)
        .bind(&data.core_values)
        .bind(&data.brand_personality)
        .bind(&data.tone_of_voice)
        .bind(&data.value_proposition)
        .bind(&data.target_audience)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }
}

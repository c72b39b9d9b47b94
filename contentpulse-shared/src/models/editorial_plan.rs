/// Editorial plan items: the calendar of planned content pieces.
///
/// Items are created one at a time, in batches by grid reconciliation, or from
/// ingested suggestions. All writes take a `company_id` and filter on it, so a
/// write aimed at another company's item matches zero rows.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE plan_status AS ENUM ('planned', 'in_progress', 'published', 'archived');
/// CREATE TYPE funnel_stage AS ENUM ('discovery', 'consideration', 'decision', 'retention');
///
/// CREATE TABLE editorial_plan (
///     id UUID PRIMARY KEY,
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     title VARCHAR(500) NOT NULL,
///     content_type VARCHAR(255) NOT NULL,
///     theme TEXT,
///     keywords TEXT[] NOT NULL DEFAULT '{}',
///     author VARCHAR(255),
///     planned_publication_date DATE,
///     status plan_status NOT NULL DEFAULT 'planned',
///     target_persona VARCHAR(255),
///     customer_journey_stage funnel_stage,
///     main_cta TEXT,
///     url TEXT,
///     views BIGINT CHECK (views >= 0),
///     engagements BIGINT CHECK (engagements >= 0),
///     conversions BIGINT CHECK (conversions >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT editorial_plan_title_date_unique
///         UNIQUE (company_id, title, planned_publication_date)
///         DEFERRABLE INITIALLY DEFERRED
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use contentpulse_shared::models::editorial_plan::{EditorialPlanItem, PlanItemFields};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, company_id: Uuid) -> Result<(), sqlx::Error> {
/// let fields = PlanItemFields::new("Why dashboards fail", "Blog Post");
/// let item = EditorialPlanItem::insert(&pool, company_id, &fields).await?;
///
/// let plan = EditorialPlanItem::list(&pool, company_id).await?;
/// assert!(plan.iter().any(|i| i.id == item.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Lifecycle of a plan item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Planned,
    InProgress,
    Published,
    Archived,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Planned => "planned",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Published => "published",
            PlanStatus::Archived => "archived",
        }
    }

    /// Label used in generated tabular text.
    pub fn wire_label(&self) -> &'static str {
        match self {
            PlanStatus::Planned => "Planifié",
            PlanStatus::InProgress => "En cours",
            PlanStatus::Published => "Publié",
            PlanStatus::Archived => "Archivé",
        }
    }

    /// Parses an English or French label, ignoring case and accents on `e`.
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "planned" | "planifie" => Some(PlanStatus::Planned),
            "in_progress" | "in progress" | "inprogress" | "en cours" => {
                Some(PlanStatus::InProgress)
            }
            "published" | "publie" => Some(PlanStatus::Published),
            "archived" | "archive" => Some(PlanStatus::Archived),
            _ => None,
        }
    }
}

/// Where a piece sits in the customer journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "funnel_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Discovery,
    Consideration,
    Decision,
    Retention,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 4] = [
        FunnelStage::Discovery,
        FunnelStage::Consideration,
        FunnelStage::Decision,
        FunnelStage::Retention,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Discovery => "discovery",
            FunnelStage::Consideration => "consideration",
            FunnelStage::Decision => "decision",
            FunnelStage::Retention => "retention",
        }
    }

    pub fn wire_label(&self) -> &'static str {
        match self {
            FunnelStage::Discovery => "Découverte",
            FunnelStage::Consideration => "Considération",
            FunnelStage::Decision => "Décision",
            FunnelStage::Retention => "Fidélisation",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "discovery" | "decouverte" | "awareness" => Some(FunnelStage::Discovery),
            "consideration" => Some(FunnelStage::Consideration),
            "decision" => Some(FunnelStage::Decision),
            "retention" | "fidelisation" | "loyalty" => Some(FunnelStage::Retention),
            _ => None,
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            other => other,
        })
        .collect()
}

/// The editable content of a plan item, already coerced to its typed form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItemFields {
    pub title: String,
    pub content_type: String,
    pub theme: Option<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    pub planned_publication_date: Option<NaiveDate>,
    pub status: PlanStatus,
    pub target_persona: Option<String>,
    pub customer_journey_stage: Option<FunnelStage>,
    pub main_cta: Option<String>,
    pub url: Option<String>,
    /// `None` means "not measured yet", distinct from `Some(0)`
    pub views: Option<i64>,
    pub engagements: Option<i64>,
    pub conversions: Option<i64>,
}

impl PlanItemFields {
    /// A planned item with only the required fields set.
    pub fn new(title: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_type: content_type.into(),
            theme: None,
            keywords: Vec::new(),
            author: None,
            planned_publication_date: None,
            status: PlanStatus::Planned,
            target_persona: None,
            customer_journey_stage: None,
            main_cta: None,
            url: None,
            views: None,
            engagements: None,
            conversions: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EditorialPlanItem {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub content_type: String,
    pub theme: Option<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    pub planned_publication_date: Option<NaiveDate>,
    pub status: PlanStatus,
    pub target_persona: Option<String>,
    pub customer_journey_stage: Option<FunnelStage>,
    pub main_cta: Option<String>,
    pub url: Option<String>,
    pub views: Option<i64>,
    pub engagements: Option<i64>,
    pub conversions: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EditorialPlanItem {
    /// The editable part of the row, for comparison against a working set.
    pub fn fields(&self) -> PlanItemFields {
        PlanItemFields {
            title: self.title.clone(),
            content_type: self.content_type.clone(),
            theme: self.theme.clone(),
            keywords: self.keywords.clone(),
            author: self.author.clone(),
            planned_publication_date: self.planned_publication_date,
            status: self.status,
            target_persona: self.target_persona.clone(),
            customer_journey_stage: self.customer_journey_stage,
            main_cta: self.main_cta.clone(),
            url: self.url.clone(),
            views: self.views,
            engagements: self.engagements,
            conversions: self.conversions,
        }
    }

    /// All items of a company, by planned date (undated last) then title.
    pub async fn list(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        Self::snapshot(pool, company_id).await
    }

    /// Same rows and order as [`list`](Self::list), on the caller's executor so
    /// reconciliation reads inside its own transaction.
    pub async fn snapshot<'e, E>(executor: E, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let items = sqlx::query_as::<_, EditorialPlanItem>(
            r#"
            SELECT id, company_id, title, content_type, theme, keywords, author,
                   planned_publication_date, status, target_persona, customer_journey_stage,
                   main_cta, url, views, engagements, conversions, created_at, updated_at
            FROM editorial_plan
            WHERE company_id = $1
            ORDER BY planned_publication_date ASC NULLS LAST, title ASC, id ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    /// (title, date) pairs shared by more than one dated item of the company.
    pub async fn duplicate_keys<'e, E>(
        executor: E,
        company_id: Uuid,
    ) -> Result<Vec<(String, NaiveDate)>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let keys = sqlx::query_as::<_, (String, NaiveDate)>(
            r#"
            SELECT title, planned_publication_date
            FROM editorial_plan
            WHERE company_id = $1 AND planned_publication_date IS NOT NULL
            GROUP BY title, planned_publication_date
            HAVING COUNT(*) > 1
            "#,
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;

        Ok(keys)
    }

    pub async fn find(
        pool: &PgPool,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, EditorialPlanItem>(
            r#"
            SELECT id, company_id, title, content_type, theme, keywords, author,
                   planned_publication_date, status, target_persona, customer_journey_stage,
                   main_cta, url, views, engagements, conversions, created_at, updated_at
            FROM editorial_plan
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new item stamped with `company_id`.
    ///
    /// # Errors
    ///
    /// Check violation on a negative metric. The (title, date) uniqueness check
    /// is deferred to commit.
    pub async fn insert<'e, E>(
        executor: E,
        company_id: Uuid,
        fields: &PlanItemFields,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let item = sqlx::query_as::<_, EditorialPlanItem>(
            r#"
            INSERT INTO editorial_plan
                (id, company_id, title, content_type, theme, keywords, author,
                 planned_publication_date, status, target_persona, customer_journey_stage,
                 main_cta, url, views, engagements, conversions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id, company_id, title, content_type, theme, keywords, author,
                      planned_publication_date, status, target_persona, customer_journey_stage,
                      main_cta, url, views, engagements, conversions, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&fields.title)
        .bind(&fields.content_type)
        .bind(&fields.theme)
        .bind(&fields.keywords)
        .bind(&fields.author)
        .bind(fields.planned_publication_date)
        .bind(fields.status)
        .bind(&fields.target_persona)
        .bind(fields.customer_journey_stage)
        .bind(&fields.main_cta)
        .bind(&fields.url)
        .bind(fields.views)
        .bind(fields.engagements)
        .bind(fields.conversions)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    /// Overwrites every editable field of `id` (last write wins).
    ///
    /// Returns `false` when the item does not exist in this company.
    pub async fn update<'e, E>(
        executor: E,
        company_id: Uuid,
        id: Uuid,
        fields: &PlanItemFields,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE editorial_plan SET
                title = $3,
                content_type = $4,
                theme = $5,
                keywords = $6,
                author = $7,
                planned_publication_date = $8,
                status = $9,
                target_persona = $10,
                customer_journey_stage = $11,
                main_cta = $12,
                url = $13,
                views = $14,
                engagements = $15,
                conversions = $16,
                updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.content_type)
        .bind(&fields.theme)
        .bind(&fields.keywords)
        .bind(&fields.author)
        .bind(fields.planned_publication_date)
        .bind(fields.status)
        .bind(&fields.target_persona)
        .bind(fields.customer_journey_stage)
        .bind(&fields.main_cta)
        .bind(&fields.url)
        .bind(fields.views)
        .bind(fields.engagements)
        .bind(fields.conversions)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the given ids, intersected with the company's items.
    pub async fn delete_many<'e, E>(
        executor: E,
        company_id: Uuid,
        ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM editorial_plan WHERE company_id = $1 AND id = ANY($2)")
            .bind(company_id)
            .bind(ids)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

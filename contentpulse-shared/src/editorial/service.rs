//! Editorial plan operations for one tenant.
//!
//! Every function takes the request's [`TenantContext`] and scopes all reads
//! and writes to its company. Role checks happen before these are called.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::grid::{coerce_rows, GridRow};
use super::ingest::{merge_suggestions, parse_suggestions, stamp_tenant};
use super::prompt::PlanningContext;
use super::reconcile::{reconcile, ReconcileOutcome};
use crate::context::TenantContext;
use crate::error::{PlanError, PlanResult, RowRef};
use crate::generation::{ModelSettings, TextGenerator};
use crate::models::editorial_plan::EditorialPlanItem;
use crate::models::generated_content::GeneratedContentRecord;

pub async fn list_plan(pool: &PgPool, tenant: &TenantContext) -> PlanResult<Vec<EditorialPlanItem>> {
    Ok(EditorialPlanItem::list(pool, tenant.company_id).await?)
}

pub async fn find_item(
    pool: &PgPool,
    tenant: &TenantContext,
    item_id: Uuid,
) -> PlanResult<EditorialPlanItem> {
    EditorialPlanItem::find(pool, tenant.company_id, item_id)
        .await?
        .ok_or(PlanError::not_found("plan item"))
}

/// Creates one item through the same coercion and reconciliation path as the grid.
pub async fn create_item(
    pool: &PgPool,
    tenant: &TenantContext,
    mut row: GridRow,
) -> PlanResult<EditorialPlanItem> {
    row.id = None;
    let working = coerce_rows(vec![row])?;
    let outcome = reconcile(pool, tenant.company_id, working, &[]).await?;

    let id = outcome
        .inserted
        .first()
        .copied()
        .ok_or_else(|| PlanError::validation("item was not created"))?;
    find_item(pool, tenant, id).await
}

/// Saves an edited grid: coerces every row, then reconciles in one transaction.
pub async fn save_grid(
    pool: &PgPool,
    tenant: &TenantContext,
    rows: Vec<GridRow>,
    removed: &[Uuid],
) -> PlanResult<ReconcileOutcome> {
    let working = coerce_rows(rows)?;
    reconcile(pool, tenant.company_id, working, removed).await
}

/// Deletes items by id. Ids of other companies are ignored.
pub async fn delete_items(pool: &PgPool, tenant: &TenantContext, ids: &[Uuid]) -> PlanResult<u64> {
    let deleted = EditorialPlanItem::delete_many(pool, tenant.company_id, ids).await?;
    info!(company_id = %tenant.company_id, deleted, "Plan items deleted");
    Ok(deleted)
}

pub async fn delete_item(pool: &PgPool, tenant: &TenantContext, item_id: Uuid) -> PlanResult<()> {
    let deleted = EditorialPlanItem::delete_many(pool, tenant.company_id, &[item_id])
        .await
        .map_err(|e| PlanError::persistence_at(RowRef::Item(item_id), e))?;

    if deleted == 0 {
        return Err(PlanError::not_found("plan item"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionOutcome {
    /// Rows parsed from the generated table
    pub suggested: usize,
    pub plan: ReconcileOutcome,
}

/// Asks the generator for suggestions and folds them into the plan.
///
/// `working` is the caller's unsaved grid, saved together with the
/// suggestions. When `None` only the suggestions are inserted and persisted
/// rows are left alone, including edits that land while the generator runs.
/// The generated table is fully validated before anything is written, so a
/// malformed response leaves the plan untouched.
pub async fn generate_suggestions(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    tenant: &TenantContext,
    settings: ModelSettings,
    today: NaiveDate,
    working: Option<Vec<GridRow>>,
    removed: &[Uuid],
) -> PlanResult<SuggestionOutcome> {
    let working = match working {
        Some(rows) => coerce_rows(rows)?,
        None => Vec::new(),
    };

    let context = PlanningContext::load(pool, tenant.company_id).await?;
    let request = context.suggestion_request(today, settings)?;

    info!(
        company_id = %tenant.company_id,
        generator = generator.name(),
        model = %request.settings.model,
        "Requesting content suggestions"
    );

    let text = generator.generate(&request).await?;
    let parsed = parse_suggestions(&text).map_err(|e| {
        warn!(company_id = %tenant.company_id, error = %e, "Rejected generated suggestions");
        PlanError::from(e)
    })?;

    let suggested = parsed.len();
    let merged = merge_suggestions(
        tenant.company_id,
        working,
        stamp_tenant(tenant.company_id, parsed),
    );
    let plan = reconcile(pool, tenant.company_id, merged, removed).await?;

    Ok(SuggestionOutcome { suggested, plan })
}

/// Drafts a body for one plan item and stores it.
pub async fn draft_article(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    tenant: &TenantContext,
    item_id: Uuid,
    settings: ModelSettings,
) -> PlanResult<GeneratedContentRecord> {
    let item = find_item(pool, tenant, item_id).await?;
    let context = PlanningContext::load(pool, tenant.company_id).await?;
    let request = context.article_request(&item, settings);

    let body = generator.generate(&request).await?;
    if body.trim().is_empty() {
        return Err(PlanError::ExternalService(
            "generator returned an empty article".to_string(),
        ));
    }

    let record = GeneratedContentRecord::create(
        pool,
        tenant.company_id,
        item.id,
        &body,
        &request.settings.model,
    )
    .await?;

    info!(
        company_id = %tenant.company_id,
        plan_item_id = %item.id,
        record_id = %record.id,
        "Article drafted"
    );

    Ok(record)
}

/// Drafts for one item, newest first.
pub async fn list_generated(
    pool: &PgPool,
    tenant: &TenantContext,
    item_id: Uuid,
) -> PlanResult<Vec<GeneratedContentRecord>> {
    let item = find_item(pool, tenant, item_id).await?;
    Ok(GeneratedContentRecord::list_for_item(pool, tenant.company_id, item.id).await?)
}

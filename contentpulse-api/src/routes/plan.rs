/// Editorial plan endpoints, under `/v1/companies/:company_id/plan`
///
/// - `GET /plan` - the plan, by planned date then title
/// - `POST /plan` - create one item from a grid row
/// - `PUT /plan` - save the edited grid (reconciliation)
/// - `DELETE /plan` - delete a batch of items by id
/// - `POST /plan/suggestions` - generate suggestions and fold them in
/// - `GET|DELETE /plan/:item_id`
/// - `GET|POST /plan/:item_id/content` - drafted articles for an item

use crate::{
    app::AppState,
    error::ApiResult,
    extract::Tenant,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use contentpulse_shared::{
    auth::authorization::Permission,
    editorial::{service, GridRow, ReconcileOutcome, SuggestionOutcome},
    models::{editorial_plan::EditorialPlanItem, generated_content::GeneratedContentRecord},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The edited grid as the client holds it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveGridRequest {
    pub rows: Vec<GridRow>,
    /// Ids the user marked for removal
    pub removed: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestRequest {
    /// Unsaved grid to merge into; the persisted plan when absent
    pub rows: Option<Vec<GridRow>>,
    pub removed: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBatchRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeleteBatchResponse {
    pub deleted: u64,
}

pub async fn list(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<Vec<EditorialPlanItem>>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(service::list_plan(&state.db, ctx).await?))
}

pub async fn create(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(row): Json<GridRow>,
) -> ApiResult<(StatusCode, Json<EditorialPlanItem>)> {
    let ctx = tenant.require(Permission::Write)?;
    let item = service::create_item(&state.db, ctx, row).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Saves the grid in one transaction. A failing row rolls back the whole
/// save and is named in the error (`"row 3"`).
pub async fn save(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<SaveGridRequest>,
) -> ApiResult<Json<ReconcileOutcome>> {
    let ctx = tenant.require(Permission::Write)?;
    let outcome = service::save_grid(&state.db, ctx, req.rows, &req.removed).await?;
    Ok(Json(outcome))
}

pub async fn delete_batch(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<DeleteBatchRequest>,
) -> ApiResult<Json<DeleteBatchResponse>> {
    let ctx = tenant.require(Permission::Write)?;
    let deleted = service::delete_items(&state.db, ctx, &req.ids).await?;
    Ok(Json(DeleteBatchResponse { deleted }))
}

/// Generates suggestions; a provider failure or malformed table is a 502
/// and the plan is left as it was.
pub async fn suggest(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<SuggestRequest>,
) -> ApiResult<Json<SuggestionOutcome>> {
    let ctx = tenant.require(Permission::Write)?;

    let outcome = service::generate_suggestions(
        &state.db,
        state.generator.as_ref(),
        ctx,
        state.config.generation.suggestion_settings(),
        Utc::now().date_naive(),
        req.rows,
        &req.removed,
    )
    .await?;

    Ok(Json(outcome))
}

pub async fn get(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<EditorialPlanItem>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(service::find_item(&state.db, ctx, item_id).await?))
}

pub async fn delete_one(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    service::delete_item(&state.db, ctx, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_content(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<GeneratedContentRecord>>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(service::list_generated(&state.db, ctx, item_id).await?))
}

pub async fn generate_content(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<(StatusCode, Json<GeneratedContentRecord>)> {
    let ctx = tenant.require(Permission::Write)?;

    let record = service::draft_article(
        &state.db,
        state.generator.as_ref(),
        ctx,
        item_id,
        state.config.generation.article_settings(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Catalog configuration endpoints, all under `/v1/companies/:company_id`
///
/// Personas, content types and business objectives share one shape: list,
/// create, toggle `is_selected` per entry, replace the whole selection, and
/// delete. Content types also carry their publishing frequencies. The build
/// matrix is upserted by persona and branding is a single profile.
///
/// Reads need any membership; writes need the editor role.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Tenant,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contentpulse_shared::{
    auth::authorization::Permission,
    models::{
        branding::{BrandingInput, BrandingProfile},
        build_matrix::{BuildMatrixEntry, UpsertBuildMatrixEntry},
        business_objective::{BusinessObjective, CreateBusinessObjective},
        content_type::{ContentType, CreateContentType, UpdateContentType},
        persona::{CreatePersona, Persona},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of the bulk selection endpoints: exactly these entries end up selected.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub selected: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    /// Rows whose flag was rewritten
    pub updated: u64,
}

#[derive(Debug, Deserialize)]
pub struct SelectFlag {
    pub is_selected: bool,
}

fn require_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::ValidationError(vec![
            crate::error::ValidationErrorDetail::new("name", "Name is required"),
        ]));
    }
    Ok(())
}

fn found(matched: bool, entity: &str) -> ApiResult<StatusCode> {
    if matched {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("{} not found", entity)))
    }
}

// Personas

pub async fn list_personas(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<Vec<Persona>>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(Persona::list(&state.db, ctx.company_id).await?))
}

pub async fn create_persona(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<CreatePersona>,
) -> ApiResult<(StatusCode, Json<Persona>)> {
    let ctx = tenant.require(Permission::Write)?;
    require_name(&req.name)?;

    let persona = Persona::create(&state.db, ctx.company_id, req).await?;
    Ok((StatusCode::CREATED, Json(persona)))
}

pub async fn select_personas(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<SelectionRequest>,
) -> ApiResult<Json<SelectionResponse>> {
    let ctx = tenant.require(Permission::Write)?;
    let updated = Persona::replace_selection(&state.db, ctx.company_id, &req.selected).await?;
    Ok(Json(SelectionResponse { updated }))
}

pub async fn update_persona(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SelectFlag>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    let matched = Persona::set_selected(&state.db, ctx.company_id, entry_id, req.is_selected).await?;
    found(matched, "persona")
}

pub async fn delete_persona(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    found(Persona::delete(&state.db, ctx.company_id, entry_id).await?, "persona")
}

// Content types

pub async fn list_content_types(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<Vec<ContentType>>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(ContentType::list(&state.db, ctx.company_id).await?))
}

pub async fn create_content_type(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<CreateContentType>,
) -> ApiResult<(StatusCode, Json<ContentType>)> {
    let ctx = tenant.require(Permission::Write)?;
    req.validate()?;
    require_name(&req.name)?;

    let content_type = ContentType::create(&state.db, ctx.company_id, req).await?;
    Ok((StatusCode::CREATED, Json(content_type)))
}

pub async fn select_content_types(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<SelectionRequest>,
) -> ApiResult<Json<SelectionResponse>> {
    let ctx = tenant.require(Permission::Write)?;
    let updated = ContentType::replace_selection(&state.db, ctx.company_id, &req.selected).await?;
    Ok(Json(SelectionResponse { updated }))
}

/// Updates the selection flag and/or the three frequencies.
pub async fn update_content_type(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateContentType>,
) -> ApiResult<Json<ContentType>> {
    let ctx = tenant.require(Permission::Write)?;
    req.validate()?;

    ContentType::update(&state.db, ctx.company_id, entry_id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("content type not found".to_string()))
}

pub async fn delete_content_type(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    found(
        ContentType::delete(&state.db, ctx.company_id, entry_id).await?,
        "content type",
    )
}

// Business objectives

pub async fn list_objectives(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<Vec<BusinessObjective>>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(BusinessObjective::list(&state.db, ctx.company_id).await?))
}

pub async fn create_objective(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<CreateBusinessObjective>,
) -> ApiResult<(StatusCode, Json<BusinessObjective>)> {
    let ctx = tenant.require(Permission::Write)?;
    require_name(&req.name)?;

    let objective = BusinessObjective::create(&state.db, ctx.company_id, req).await?;
    Ok((StatusCode::CREATED, Json(objective)))
}

pub async fn select_objectives(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<SelectionRequest>,
) -> ApiResult<Json<SelectionResponse>> {
    let ctx = tenant.require(Permission::Write)?;
    let updated =
        BusinessObjective::replace_selection(&state.db, ctx.company_id, &req.selected).await?;
    Ok(Json(SelectionResponse { updated }))
}

pub async fn update_objective(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SelectFlag>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    let matched =
        BusinessObjective::set_selected(&state.db, ctx.company_id, entry_id, req.is_selected)
            .await?;
    found(matched, "business objective")
}

pub async fn delete_objective(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    found(
        BusinessObjective::delete(&state.db, ctx.company_id, entry_id).await?,
        "business objective",
    )
}

// Build matrix

pub async fn list_matrix(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<Vec<BuildMatrixEntry>>> {
    let ctx = tenant.require(Permission::Read)?;
    Ok(Json(BuildMatrixEntry::list(&state.db, ctx.company_id).await?))
}

/// Creates or replaces the entry for `persona`.
pub async fn upsert_matrix(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<UpsertBuildMatrixEntry>,
) -> ApiResult<Json<BuildMatrixEntry>> {
    let ctx = tenant.require(Permission::Write)?;
    if req.persona.trim().is_empty() {
        return Err(ApiError::ValidationError(vec![
            crate::error::ValidationErrorDetail::new("persona", "Persona is required"),
        ]));
    }

    Ok(Json(BuildMatrixEntry::upsert(&state.db, ctx.company_id, req).await?))
}

pub async fn delete_matrix(
    State(state): State<AppState>,
    tenant: Tenant,
    Path((_, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Write)?;
    found(
        BuildMatrixEntry::delete(&state.db, ctx.company_id, entry_id).await?,
        "build matrix entry",
    )
}

// Branding

pub async fn get_branding(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<BrandingProfile>> {
    let ctx = tenant.require(Permission::Read)?;

    BrandingProfile::find(&state.db, ctx.company_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("branding not found".to_string()))
}

pub async fn put_branding(
    State(state): State<AppState>,
    tenant: Tenant,
    Json(req): Json<BrandingInput>,
) -> ApiResult<Json<BrandingProfile>> {
    let ctx = tenant.require(Permission::Write)?;
    req.validate()?;

    Ok(Json(BrandingProfile::upsert(&state.db, ctx.company_id, req).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(require_name("  ").is_err());
        assert!(require_name("CTO").is_ok());
    }

    #[test]
    fn test_selection_request_shape() {
        let id = Uuid::new_v4();
        let req: SelectionRequest =
            serde_json::from_value(serde_json::json!({ "selected": [id] })).unwrap();
        assert_eq!(req.selected, vec![id]);
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        assert!(matches!(found(false, "persona"), Err(ApiError::NotFound(_))));
        assert_eq!(found(true, "persona").unwrap(), StatusCode::NO_CONTENT);
    }
}

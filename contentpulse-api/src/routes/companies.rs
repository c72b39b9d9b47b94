/// Company (tenant) endpoints
///
/// - `GET /v1/companies` - companies the user belongs to, by name
/// - `POST /v1/companies` - create a company; the caller becomes its admin
/// - `GET /v1/companies/:company_id` - one company (any member)
/// - `DELETE /v1/companies/:company_id` - hard delete (admin only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Tenant,
};
use axum::{extract::State, http::StatusCode, Json};
use contentpulse_shared::{
    auth::{authorization::Permission, middleware::AuthContext},
    context::TenantContext,
    models::company::{Company, CreateCompany, MemberCompany},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    #[serde(flatten)]
    pub company: Company,
    pub membership: TenantContext,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<MemberCompany>>> {
    let companies = Company::list_for_user(&state.db, auth.user_id).await?;
    Ok(Json(companies))
}

/// Creates the company, the admin membership and the default catalogs in
/// one transaction.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    req.validate()?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Company name is required".to_string()));
    }

    let company = Company::create_with_admin(
        &state.db,
        CreateCompany {
            name,
            description: req.description,
        },
        auth.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn get(
    State(state): State<AppState>,
    tenant: Tenant,
) -> ApiResult<Json<CompanyResponse>> {
    let ctx = tenant.require(Permission::Read)?;

    let company = Company::find_by_id(&state.db, ctx.company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("company not found".to_string()))?;

    Ok(Json(CompanyResponse {
        company,
        membership: ctx.clone(),
    }))
}

pub async fn remove(State(state): State<AppState>, tenant: Tenant) -> ApiResult<StatusCode> {
    let ctx = tenant.require(Permission::Manage)?;

    if !Company::delete(&state.db, ctx.company_id).await? {
        return Err(ApiError::NotFound("company not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

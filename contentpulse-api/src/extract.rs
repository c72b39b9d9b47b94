//! Request-scoped tenant extraction.
//!
//! Every `/v1/companies/:company_id/...` handler takes a [`Tenant`]. It is
//! resolved once per request from the session and the path, after checking
//! that the signed-in user is a member of the company.

use crate::{app::AppState, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use contentpulse_shared::{
    auth::{
        authorization::{authorize_company, require_permission, Permission},
        middleware::AuthContext,
    },
    context::TenantContext,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Tenant(pub TenantContext);

impl Tenant {
    /// Fails with 403 unless the member's role grants `permission`.
    pub fn require(&self, permission: Permission) -> Result<&TenantContext, ApiError> {
        require_permission(&self.0, permission)?;
        Ok(&self.0)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Tenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let auth = AuthContext::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let company_id = params
            .get("company_id")
            .ok_or_else(|| ApiError::BadRequest("Missing company id".to_string()))?
            .parse::<Uuid>()
            .map_err(|_| ApiError::BadRequest("Invalid company id".to_string()))?;

        let context = authorize_company(&state.db, &auth, company_id).await?;
        Ok(Tenant(context))
    }
}

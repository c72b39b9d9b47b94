//! Request-scoped tenant context.
//!
//! Built once when a request enters a company-scoped route (see
//! [`authorize_company`](crate::auth::authorization::authorize_company)) and
//! passed explicitly to every operation that reads or writes company data.
//! Nothing about the current user or company is held in global state.

use serde::Serialize;
use uuid::Uuid;

use crate::models::membership::MembershipRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub username: String,
    /// The company every read and write is scoped to
    pub company_id: Uuid,
    pub role: MembershipRole,
}
